//! Shared parcelable types, namespaces and record helpers for integration tests.

#![allow(dead_code)]

use parcel_registry::namespace::{
    FieldDeclaration, FieldLookup, FieldValue, TypeDeclaration, TypeHandle, TypeLookup,
    TypeNamespace, TypeTable,
};
use parcel_registry::parcelable::write_parcelable;
use parcel_registry::{Decoder, Parcel, Parcelable, RegistryResult, Scope};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

pub const POINT: &str = "geometry.Point";
pub const RECT: &str = "geometry.Rect";

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The decoder singleton; every call returns the same instance.
    pub fn decoder() -> Decoder {
        static CREATOR: OnceLock<Decoder> = OnceLock::new();
        CREATOR
            .get_or_init(|| {
                Decoder::from_fn("Point", |parcel| {
                    Ok(Box::new(Point {
                        x: parcel.read_i32()?,
                        y: parcel.read_i32()?,
                    }))
                })
            })
            .clone()
    }
}

impl Parcelable for Point {
    fn type_name(&self) -> &str {
        POINT
    }

    fn write_to_parcel(&self, parcel: &mut Parcel) -> RegistryResult<()> {
        parcel.write_i32(self.x);
        parcel.write_i32(self.y);
        Ok(())
    }
}

/// Rectangle whose corners are nested, type-tagged points.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub top_left: Point,
    pub bottom_right: Point,
    pub label: Option<String>,
}

impl Rect {
    pub fn decoder() -> Decoder {
        static CREATOR: OnceLock<Decoder> = OnceLock::new();
        CREATOR
            .get_or_init(|| {
                Decoder::scoped_from_fn("Rect", |parcel, context| {
                    let label = parcel.read_string()?;
                    let top_left = context.read_parcelable_as::<Point>(parcel)?;
                    let bottom_right = context.read_parcelable_as::<Point>(parcel)?;
                    match (top_left, bottom_right) {
                        (Some(top_left), Some(bottom_right)) => Ok(Box::new(Rect {
                            top_left,
                            bottom_right,
                            label,
                        })),
                        _ => Err(parcel_registry::RegistryError::malformed(
                            "rect is missing a corner",
                        )),
                    }
                })
            })
            .clone()
    }
}

impl Parcelable for Rect {
    fn type_name(&self) -> &str {
        RECT
    }

    fn write_to_parcel(&self, parcel: &mut Parcel) -> RegistryResult<()> {
        parcel.write_string(self.label.as_deref())?;
        write_parcelable(parcel, Some(&self.top_left))?;
        write_parcelable(parcel, Some(&self.bottom_right))
    }
}

/// Rewound parcel holding `values` back to back.
pub fn record_of(values: &[&dyn Parcelable]) -> Parcel {
    let mut parcel = Parcel::new();
    for value in values {
        write_parcelable(&mut parcel, Some(*value)).expect("fixture values are writable");
    }
    parcel.rewind();
    parcel
}

/// Type table declaring `Point` with a static `CREATOR` in `scope`.
pub fn point_table(scope: &Scope) -> Arc<TypeTable> {
    let table = Arc::new(TypeTable::new());
    declare_point(&table, scope, FieldDeclaration::static_decoder(Point::decoder()));
    table
}

pub fn declare_point(table: &TypeTable, scope: &Scope, creator: FieldDeclaration) {
    table.declare(
        scope,
        TypeDeclaration::new(POINT).with_field("CREATOR", creator),
    );
}

pub fn instance_bound_creator() -> FieldDeclaration {
    FieldDeclaration::instance(FieldValue::Decoder(Point::decoder()))
}

/// Namespace wrapper that counts lookups and can slow them down.
#[derive(Debug)]
pub struct CountingNamespace {
    inner: Arc<dyn TypeNamespace>,
    lookups: AtomicUsize,
    delay: Duration,
}

impl CountingNamespace {
    pub fn new(inner: Arc<dyn TypeNamespace>) -> Self {
        Self::with_delay(inner, Duration::ZERO)
    }

    pub fn with_delay(inner: Arc<dyn TypeNamespace>, delay: Duration) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
            delay,
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TypeNamespace for CountingNamespace {
    fn find_type(&self, name: &str, scope: &Scope) -> TypeLookup {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.inner.find_type(name, scope)
    }

    fn read_static_field(&self, handle: &TypeHandle, field_name: &str) -> FieldLookup {
        self.inner.read_static_field(handle, field_name)
    }
}
