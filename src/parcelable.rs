//! # Parcelable Values
//!
//! Values that travel through a parcel tagged with their type name. The write
//! side tags a value with [`Parcelable::type_name`]; the read side looks that
//! name up in the [`crate::DecoderRegistry`] to find the decoder.

use crate::error::RegistryResult;
use crate::parcel::Parcel;
use std::any::Any;
use std::fmt;

/// Object-safe access to `Any` for trait objects.
///
/// Blanket-implemented for every `'static + Send + Sync` type; implementors of
/// [`Parcelable`] never write this by hand.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

/// A value that can be written to and reconstructed from a parcel.
pub trait Parcelable: AsAny + fmt::Debug {
    /// Name written in front of the value. Must resolve to this type's decoder
    /// on the read side, under the same scope.
    fn type_name(&self) -> &str;

    /// Write the value body (everything after the type name).
    fn write_to_parcel(&self, parcel: &mut Parcel) -> RegistryResult<()>;
}

impl dyn Parcelable {
    pub fn is<T: Parcelable>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }

    pub fn downcast_ref<T: Parcelable>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    /// Recover the concrete value, or `None` if it is some other type.
    pub fn downcast<T: Parcelable>(self: Box<Self>) -> Option<Box<T>> {
        AsAny::into_any(self).downcast::<T>().ok()
    }
}

/// Write only the type tag of `value` (no body).
pub fn write_type_name(parcel: &mut Parcel, value: &dyn Parcelable) -> RegistryResult<()> {
    parcel.write_string(Some(value.type_name()))?;
    Ok(())
}

/// Write `value` as a type tag followed by its body. `None` writes the null
/// marker, which reads back as "no value".
///
/// Parcelables holding nested values use this from `write_to_parcel`.
pub fn write_parcelable(parcel: &mut Parcel, value: Option<&dyn Parcelable>) -> RegistryResult<()> {
    match value {
        Some(value) => {
            write_type_name(parcel, value)?;
            value.write_to_parcel(parcel)
        }
        None => {
            parcel.write_string(None)?;
            Ok(())
        }
    }
}
