//! # Decoders
//!
//! A [`Decoder`] reconstructs a value from a parcel positioned just past the
//! value's type name. Decoders come in two shapes:
//!
//! | Variant | Trait | Receives |
//! |---------|-------|----------|
//! | `Plain` | [`Decode`] | the parcel only |
//! | `Scoped` | [`ScopedDecode`] | the parcel plus a [`DecodeContext`] |
//!
//! Scope-aware decoders use the context to read nested values in the same
//! scope as the enclosing record. The registry calls whichever shape a
//! decoder has; callers never check at runtime which trait sits behind it.

use crate::error::RegistryResult;
use crate::parcel::Parcel;
use crate::parcelable::Parcelable;
use crate::registry::DecoderRegistry;
use crate::scope::Scope;
use std::fmt;
use std::sync::Arc;

/// Scope-agnostic decoder.
pub trait Decode: Send + Sync + fmt::Debug {
    fn decode(&self, parcel: &mut Parcel) -> RegistryResult<Box<dyn Parcelable>>;
}

/// Scope-aware decoder.
pub trait ScopedDecode: Send + Sync + fmt::Debug {
    fn decode_in_scope(
        &self,
        parcel: &mut Parcel,
        context: &DecodeContext<'_>,
    ) -> RegistryResult<Box<dyn Parcelable>>;
}

/// What a scope-aware decoder gets to see besides the parcel.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    registry: &'a DecoderRegistry,
    scope: &'a Scope,
}

impl<'a> DecodeContext<'a> {
    pub fn new(registry: &'a DecoderRegistry, scope: &'a Scope) -> Self {
        Self { registry, scope }
    }

    pub fn scope(&self) -> &'a Scope {
        self.scope
    }

    pub fn registry(&self) -> &'a DecoderRegistry {
        self.registry
    }

    /// Read a nested type-tagged value in the enclosing record's scope.
    pub fn read_parcelable(
        &self,
        parcel: &mut Parcel,
    ) -> RegistryResult<Option<Box<dyn Parcelable>>> {
        self.registry.read_parcelable(parcel, self.scope)
    }

    /// Typed variant of [`DecodeContext::read_parcelable`].
    pub fn read_parcelable_as<T: Parcelable>(&self, parcel: &mut Parcel) -> RegistryResult<Option<T>> {
        self.registry.read_parcelable_as::<T>(parcel, self.scope)
    }
}

/// Handle to a decoder singleton owned by the type that declares it.
///
/// Cloning shares the same singleton.
#[derive(Clone)]
pub enum Decoder {
    Plain(Arc<dyn Decode>),
    Scoped(Arc<dyn ScopedDecode>),
}

impl Decoder {
    pub fn plain(decoder: impl Decode + 'static) -> Self {
        Decoder::Plain(Arc::new(decoder))
    }

    pub fn scoped(decoder: impl ScopedDecode + 'static) -> Self {
        Decoder::Scoped(Arc::new(decoder))
    }

    /// Build a scope-agnostic decoder from a closure.
    ///
    /// `label` only shows up in `Debug` output and logs.
    pub fn from_fn<F>(label: &'static str, decode: F) -> Self
    where
        F: Fn(&mut Parcel) -> RegistryResult<Box<dyn Parcelable>> + Send + Sync + 'static,
    {
        Decoder::plain(FnDecoder { label, decode })
    }

    /// Build a scope-aware decoder from a closure.
    pub fn scoped_from_fn<F>(label: &'static str, decode: F) -> Self
    where
        F: Fn(&mut Parcel, &DecodeContext<'_>) -> RegistryResult<Box<dyn Parcelable>>
            + Send
            + Sync
            + 'static,
    {
        Decoder::scoped(ScopedFnDecoder { label, decode })
    }

    pub fn is_scope_aware(&self) -> bool {
        matches!(self, Decoder::Scoped(_))
    }

    /// `true` when both handles point at the same decoder singleton.
    pub fn same_instance(&self, other: &Decoder) -> bool {
        self.instance_ptr() == other.instance_ptr()
    }

    fn instance_ptr(&self) -> *const () {
        match self {
            Decoder::Plain(decoder) => Arc::as_ptr(decoder) as *const (),
            Decoder::Scoped(decoder) => Arc::as_ptr(decoder) as *const (),
        }
    }

    /// Run the decoder, forwarding the context only to scope-aware decoders.
    pub fn decode(
        &self,
        parcel: &mut Parcel,
        context: &DecodeContext<'_>,
    ) -> RegistryResult<Box<dyn Parcelable>> {
        match self {
            Decoder::Plain(decoder) => decoder.decode(parcel),
            Decoder::Scoped(decoder) => decoder.decode_in_scope(parcel, context),
        }
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoder::Plain(decoder) => write!(f, "Plain({decoder:?})"),
            Decoder::Scoped(decoder) => write!(f, "Scoped({decoder:?})"),
        }
    }
}

struct FnDecoder<F> {
    label: &'static str,
    decode: F,
}

impl<F> fmt::Debug for FnDecoder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnDecoder({})", self.label)
    }
}

impl<F> Decode for FnDecoder<F>
where
    F: Fn(&mut Parcel) -> RegistryResult<Box<dyn Parcelable>> + Send + Sync,
{
    fn decode(&self, parcel: &mut Parcel) -> RegistryResult<Box<dyn Parcelable>> {
        (self.decode)(parcel)
    }
}

struct ScopedFnDecoder<F> {
    label: &'static str,
    decode: F,
}

impl<F> fmt::Debug for ScopedFnDecoder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopedFnDecoder({})", self.label)
    }
}

impl<F> ScopedDecode for ScopedFnDecoder<F>
where
    F: Fn(&mut Parcel, &DecodeContext<'_>) -> RegistryResult<Box<dyn Parcelable>> + Send + Sync,
{
    fn decode_in_scope(
        &self,
        parcel: &mut Parcel,
        context: &DecodeContext<'_>,
    ) -> RegistryResult<Box<dyn Parcelable>> {
        (self.decode)(parcel, context)
    }
}
