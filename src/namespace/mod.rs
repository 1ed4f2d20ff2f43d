//! # Type Namespaces
//!
//! The lookup surface the [`crate::registry::resolvers::NamespaceResolver`]
//! walks on a cache miss: find a type by name within a scope, then read the
//! static field through which the type exposes its decoder.
//!
//! ```text
//! find_type(name, scope) ──► TypeHandle ──► read_static_field(handle, "CREATOR")
//!        │                                          │
//!   NotFound / AccessDenied          Missing / InstanceBound / AccessDenied
//!                                    TypeRemoved / Value(Decoder) / Value(Opaque)
//! ```
//!
//! [`TypeTable`] is the in-memory implementation: types are declared per
//! scope together with their fields.

pub mod type_table;

use crate::decoder::Decoder;
use crate::scope::Scope;
use std::fmt;

pub use type_table::{FieldBinding, FieldDeclaration, TypeDeclaration, TypeTable, Visibility};

/// Opaque reference to a type found by a [`TypeNamespace`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    name: String,
    defining_scope: Scope,
}

impl TypeHandle {
    pub fn new(name: impl Into<String>, defining_scope: Scope) -> Self {
        Self {
            name: name.into(),
            defining_scope,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scope that declared the type. May differ from the scope a record was
    /// read in when the resolver fell back to the default scope.
    pub fn defining_scope(&self) -> &Scope {
        &self.defining_scope
    }
}

/// Outcome of a type lookup.
#[derive(Debug, Clone)]
pub enum TypeLookup {
    Found(TypeHandle),
    NotFound,
    AccessDenied,
}

/// A field's value as seen by the resolver.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Decoder(Decoder),
    /// Anything that is not a decoder, described for diagnostics
    Opaque(String),
}

/// Outcome of reading a static field.
#[derive(Debug, Clone)]
pub enum FieldLookup {
    Value(FieldValue),
    /// The field exists but can only be read through an instance
    InstanceBound,
    Missing,
    AccessDenied,
    /// The type was removed from the namespace after it was found
    TypeRemoved,
}

/// Type lookup collaborator for namespace-based resolution.
///
/// Implementations must be `Send + Sync`; the registry may consult them from
/// any thread.
pub trait TypeNamespace: Send + Sync + fmt::Debug {
    /// Locate the type called `name` declared in exactly `scope`.
    fn find_type(&self, name: &str, scope: &Scope) -> TypeLookup;

    /// Read the static field `field_name` of a previously found type.
    fn read_static_field(&self, handle: &TypeHandle, field_name: &str) -> FieldLookup;
}
