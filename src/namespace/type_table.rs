//! # Type Table
//!
//! In-memory [`TypeNamespace`]: each scope owns a table of declared types and
//! each type declares named fields.
//!
//! ## Exact Scopes
//!
//! Lookups only see the types declared in the scope asked for. Falling back
//! from a named scope to the default scope is the resolver's decision (see
//! [`crate::registry::NamespaceResolver::with_scope_fallback`]), so the table
//! itself never crosses scopes.
//!
//! ## Usage
//!
//! ```rust
//! use parcel_registry::namespace::{FieldDeclaration, TypeDeclaration, TypeTable};
//! use parcel_registry::{Decoder, Scope};
//! # use parcel_registry::{Parcel, Parcelable, RegistryResult};
//! # #[derive(Debug)] struct Ping;
//! # impl Parcelable for Ping {
//! #     fn type_name(&self) -> &str { "Ping" }
//! #     fn write_to_parcel(&self, _p: &mut Parcel) -> RegistryResult<()> { Ok(()) }
//! # }
//!
//! let table = TypeTable::new();
//! let decoder = Decoder::from_fn("Ping", |_parcel| Ok(Box::new(Ping)));
//!
//! table.declare(
//!     &Scope::named("net"),
//!     TypeDeclaration::new("Ping").with_field("CREATOR", FieldDeclaration::static_decoder(decoder)),
//! );
//! assert!(table.is_declared(&Scope::named("net"), "Ping"));
//! ```

use super::{FieldLookup, FieldValue, TypeHandle, TypeLookup, TypeNamespace};
use crate::decoder::Decoder;
use crate::scope::Scope;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Whether a field can be read without an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBinding {
    Static,
    Instance,
}

/// Whether a type or field is visible to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone)]
pub struct FieldDeclaration {
    pub binding: FieldBinding,
    pub visibility: Visibility,
    pub value: FieldValue,
}

impl FieldDeclaration {
    /// Public static field holding a decoder, the well-formed case.
    pub fn static_decoder(decoder: Decoder) -> Self {
        Self {
            binding: FieldBinding::Static,
            visibility: Visibility::Public,
            value: FieldValue::Decoder(decoder),
        }
    }

    /// Public static field holding something other than a decoder.
    pub fn static_opaque(description: impl Into<String>) -> Self {
        Self {
            binding: FieldBinding::Static,
            visibility: Visibility::Public,
            value: FieldValue::Opaque(description.into()),
        }
    }

    /// Public field that belongs to instances of the type.
    pub fn instance(value: FieldValue) -> Self {
        Self {
            binding: FieldBinding::Instance,
            visibility: Visibility::Public,
            value,
        }
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

/// A declared type and its fields.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    name: String,
    visibility: Visibility,
    fields: HashMap<String, FieldDeclaration>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            fields: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field: FieldDeclaration) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Hide the whole type from lookups.
    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn field(&self, name: &str) -> Option<&FieldDeclaration> {
        self.fields.get(name)
    }
}

/// Per-scope tables of declared types.
pub struct TypeTable {
    scopes: RwLock<HashMap<Scope, HashMap<String, Arc<TypeDeclaration>>>>,
}

impl fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scopes = self.scopes.read();
        f.debug_struct("TypeTable")
            .field("scopes", &scopes.len())
            .field(
                "declared_types",
                &scopes.values().map(HashMap::len).sum::<usize>(),
            )
            .finish()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        Self {
            scopes: RwLock::new(HashMap::new()),
        }
    }

    /// Declare (or redeclare) a type in `scope`, returning any previous
    /// declaration of the same name.
    pub fn declare(
        &self,
        scope: &Scope,
        declaration: TypeDeclaration,
    ) -> Option<Arc<TypeDeclaration>> {
        let name = declaration.name.clone();
        self.scopes
            .write()
            .entry(scope.clone())
            .or_default()
            .insert(name, Arc::new(declaration))
    }

    /// Remove a declaration. Returns `true` if one was present.
    pub fn remove(&self, scope: &Scope, name: &str) -> bool {
        self.scopes
            .write()
            .get_mut(scope)
            .is_some_and(|types| types.remove(name).is_some())
    }

    pub fn is_declared(&self, scope: &Scope, name: &str) -> bool {
        self.scopes
            .read()
            .get(scope)
            .is_some_and(|types| types.contains_key(name))
    }

    /// Names declared directly in `scope`, sorted.
    pub fn declared_names(&self, scope: &Scope) -> Vec<String> {
        let mut names: Vec<String> = self
            .scopes
            .read()
            .get(scope)
            .map(|types| types.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn declaration(&self, scope: &Scope, name: &str) -> Option<Arc<TypeDeclaration>> {
        self.scopes
            .read()
            .get(scope)
            .and_then(|types| types.get(name))
            .cloned()
    }
}

impl TypeNamespace for TypeTable {
    fn find_type(&self, name: &str, scope: &Scope) -> TypeLookup {
        match self.declaration(scope, name) {
            None => TypeLookup::NotFound,
            Some(declaration) if declaration.visibility == Visibility::Private => {
                TypeLookup::AccessDenied
            }
            Some(_) => TypeLookup::Found(TypeHandle::new(name, scope.clone())),
        }
    }

    fn read_static_field(&self, handle: &TypeHandle, field_name: &str) -> FieldLookup {
        let Some(declaration) = self.declaration(handle.defining_scope(), handle.name()) else {
            trace!(
                type_name = handle.name(),
                scope = %handle.defining_scope(),
                "Type removed after lookup"
            );
            return FieldLookup::TypeRemoved;
        };

        match declaration.field(field_name) {
            None => FieldLookup::Missing,
            Some(field) if field.visibility == Visibility::Private => FieldLookup::AccessDenied,
            Some(field) if field.binding == FieldBinding::Instance => FieldLookup::InstanceBound,
            Some(field) => FieldLookup::Value(field.value.clone()),
        }
    }
}
