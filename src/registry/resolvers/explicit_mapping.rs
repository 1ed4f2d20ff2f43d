//! # Explicit Mapping Resolver
//!
//! Direct (scope, type name) to decoder mapping, filled in at startup.
//!
//! This resolver is the first stop in the resolver chain. Types register the
//! decoder they declare once, and every later lookup is a table read.
//!
//! ## Priority
//!
//! Priority: **10** (checked first in the resolver chain)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parcel_registry::registry::resolvers::ExplicitMappingResolver;
//!
//! let resolver = ExplicitMappingResolver::new();
//! resolver.register(Scope::default_scope(), "geometry.Point", Point::decoder());
//! resolver.register(Scope::named("plugin-a"), "plugin.Widget", Widget::decoder());
//! ```
//!
//! Names registered under the default scope are visible from every named
//! scope unless scope fallback is turned off.

use crate::constants::resolvers::{EXPLICIT_MAPPING_NAME, EXPLICIT_MAPPING_PRIORITY};
use crate::decoder::Decoder;
use crate::error::{RegistryError, RegistryResult};
use crate::registry::DecoderResolver;
use crate::scope::Scope;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Explicit mapping resolver for direct name-to-decoder lookup.
///
/// ## Thread Safety
///
/// Uses a `parking_lot::RwLock`; lookups from many threads only take the
/// read side.
pub struct ExplicitMappingResolver {
    /// Decoder mappings, partitioned by scope
    mappings: RwLock<HashMap<Scope, HashMap<String, Decoder>>>,

    /// Resolver name for logging
    name: String,

    scope_fallback: bool,
}

impl fmt::Debug for ExplicitMappingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mappings = self.mappings.read();
        let registered: usize = mappings.values().map(HashMap::len).sum();
        f.debug_struct("ExplicitMappingResolver")
            .field("name", &self.name)
            .field("scopes", &mappings.len())
            .field("registered_decoders", &registered)
            .field("scope_fallback", &self.scope_fallback)
            .finish()
    }
}

impl Default for ExplicitMappingResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplicitMappingResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::with_name(EXPLICIT_MAPPING_NAME)
    }

    /// Create a resolver with a custom name.
    ///
    /// Useful when multiple explicit mapping resolvers are in the chain.
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            mappings: RwLock::new(HashMap::new()),
            name: name.into(),
            scope_fallback: true,
        }
    }

    /// Enable or disable default-scope fallback for named scopes.
    #[must_use]
    pub fn with_scope_fallback(mut self, enabled: bool) -> Self {
        self.scope_fallback = enabled;
        self
    }

    /// Register `decoder` for `type_name` within `scope`.
    ///
    /// Returns the decoder previously registered under the same key, if any.
    pub fn register(
        &self,
        scope: Scope,
        type_name: impl Into<String>,
        decoder: Decoder,
    ) -> Option<Decoder> {
        self.mappings
            .write()
            .entry(scope)
            .or_default()
            .insert(type_name.into(), decoder)
    }

    /// Returns `true` if a decoder was removed.
    pub fn unregister(&self, scope: &Scope, type_name: &str) -> bool {
        self.mappings
            .write()
            .get_mut(scope)
            .is_some_and(|names| names.remove(type_name).is_some())
    }

    /// Whether `type_name` is registered directly in `scope` (no fallback).
    #[must_use]
    pub fn is_registered(&self, scope: &Scope, type_name: &str) -> bool {
        self.mappings
            .read()
            .get(scope)
            .is_some_and(|names| names.contains_key(type_name))
    }

    /// Total number of registrations across all scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.read().values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, type_name: &str, scope: &Scope) -> Option<Decoder> {
        let mappings = self.mappings.read();
        let direct = mappings
            .get(scope)
            .and_then(|names| names.get(type_name))
            .cloned();

        match direct {
            Some(decoder) => Some(decoder),
            None if self.scope_fallback && !scope.is_default() => mappings
                .get(&Scope::default_scope())
                .and_then(|names| names.get(type_name))
                .cloned(),
            None => None,
        }
    }
}

impl DecoderResolver for ExplicitMappingResolver {
    fn resolve(&self, type_name: &str, scope: &Scope) -> RegistryResult<Decoder> {
        self.lookup(type_name, scope)
            .ok_or_else(|| RegistryError::type_not_found(type_name))
    }

    fn resolver_name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        EXPLICIT_MAPPING_PRIORITY
    }

    fn registered_names(&self, scope: &Scope) -> Vec<String> {
        let mappings = self.mappings.read();
        let mut names: Vec<String> = mappings
            .get(scope)
            .map(|names| names.keys().cloned().collect())
            .unwrap_or_default();

        if self.scope_fallback && !scope.is_default() {
            if let Some(defaults) = mappings.get(&Scope::default_scope()) {
                names.extend(defaults.keys().cloned());
            }
        }

        names.sort();
        names.dedup();
        names
    }
}
