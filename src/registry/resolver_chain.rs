//! # Resolver Chain
//!
//! Priority-ordered list of [`DecoderResolver`]s consulted on a cache miss.
//!
//! ## Resolution Flow
//!
//! ```text
//! type name ──► resolver (priority 10) ──TypeNotFound──► resolver (priority 100) ──► ...
//!                     │                                         │
//!                  Ok / other BadRecord                  Ok / other BadRecord
//!                     ▼                                         ▼
//!                  returned                                  returned
//! ```
//!
//! `TypeNotFound` means "not mine, try the next one". Any other failure means
//! the type was found but is malformed, and is returned immediately. When
//! every resolver reports `TypeNotFound` (or the chain is empty) the chain
//! itself reports `TypeNotFound`.

use super::decoder_resolver::DecoderResolver;
use crate::decoder::Decoder;
use crate::error::{RegistryError, RegistryResult};
use crate::scope::Scope;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// A priority-ordered chain of decoder resolvers.
///
/// `ResolverChain` is `Send + Sync` since it only holds `Arc` references to
/// resolvers. It is assembled once, before the registry starts serving.
#[derive(Debug, Default)]
pub struct ResolverChain {
    /// Resolvers ordered by priority (lower priority = earlier in vec)
    resolvers: Vec<Arc<dyn DecoderResolver>>,

    resolvers_by_name: HashMap<String, Arc<dyn DecoderResolver>>,
}

impl ResolverChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resolver, keeping the chain sorted by priority.
    ///
    /// Resolvers with equal priority keep their insertion order.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn DecoderResolver>) -> Self {
        self.add_resolver(resolver);
        self
    }

    pub fn add_resolver(&mut self, resolver: Arc<dyn DecoderResolver>) {
        let name = resolver.resolver_name().to_string();
        self.resolvers_by_name.insert(name, Arc::clone(&resolver));
        self.resolvers.push(resolver);
        self.resolvers.sort_by_key(|r| r.priority());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Resolver names in priority order.
    #[must_use]
    pub fn resolver_names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.resolver_name()).collect()
    }

    #[must_use]
    pub fn has_resolver(&self, name: &str) -> bool {
        self.resolvers_by_name.contains_key(name)
    }

    /// Union of the names every resolver reports for `scope`, sorted.
    #[must_use]
    pub fn registered_names(&self, scope: &Scope) -> Vec<String> {
        let mut names: Vec<String> = self
            .resolvers
            .iter()
            .flat_map(|r| r.registered_names(scope))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Resolve `type_name` within `scope` through the chain.
    #[instrument(skip(self), fields(scope = %scope))]
    pub fn resolve(&self, type_name: &str, scope: &Scope) -> RegistryResult<Decoder> {
        for resolver in &self.resolvers {
            let resolver_name = resolver.resolver_name();
            debug!(resolver = resolver_name, "Attempting resolution");

            match resolver.resolve(type_name, scope) {
                Ok(decoder) => {
                    debug!(
                        resolver = resolver_name,
                        scope_aware = decoder.is_scope_aware(),
                        "Successfully resolved decoder"
                    );
                    return Ok(decoder);
                }
                Err(error) if error.is_type_not_found() => {
                    trace!(
                        resolver = resolver_name,
                        "Type not found, trying next resolver"
                    );
                }
                Err(error) => return Err(error),
            }
        }

        Err(RegistryError::type_not_found(type_name))
    }

    #[must_use]
    pub fn stats(&self) -> ResolverChainStats {
        ResolverChainStats {
            resolver_count: self.resolvers.len(),
            resolver_names: self
                .resolver_names()
                .into_iter()
                .map(String::from)
                .collect(),
            priorities: self.resolvers.iter().map(|r| r.priority()).collect(),
        }
    }
}

/// Statistics about a resolver chain.
#[derive(Debug, Clone, Serialize)]
pub struct ResolverChainStats {
    pub resolver_count: usize,

    /// Names of resolvers in priority order
    pub resolver_names: Vec<String>,

    pub priorities: Vec<u32>,
}
