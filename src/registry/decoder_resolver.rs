//! # Decoder Resolver Strategy
//!
//! A resolver turns a type name seen in a record into the decoder singleton
//! that type declares. Resolvers are only consulted on a cache miss; the
//! [`super::DecoderRegistry`] memoizes whatever they return.
//!
//! ## Resolver Responsibilities
//!
//! - **DO**: Return the type's decoder singleton, not a fresh decoder per call
//! - **DO**: Report an unknown name as `BadRecord { TypeNotFound }` so the
//!   chain can try the next resolver
//! - **DO**: Report a found-but-malformed type with its specific sub-kind;
//!   that stops the chain
//! - **DON'T**: Cache results (the registry does this)
//! - **DON'T**: Call back into the registry (it may hold its cache lock)
//!
//! ## Example: Custom Resolver
//!
//! ```rust,ignore
//! #[derive(Debug)]
//! struct PrefixResolver {
//!     prefix: &'static str,
//!     decoder: Decoder,
//! }
//!
//! impl DecoderResolver for PrefixResolver {
//!     fn resolve(&self, type_name: &str, _scope: &Scope) -> RegistryResult<Decoder> {
//!         if type_name.starts_with(self.prefix) {
//!             Ok(self.decoder.clone())
//!         } else {
//!             Err(RegistryError::type_not_found(type_name))
//!         }
//!     }
//!
//!     fn resolver_name(&self) -> &str {
//!         "PrefixResolver"
//!     }
//!
//!     fn priority(&self) -> u32 {
//!         50 // After explicit mapping (10), before namespace lookup (100)
//!     }
//! }
//! ```

use crate::constants::resolvers::DEFAULT_PRIORITY;
use crate::decoder::Decoder;
use crate::error::RegistryResult;
use crate::scope::Scope;
use std::fmt;

/// Strategy for resolving a type name within a scope to a decoder.
///
/// ## Priority System
///
/// Resolvers are tried in priority order (lower = checked first):
/// - 10: ExplicitMappingResolver (registered names)
/// - 20-99: Custom resolvers
/// - 100: NamespaceResolver (type namespace lookup)
///
/// ## Thread Safety
///
/// All resolvers must be `Send + Sync`; any thread decoding a record may
/// trigger a resolution.
pub trait DecoderResolver: Send + Sync + fmt::Debug {
    /// Resolve `type_name` as seen from `scope`.
    fn resolve(&self, type_name: &str, scope: &Scope) -> RegistryResult<Decoder>;

    /// Resolver name for logging and stats.
    fn resolver_name(&self) -> &str;

    /// Priority in the resolver chain (lower = checked first).
    fn priority(&self) -> u32 {
        DEFAULT_PRIORITY
    }

    /// Names this resolver knows about in `scope`, for introspection.
    ///
    /// Resolvers that search dynamically may return an empty list.
    fn registered_names(&self, _scope: &Scope) -> Vec<String> {
        Vec::new()
    }
}
