//! # Built-in Decoder Resolvers
//!
//! ## Resolver Priority Order
//!
//! Resolvers are tried in priority order (lower number = checked first):
//!
//! | Priority | Resolver | Description |
//! |----------|----------|-------------|
//! | 10 | `ExplicitMappingResolver` | Names registered at startup |
//! | 20-99 | Custom resolvers | Domain-specific lookup |
//! | 100 | `NamespaceResolver` | Decoder field of a type in a `TypeNamespace` |
//!
//! ## Building a Resolver Chain
//!
//! ```rust,ignore
//! use parcel_registry::registry::{ResolverChain, resolvers::*};
//! use std::sync::Arc;
//!
//! let explicit = Arc::new(ExplicitMappingResolver::new());
//! let namespace = Arc::new(NamespaceResolver::new(Arc::new(TypeTable::new())));
//!
//! explicit.register(Scope::default_scope(), "geometry.Point", Point::decoder());
//!
//! // Build chain (automatically sorted by priority)
//! let chain = ResolverChain::new()
//!     .with_resolver(namespace)
//!     .with_resolver(explicit);
//! ```

mod explicit_mapping;
mod namespace_lookup;

pub use explicit_mapping::ExplicitMappingResolver;
pub use namespace_lookup::NamespaceResolver;
