//! # Decoder Registry and Resolution
//!
//! The registry memoizes type name to decoder resolutions per scope. On a
//! miss it asks a [`ResolverChain`]:
//!
//! - [`resolvers::ExplicitMappingResolver`]: names registered at startup
//! - [`resolvers::NamespaceResolver`]: decoder field of a type found in a
//!   [`crate::namespace::TypeNamespace`]
//! - any custom [`DecoderResolver`] added through the builder

pub mod decoder_registry;
pub mod decoder_resolver;
pub mod resolver_chain;
pub mod resolvers;

pub use decoder_registry::{DecoderRegistry, DecoderRegistryBuilder, RegistryStats};
pub use decoder_resolver::DecoderResolver;
pub use resolver_chain::{ResolverChain, ResolverChainStats};
pub use resolvers::{ExplicitMappingResolver, NamespaceResolver};
