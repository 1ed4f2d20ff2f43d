//! # Decoder Registry
//!
//! Process-wide memoization of type name to decoder resolutions, keyed first
//! by [`Scope`] and then by type name.
//!
//! ## Lifecycle of a read
//!
//! ```text
//! read_parcelable(parcel, scope)
//!   └─ read_type_name ──► None ───────────────► Ok(None)
//!        └─ cache[scope][name] ──► hit ──┐
//!             └─ miss ──► ResolverChain ─┴─► store ──► decoder.decode(parcel, context)
//! ```
//!
//! ## Guarantees
//!
//! - Once a (scope, name) pair is cached, every later lookup returns the same
//!   decoder instance for the rest of the process. There is no eviction.
//! - Failed resolutions are never cached; the next read tries again.
//! - Decoding runs outside the cache lock, so scope-aware decoders can read
//!   nested values through the same registry.
//!
//! ## Resolution modes
//!
//! With [`ResolutionMode::ExactlyOnce`] the cache lock is held while the
//! resolver chain runs, so concurrent misses on one key resolve once. With
//! [`ResolutionMode::AtLeastOnce`] the chain runs unlocked and the first
//! decoder stored wins; every caller still gets the stored instance.

use super::resolver_chain::{ResolverChain, ResolverChainStats};
use super::resolvers::{ExplicitMappingResolver, NamespaceResolver};
use super::DecoderResolver;
use crate::config::{ConfigLoader, RegistryConfig, ResolutionMode};
use crate::constants::operations;
use crate::decoder::{DecodeContext, Decoder};
use crate::error::{RegistryError, RegistryResult};
use crate::log_registry;
use crate::namespace::TypeNamespace;
use crate::parcel::Parcel;
use crate::parcelable::{self, Parcelable};
use crate::scope::Scope;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{trace, warn};

type DecoderCache = HashMap<Scope, HashMap<String, Decoder>>;

static GLOBAL_REGISTRY: OnceLock<DecoderRegistry> = OnceLock::new();

/// Concurrency-safe, two-level decoder cache in front of a resolver chain.
pub struct DecoderRegistry {
    chain: ResolverChain,
    explicit: Arc<ExplicitMappingResolver>,
    cache: Mutex<DecoderCache>,
    config: RegistryConfig,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    resolution_failures: AtomicU64,
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("DecoderRegistry");
        debug
            .field("resolvers", &self.chain.resolver_names())
            .field("resolution_mode", &self.config.resolution_mode);
        // A resolution in progress holds the lock
        if let Some(cache) = self.cache.try_lock() {
            debug.field("cached_scopes", &cache.len()).field(
                "cached_decoders",
                &cache.values().map(HashMap::len).sum::<usize>(),
            );
        }
        debug.finish_non_exhaustive()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderRegistry {
    /// Registry with default configuration and only explicit mappings.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::builder().with_config(config).build()
    }

    #[must_use]
    pub fn builder() -> DecoderRegistryBuilder {
        DecoderRegistryBuilder::default()
    }

    /// The process-wide registry.
    ///
    /// Created on first use from [`ConfigLoader::load`], falling back to the
    /// default configuration if loading fails. Never torn down.
    pub fn global() -> &'static DecoderRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            let config = ConfigLoader::load().unwrap_or_else(|error| {
                warn!(error = %error, "Failed to load registry configuration, using defaults");
                RegistryConfig::default()
            });
            Self::with_config(config)
        })
    }

    /// Install `registry` as the process-wide registry.
    ///
    /// Fails, handing the registry back, if [`DecoderRegistry::global`] was
    /// already initialized.
    pub fn install_global(registry: DecoderRegistry) -> Result<(), DecoderRegistry> {
        GLOBAL_REGISTRY.set(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn resolver_chain(&self) -> &ResolverChain {
        &self.chain
    }

    /// The explicit mapping resolver that [`DecoderRegistry::register`] fills.
    pub fn explicit_mappings(&self) -> &Arc<ExplicitMappingResolver> {
        &self.explicit
    }

    /// Register `decoder` for `type_name` within `scope`.
    ///
    /// A (scope, name) pair that is already cached keeps its cached decoder.
    pub fn register(
        &self,
        scope: Scope,
        type_name: impl Into<String>,
        decoder: Decoder,
    ) -> RegistryResult<()> {
        let type_name = type_name.into();
        if type_name.is_empty() {
            return Err(RegistryError::InvalidRegistration(
                "type name must not be empty".to_string(),
            ));
        }
        if type_name.len() > self.config.max_type_name_length {
            return Err(RegistryError::InvalidRegistration(format!(
                "type name '{}' is {} bytes, limit is {}",
                type_name,
                type_name.len(),
                self.config.max_type_name_length
            )));
        }

        let scope_aware = decoder.is_scope_aware();
        let replaced = self
            .explicit
            .register(scope.clone(), type_name.clone(), decoder)
            .is_some();

        log_registry!(
            debug,
            operations::REGISTER,
            scope: scope,
            type_name: type_name,
            scope_aware: scope_aware,
            replaced: replaced
        );
        Ok(())
    }

    /// Read a type name from `parcel` and return its decoder.
    ///
    /// `Ok(None)` when the stream holds no name (end of stream or a null
    /// marker).
    pub fn read_decoder(&self, parcel: &mut Parcel, scope: &Scope) -> RegistryResult<Option<Decoder>> {
        let Some(type_name) = parcel.read_type_name()? else {
            trace!(%scope, position = parcel.position(), "No type name in parcel");
            return Ok(None);
        };

        if type_name.len() > self.config.max_type_name_length {
            return Err(RegistryError::malformed(format!(
                "type name of {} bytes exceeds limit of {}",
                type_name.len(),
                self.config.max_type_name_length
            )));
        }

        self.decoder_for(&type_name, scope).map(Some)
    }

    /// Decoder for an already known type name, resolving on a cache miss.
    pub fn decoder_for(&self, type_name: &str, scope: &Scope) -> RegistryResult<Decoder> {
        match self.config.resolution_mode {
            ResolutionMode::ExactlyOnce => {
                let mut cache = self.cache.lock();
                if let Some(decoder) = Self::lookup(&cache, type_name, scope) {
                    self.record_hit(type_name, scope);
                    return Ok(decoder);
                }
                self.cache_misses.fetch_add(1, Ordering::Relaxed);

                let decoder = self.resolve_uncached(type_name, scope)?;
                Ok(self.store(&mut cache, type_name, scope, decoder))
            }
            ResolutionMode::AtLeastOnce => {
                let cached = Self::lookup(&self.cache.lock(), type_name, scope);
                if let Some(decoder) = cached {
                    self.record_hit(type_name, scope);
                    return Ok(decoder);
                }
                self.cache_misses.fetch_add(1, Ordering::Relaxed);

                let decoder = self.resolve_uncached(type_name, scope)?;
                let mut cache = self.cache.lock();
                Ok(self.store(&mut cache, type_name, scope, decoder))
            }
        }
    }

    /// Read one type-tagged value from `parcel`.
    ///
    /// Scope-aware decoders receive `scope` and this registry so they can read
    /// nested values the same way.
    pub fn read_parcelable(
        &self,
        parcel: &mut Parcel,
        scope: &Scope,
    ) -> RegistryResult<Option<Box<dyn Parcelable>>> {
        let Some(decoder) = self.read_decoder(parcel, scope)? else {
            return Ok(None);
        };

        let context = DecodeContext::new(self, scope);
        decoder.decode(parcel, &context).map(Some)
    }

    /// Typed variant of [`DecoderRegistry::read_parcelable`].
    ///
    /// Fails with `TypeMismatch` if the record decodes to some other type.
    pub fn read_parcelable_as<T: Parcelable>(
        &self,
        parcel: &mut Parcel,
        scope: &Scope,
    ) -> RegistryResult<Option<T>> {
        let Some(value) = self.read_parcelable(parcel, scope)? else {
            return Ok(None);
        };

        let actual = value.type_name().to_string();
        value
            .downcast::<T>()
            .map(|value| Some(*value))
            .ok_or_else(|| RegistryError::TypeMismatch {
                expected: std::any::type_name::<T>().to_string(),
                actual,
            })
    }

    /// Write `value` tagged with its type name; `None` writes the null marker.
    pub fn write_parcelable(
        &self,
        parcel: &mut Parcel,
        value: Option<&dyn Parcelable>,
    ) -> RegistryResult<()> {
        if let Some(value) = value {
            if value.type_name().len() > self.config.max_type_name_length {
                return Err(RegistryError::malformed(format!(
                    "type name '{}' exceeds limit of {} bytes",
                    value.type_name(),
                    self.config.max_type_name_length
                )));
            }
        }

        parcelable::write_parcelable(parcel, value)
    }

    #[must_use]
    pub fn is_cached(&self, scope: &Scope, type_name: &str) -> bool {
        Self::lookup(&self.cache.lock(), type_name, scope).is_some()
    }

    /// Cached type names in `scope`, sorted.
    #[must_use]
    pub fn cached_type_names(&self, scope: &Scope) -> Vec<String> {
        let mut names: Vec<String> = self
            .cache
            .lock()
            .get(scope)
            .map(|names| names.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let (cached_scopes, cached_decoders) = {
            let cache = self.cache.lock();
            (cache.len(), cache.values().map(HashMap::len).sum())
        };

        RegistryStats {
            cached_scopes,
            cached_decoders,
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            resolution_failures: self.resolution_failures.load(Ordering::Relaxed),
            resolution_mode: self.config.resolution_mode,
            explicit_registrations: self.explicit.len(),
            resolvers: self.chain.stats(),
        }
    }

    fn lookup(cache: &DecoderCache, type_name: &str, scope: &Scope) -> Option<Decoder> {
        cache
            .get(scope)
            .and_then(|names| names.get(type_name))
            .cloned()
    }

    fn record_hit(&self, type_name: &str, scope: &Scope) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        trace!(type_name, %scope, "Decoder cache hit");
    }

    fn resolve_uncached(&self, type_name: &str, scope: &Scope) -> RegistryResult<Decoder> {
        match self.chain.resolve(type_name, scope) {
            Ok(decoder) => {
                log_registry!(
                    debug,
                    operations::RESOLVE,
                    scope: scope,
                    type_name: type_name,
                    scope_aware: decoder.is_scope_aware()
                );
                Ok(decoder)
            }
            Err(error) => {
                self.resolution_failures.fetch_add(1, Ordering::Relaxed);
                log_registry!(
                    warn,
                    operations::RESOLVE_FAILED,
                    scope: scope,
                    type_name: type_name,
                    error: error.to_string()
                );
                Err(error)
            }
        }
    }

    /// First write wins; returns whatever ends up stored.
    fn store(
        &self,
        cache: &mut DecoderCache,
        type_name: &str,
        scope: &Scope,
        decoder: Decoder,
    ) -> Decoder {
        let names = cache.entry(scope.clone()).or_default();
        let stored = names
            .entry(type_name.to_string())
            .or_insert(decoder)
            .clone();

        log_registry!(
            trace,
            operations::CACHE_STORE,
            scope: scope,
            type_name: type_name,
            cached_in_scope: names.len()
        );
        stored
    }
}

/// Builder for [`DecoderRegistry`].
#[derive(Debug, Default)]
pub struct DecoderRegistryBuilder {
    config: RegistryConfig,
    namespace: Option<Arc<dyn TypeNamespace>>,
    resolvers: Vec<Arc<dyn DecoderResolver>>,
}

impl DecoderRegistryBuilder {
    #[must_use]
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve cache misses through `namespace` after explicit mappings.
    ///
    /// The namespace resolver reads the configured decoder field.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Arc<dyn TypeNamespace>) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Add a custom resolver; it is placed in the chain by priority.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn DecoderResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    #[must_use]
    pub fn build(self) -> DecoderRegistry {
        let explicit = Arc::new(
            ExplicitMappingResolver::new().with_scope_fallback(self.config.scope_fallback),
        );

        let mut chain = ResolverChain::new().with_resolver(explicit.clone());
        if let Some(namespace) = self.namespace {
            chain.add_resolver(Arc::new(
                NamespaceResolver::with_decoder_field(namespace, self.config.decoder_field.clone())
                    .with_scope_fallback(self.config.scope_fallback),
            ));
        }
        for resolver in self.resolvers {
            chain.add_resolver(resolver);
        }

        DecoderRegistry {
            chain,
            explicit,
            cache: Mutex::new(HashMap::new()),
            config: self.config,
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            resolution_failures: AtomicU64::new(0),
        }
    }
}

/// Point-in-time registry statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub cached_scopes: usize,
    pub cached_decoders: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub resolution_failures: u64,
    pub resolution_mode: ResolutionMode,
    pub explicit_registrations: usize,
    pub resolvers: ResolverChainStats,
}
