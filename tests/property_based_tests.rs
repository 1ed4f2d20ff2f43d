mod common;

use common::*;
use parcel_registry::{
    Decoder, DecoderRegistry, DecoderResolver, Parcel, RegistryError, RegistryResult, Scope,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Resolves every name to the point decoder, counting calls.
#[derive(Debug, Default)]
struct AnyNameResolver {
    calls: AtomicUsize,
}

impl DecoderResolver for AnyNameResolver {
    fn resolve(&self, _type_name: &str, _scope: &Scope) -> RegistryResult<Decoder> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Point::decoder())
    }

    fn resolver_name(&self) -> &str {
        "AnyNameResolver"
    }
}

proptest! {
    /// Property: strings read back exactly and leave the cursor 4-byte aligned
    #[test]
    fn strings_survive_the_parcel(value in any_string_strategy()) {
        let mut parcel = Parcel::new();
        parcel.write_string(Some(&value)).unwrap();
        prop_assert_eq!(parcel.len() % 4, 0);

        parcel.rewind();
        prop_assert_eq!(parcel.read_string().unwrap(), Some(value));
        prop_assert!(parcel.is_exhausted());
    }

    /// Property: any point written through the registry reads back unchanged
    #[test]
    fn points_decode_to_what_was_written(point in point_strategy(), scope_name in scope_name_strategy()) {
        let scope = Scope::named(scope_name);
        let registry = DecoderRegistry::new();
        registry.register(scope.clone(), POINT, Point::decoder()).unwrap();

        let mut parcel = Parcel::new();
        registry.write_parcelable(&mut parcel, Some(&point)).unwrap();
        parcel.rewind();

        let decoded = registry.read_parcelable_as::<Point>(&mut parcel, &scope).unwrap();
        prop_assert_eq!(decoded, Some(point));
    }

    /// Property: every strict, non-empty prefix of a record is malformed
    #[test]
    fn truncated_records_are_malformed(point in point_strategy(), cut in 1usize..28) {
        let scope = Scope::default_scope();
        let registry = DecoderRegistry::new();
        registry.register(scope.clone(), POINT, Point::decoder()).unwrap();

        let bytes = record_of(&[&point]).into_bytes();
        prop_assert_eq!(bytes.len(), 28);

        let mut parcel = Parcel::from_bytes(&bytes[..cut]);
        let result = registry.read_parcelable(&mut parcel, &scope);
        prop_assert!(
            matches!(result, Err(RegistryError::MalformedRecord { .. })),
            "cut at {} gave {:?}", cut, result
        );
    }

    /// Property: each distinct (scope, name) resolves once, whatever the lookup order
    #[test]
    fn each_key_resolves_once(
        names in prop::collection::hash_set(type_name_strategy(), 1..8),
        lookups in lookup_sequence_strategy(3, 8),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let scopes = [Scope::default_scope(), Scope::named("a"), Scope::named("b")];
        let resolver = Arc::new(AnyNameResolver::default());
        let registry = DecoderRegistry::builder().with_resolver(resolver.clone()).build();

        let mut distinct = HashSet::new();
        for (scope_index, name_index) in lookups {
            let scope = &scopes[scope_index];
            let name = &names[name_index % names.len()];
            let decoder = registry.decoder_for(name, scope).unwrap();
            prop_assert!(decoder.same_instance(&Point::decoder()));
            distinct.insert((scope_index, name.clone()));
        }

        prop_assert_eq!(resolver.calls.load(Ordering::SeqCst), distinct.len());
        prop_assert_eq!(registry.stats().cached_decoders, distinct.len());
    }
}
