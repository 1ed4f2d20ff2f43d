//! # Namespace Resolver
//!
//! Fallback resolver that finds a type in a [`TypeNamespace`] and reads the
//! decoder singleton out of the type's static decoder field.
//!
//! ## Priority
//!
//! Priority: **100** (checked after explicit mappings)
//!
//! ## Lookup Steps
//!
//! | Step | Check | Failure |
//! |------|-------|---------|
//! | 1 | type exists in scope | `TypeNotFound` |
//! | 2 | type declares the decoder field | `DecoderFieldMissing` |
//! | 3 | field is static | `DecoderFieldNotStatic` |
//! | 4 | field holds a decoder | `DecoderFieldWrongType` |
//! | 5 | type and field are visible | `AccessDenied` |
//!
//! Only step 1 lets the chain move on to another resolver. The other four
//! mean the type was found but is unusable. A type removed from the namespace
//! between steps 1 and 2 is reported as `TypeNotFound` too.
//!
//! ## Scope Fallback
//!
//! With fallback enabled (the default), a type missing from a named scope is
//! looked up in the default scope next. The namespace itself only answers
//! exact-scope lookups.

use crate::constants::defaults::DECODER_FIELD;
use crate::constants::resolvers::{NAMESPACE_NAME, NAMESPACE_PRIORITY};
use crate::decoder::Decoder;
use crate::error::{BadRecordKind, RegistryError, RegistryResult};
use crate::namespace::{FieldLookup, FieldValue, TypeLookup, TypeNamespace};
use crate::registry::DecoderResolver;
use crate::scope::Scope;
use std::sync::Arc;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    namespace: Arc<dyn TypeNamespace>,
    decoder_field: String,
    scope_fallback: bool,
}

impl NamespaceResolver {
    /// Resolver reading the standard `CREATOR` field.
    pub fn new(namespace: Arc<dyn TypeNamespace>) -> Self {
        Self::with_decoder_field(namespace, DECODER_FIELD)
    }

    pub fn with_decoder_field(
        namespace: Arc<dyn TypeNamespace>,
        decoder_field: impl Into<String>,
    ) -> Self {
        Self {
            namespace,
            decoder_field: decoder_field.into(),
            scope_fallback: true,
        }
    }

    #[must_use]
    pub fn with_scope_fallback(mut self, enabled: bool) -> Self {
        self.scope_fallback = enabled;
        self
    }

    pub fn scope_fallback(&self) -> bool {
        self.scope_fallback
    }

    pub fn decoder_field(&self) -> &str {
        &self.decoder_field
    }

    pub fn namespace(&self) -> &Arc<dyn TypeNamespace> {
        &self.namespace
    }
}

impl DecoderResolver for NamespaceResolver {
    fn resolve(&self, type_name: &str, scope: &Scope) -> RegistryResult<Decoder> {
        let mut lookup = self.namespace.find_type(type_name, scope);
        if matches!(lookup, TypeLookup::NotFound) && self.scope_fallback && !scope.is_default() {
            trace!(type_name, %scope, "Falling back to default scope");
            lookup = self
                .namespace
                .find_type(type_name, &Scope::default_scope());
        }

        let handle = match lookup {
            TypeLookup::Found(handle) => handle,
            TypeLookup::NotFound => return Err(RegistryError::type_not_found(type_name)),
            TypeLookup::AccessDenied => {
                warn!(type_name, %scope, "Type is not accessible");
                return Err(RegistryError::bad_record(
                    BadRecordKind::AccessDenied,
                    type_name,
                ));
            }
        };

        let kind = match self
            .namespace
            .read_static_field(&handle, &self.decoder_field)
        {
            FieldLookup::Value(FieldValue::Decoder(decoder)) => {
                debug!(
                    type_name,
                    defining_scope = %handle.defining_scope(),
                    field = %self.decoder_field,
                    "Read decoder field"
                );
                return Ok(decoder);
            }
            FieldLookup::Missing => BadRecordKind::DecoderFieldMissing,
            FieldLookup::InstanceBound => BadRecordKind::DecoderFieldNotStatic,
            FieldLookup::Value(FieldValue::Opaque(description)) => {
                debug!(type_name, value = %description, "Decoder field holds a non-decoder value");
                BadRecordKind::DecoderFieldWrongType
            }
            FieldLookup::AccessDenied => BadRecordKind::AccessDenied,
            FieldLookup::TypeRemoved => {
                debug!(type_name, %scope, "Type removed during resolution");
                return Err(RegistryError::type_not_found(type_name));
            }
        };

        warn!(
            type_name,
            %scope,
            field = %self.decoder_field,
            kind = kind.as_str(),
            "Type found but its decoder field is unusable"
        );
        Err(RegistryError::bad_record(kind, type_name))
    }

    fn resolver_name(&self) -> &str {
        NAMESPACE_NAME
    }

    fn priority(&self) -> u32 {
        NAMESPACE_PRIORITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{FieldDeclaration, TypeDeclaration, TypeTable};
    use crate::parcel::Parcel;
    use crate::parcelable::Parcelable;

    #[derive(Debug)]
    struct Point;

    impl Parcelable for Point {
        fn type_name(&self) -> &str {
            "Point"
        }

        fn write_to_parcel(&self, _parcel: &mut Parcel) -> RegistryResult<()> {
            Ok(())
        }
    }

    fn point_decoder() -> Decoder {
        Decoder::from_fn("Point", |_parcel| Ok(Box::new(Point)))
    }

    fn resolver_with(scope: &Scope, declaration: TypeDeclaration) -> NamespaceResolver {
        let table = TypeTable::new();
        table.declare(scope, declaration);
        NamespaceResolver::new(Arc::new(table))
    }

    fn assert_kind(result: RegistryResult<Decoder>, kind: BadRecordKind) {
        let error = result.unwrap_err();
        assert_eq!(error.kind(), Some(kind), "unexpected error: {error}");
        assert_eq!(error.type_name(), Some("Point"));
    }

    #[test]
    fn test_resolves_static_decoder_field() {
        let decoder = point_decoder();
        let scope = Scope::named("s1");
        let resolver = resolver_with(
            &scope,
            TypeDeclaration::new("Point")
                .with_field("CREATOR", FieldDeclaration::static_decoder(decoder.clone())),
        );

        let resolved = resolver.resolve("Point", &scope).unwrap();
        assert!(resolved.same_instance(&decoder));
    }

    #[test]
    fn test_type_not_found() {
        let resolver = resolver_with(
            &Scope::named("s1"),
            TypeDeclaration::new("Point")
                .with_field("CREATOR", FieldDeclaration::static_decoder(point_decoder())),
        );
        assert_kind(
            resolver.resolve("Point", &Scope::named("s2")),
            BadRecordKind::TypeNotFound,
        );
    }

    #[test]
    fn test_named_scope_falls_back_to_default() {
        let decoder = point_decoder();
        let resolver = resolver_with(
            &Scope::default_scope(),
            TypeDeclaration::new("Point")
                .with_field("CREATOR", FieldDeclaration::static_decoder(decoder.clone())),
        );

        assert!(resolver.scope_fallback());
        let resolved = resolver.resolve("Point", &Scope::named("plugin")).unwrap();
        assert!(resolved.same_instance(&decoder));
    }

    #[test]
    fn test_fallback_disabled() {
        let resolver = resolver_with(
            &Scope::default_scope(),
            TypeDeclaration::new("Point")
                .with_field("CREATOR", FieldDeclaration::static_decoder(point_decoder())),
        )
        .with_scope_fallback(false);

        assert_kind(
            resolver.resolve("Point", &Scope::named("plugin")),
            BadRecordKind::TypeNotFound,
        );
        assert!(resolver.resolve("Point", &Scope::default_scope()).is_ok());
    }

    #[test]
    fn test_named_declaration_shadows_default() {
        let scope = Scope::named("plugin");
        let table = TypeTable::new();
        table.declare(
            &Scope::default_scope(),
            TypeDeclaration::new("Point")
                .with_field("CREATOR", FieldDeclaration::static_opaque("i32: 7")),
        );
        let decoder = point_decoder();
        table.declare(
            &scope,
            TypeDeclaration::new("Point")
                .with_field("CREATOR", FieldDeclaration::static_decoder(decoder.clone())),
        );
        let resolver = NamespaceResolver::new(Arc::new(table));

        assert!(resolver.resolve("Point", &scope).unwrap().same_instance(&decoder));
    }

    /// Finds every type but loses it before its fields are read.
    #[derive(Debug)]
    struct VanishingNamespace;

    impl TypeNamespace for VanishingNamespace {
        fn find_type(&self, name: &str, scope: &Scope) -> TypeLookup {
            TypeLookup::Found(crate::namespace::TypeHandle::new(name, scope.clone()))
        }

        fn read_static_field(
            &self,
            _handle: &crate::namespace::TypeHandle,
            _field_name: &str,
        ) -> FieldLookup {
            FieldLookup::TypeRemoved
        }
    }

    #[test]
    fn test_type_removed_mid_lookup_is_type_not_found() {
        let resolver = NamespaceResolver::new(Arc::new(VanishingNamespace));
        assert_kind(
            resolver.resolve("Point", &Scope::named("s1")),
            BadRecordKind::TypeNotFound,
        );
    }

    #[test]
    fn test_decoder_field_missing() {
        let scope = Scope::default_scope();
        let resolver = resolver_with(&scope, TypeDeclaration::new("Point"));
        assert_kind(
            resolver.resolve("Point", &scope),
            BadRecordKind::DecoderFieldMissing,
        );
    }

    #[test]
    fn test_decoder_field_not_static() {
        let scope = Scope::default_scope();
        let resolver = resolver_with(
            &scope,
            TypeDeclaration::new("Point").with_field(
                "CREATOR",
                FieldDeclaration::instance(FieldValue::Decoder(point_decoder())),
            ),
        );
        assert_kind(
            resolver.resolve("Point", &scope),
            BadRecordKind::DecoderFieldNotStatic,
        );
    }

    #[test]
    fn test_decoder_field_wrong_type() {
        let scope = Scope::default_scope();
        let resolver = resolver_with(
            &scope,
            TypeDeclaration::new("Point")
                .with_field("CREATOR", FieldDeclaration::static_opaque("i32: 7")),
        );
        assert_kind(
            resolver.resolve("Point", &scope),
            BadRecordKind::DecoderFieldWrongType,
        );
    }

    #[test]
    fn test_private_field_is_access_denied() {
        let scope = Scope::default_scope();
        let resolver = resolver_with(
            &scope,
            TypeDeclaration::new("Point").with_field(
                "CREATOR",
                FieldDeclaration::static_decoder(point_decoder()).private(),
            ),
        );
        assert_kind(
            resolver.resolve("Point", &scope),
            BadRecordKind::AccessDenied,
        );
    }

    #[test]
    fn test_private_type_is_access_denied() {
        let scope = Scope::default_scope();
        let resolver = resolver_with(
            &scope,
            TypeDeclaration::new("Point")
                .with_field("CREATOR", FieldDeclaration::static_decoder(point_decoder()))
                .private(),
        );
        assert_kind(
            resolver.resolve("Point", &scope),
            BadRecordKind::AccessDenied,
        );
    }

    #[test]
    fn test_custom_decoder_field() {
        let scope = Scope::default_scope();
        let table = TypeTable::new();
        table.declare(
            &scope,
            TypeDeclaration::new("Point")
                .with_field("DECODER", FieldDeclaration::static_decoder(point_decoder())),
        );
        let resolver = NamespaceResolver::with_decoder_field(Arc::new(table), "DECODER");

        assert_eq!(resolver.decoder_field(), "DECODER");
        assert!(resolver.resolve("Point", &scope).is_ok());
    }

    #[test]
    fn test_priority_and_name() {
        let resolver = NamespaceResolver::new(Arc::new(TypeTable::new()));
        assert_eq!(resolver.priority(), 100);
        assert_eq!(resolver.resolver_name(), "NamespaceResolver");
        assert_eq!(resolver.decoder_field(), "CREATOR");
    }
}
