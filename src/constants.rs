//! # Registry Constants
//!
//! Wire-format markers, well-known names and defaults shared by the parcel
//! cursor, the resolvers and the configuration layer.

/// Parcel wire format
pub mod wire {
    /// Length prefix written in place of a string to mark "no value"
    pub const NULL_STRING_LENGTH: i32 = -1;

    /// Every primitive and every string body is padded to this many bytes
    pub const ALIGNMENT: usize = 4;
}

/// Resolver names and chain priorities (lower = checked first)
pub mod resolvers {
    pub const EXPLICIT_MAPPING_NAME: &str = "ExplicitMappingResolver";
    pub const EXPLICIT_MAPPING_PRIORITY: u32 = 10;

    pub const NAMESPACE_NAME: &str = "NamespaceResolver";
    pub const NAMESPACE_PRIORITY: u32 = 100;

    pub const DEFAULT_PRIORITY: u32 = 100;
}

/// Configuration defaults and environment variable names
pub mod defaults {
    /// Field a type declares to expose its decoder singleton
    pub const DECODER_FIELD: &str = "CREATOR";

    pub const MAX_TYPE_NAME_LENGTH: usize = 1024;

    pub const ENV_PREFIX: &str = "PARCEL_REGISTRY";
    pub const CONFIG_PATH_ENV: &str = "PARCEL_REGISTRY_CONFIG_PATH";
    pub const ENVIRONMENT_ENV: &str = "PARCEL_REGISTRY_ENV";
}

/// Operation names used in structured registry logs
pub mod operations {
    pub const REGISTER: &str = "register";
    pub const RESOLVE: &str = "resolve";
    pub const RESOLVE_FAILED: &str = "resolve_failed";
    pub const CACHE_STORE: &str = "cache_store";
}
