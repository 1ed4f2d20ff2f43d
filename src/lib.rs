#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Parcel Registry
//!
//! Resolves the type name embedded in a serialized record (a *parcel*) to the
//! decoder that reconstructs a value of that type, and memoizes the
//! resolution so later records of the same type skip the lookup.
//!
//! ## Overview
//!
//! ```text
//! write value -> tag with type name -> [record bytes] -> read tag -> find decoder -> decode
//! ```
//!
//! Resolutions are cached per [`Scope`] (a plugin or module namespace) and per
//! type name. A cached decoder stays cached for the life of the process;
//! failed resolutions are never cached.
//!
//! ## Module Organization
//!
//! - [`registry`] - Decoder cache, resolver chain and built-in resolvers
//! - [`namespace`] - Type lookup collaborator and the in-memory [`namespace::TypeTable`]
//! - [`decoder`] - Plain and scope-aware decoders
//! - [`parcel`] - Little-endian, 4-byte aligned record cursor
//! - [`parcelable`] - Values that can be written to and read from a parcel
//! - [`config`] - Registry configuration from files and environment
//! - [`error`] - Structured error handling
//! - [`logging`] - Console logging setup and registry log macro
//!
//! ## Quick Start
//!
//! ```rust
//! use parcel_registry::{Decoder, DecoderRegistry, Parcel, Parcelable, RegistryResult, Scope};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Parcelable for Point {
//!     fn type_name(&self) -> &str {
//!         "geometry.Point"
//!     }
//!
//!     fn write_to_parcel(&self, parcel: &mut Parcel) -> RegistryResult<()> {
//!         parcel.write_i32(self.x);
//!         parcel.write_i32(self.y);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> RegistryResult<()> {
//! let registry = DecoderRegistry::new();
//! let scope = Scope::named("geometry-plugin");
//!
//! registry.register(
//!     scope.clone(),
//!     "geometry.Point",
//!     Decoder::from_fn("Point", |parcel| {
//!         Ok(Box::new(Point {
//!             x: parcel.read_i32()?,
//!             y: parcel.read_i32()?,
//!         }))
//!     }),
//! )?;
//!
//! let mut parcel = Parcel::new();
//! registry.write_parcelable(&mut parcel, Some(&Point { x: 1, y: 2 }))?;
//! parcel.rewind();
//!
//! let point = registry.read_parcelable_as::<Point>(&mut parcel, &scope)?;
//! assert_eq!(point, Some(Point { x: 1, y: 2 }));
//! assert!(registry.is_cached(&scope, "geometry.Point"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod logging;
pub mod namespace;
pub mod parcel;
pub mod parcelable;
pub mod registry;
pub mod scope;

pub use config::{ConfigLoader, ConfigurationError, RegistryConfig, ResolutionMode};
pub use decoder::{Decode, DecodeContext, Decoder, ScopedDecode};
pub use error::{BadRecordKind, RegistryError, RegistryResult};
pub use namespace::{TypeNamespace, TypeTable};
pub use parcel::{Parcel, ParcelError, ParcelResult};
pub use parcelable::Parcelable;
pub use registry::{
    DecoderRegistry, DecoderRegistryBuilder, DecoderResolver, RegistryStats, ResolverChain,
};
pub use scope::Scope;
