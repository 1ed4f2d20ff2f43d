//! # Isolation Scopes
//!
//! A [`Scope`] partitions both type lookup and the decoder cache, the way a
//! plugin or module namespace would. The registry only hashes and compares
//! scopes; it never looks inside them.

use std::fmt;
use std::sync::Arc;

/// Opaque cache-partition key.
///
/// Either the distinguished default scope or a named scope. Two named scopes
/// are the same scope iff their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Scope {
    name: Option<Arc<str>>,
}

impl Scope {
    /// The default scope, used when a caller has no namespace of its own.
    pub fn default_scope() -> Self {
        Self { name: None }
    }

    pub fn named(name: impl AsRef<str>) -> Self {
        Self {
            name: Some(Arc::from(name.as_ref())),
        }
    }

    pub fn is_default(&self) -> bool {
        self.name.is_none()
    }

    /// Name of a named scope, `None` for the default scope.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "<default>"),
        }
    }
}
