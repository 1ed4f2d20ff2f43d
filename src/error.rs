//! Error types for decoder resolution and record decoding.
//!

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a record naming a type could not be turned into a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadRecordKind {
    /// No type with that name exists in the scope's namespace
    TypeNotFound,
    /// The type exists but declares no decoder field
    DecoderFieldMissing,
    /// The decoder field needs an instance to be read
    DecoderFieldNotStatic,
    /// The decoder field holds something that is not a decoder
    DecoderFieldWrongType,
    /// The type or its decoder field is not visible to the registry
    AccessDenied,
}

impl BadRecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadRecordKind::TypeNotFound => "type_not_found",
            BadRecordKind::DecoderFieldMissing => "decoder_field_missing",
            BadRecordKind::DecoderFieldNotStatic => "decoder_field_not_static",
            BadRecordKind::DecoderFieldWrongType => "decoder_field_wrong_type",
            BadRecordKind::AccessDenied => "access_denied",
        }
    }
}

impl fmt::Display for BadRecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadRecordKind::TypeNotFound => write!(f, "type not found"),
            BadRecordKind::DecoderFieldMissing => {
                write!(f, "type does not declare a decoder field")
            }
            BadRecordKind::DecoderFieldNotStatic => {
                write!(f, "decoder field must be static")
            }
            BadRecordKind::DecoderFieldWrongType => {
                write!(f, "decoder field does not hold a decoder")
            }
            BadRecordKind::AccessDenied => write!(f, "access denied"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The record stream is truncated or the type name is unreadable
    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// The type name was read but could not be resolved to a decoder
    #[error("Bad record for type '{type_name}': {kind}")]
    BadRecord {
        kind: BadRecordKind,
        type_name: String,
    },

    /// A typed read decoded a value of some other type
    #[error("Decoded value has type '{actual}', expected '{expected}'")]
    TypeMismatch { expected: String, actual: String },

    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),
}

impl RegistryError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        RegistryError::MalformedRecord {
            reason: reason.into(),
        }
    }

    pub fn bad_record(kind: BadRecordKind, type_name: impl Into<String>) -> Self {
        RegistryError::BadRecord {
            kind,
            type_name: type_name.into(),
        }
    }

    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        Self::bad_record(BadRecordKind::TypeNotFound, type_name)
    }

    /// Sub-kind of a `BadRecord` error.
    pub fn kind(&self) -> Option<BadRecordKind> {
        match self {
            RegistryError::BadRecord { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Offending type name of a `BadRecord` error.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            RegistryError::BadRecord { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    pub fn is_type_not_found(&self) -> bool {
        self.kind() == Some(BadRecordKind::TypeNotFound)
    }
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
