//! # Parcel Cursor
//!
//! Minimal sequential reader/writer for type-tagged binary records.
//!
//! ## Wire Format
//!
//! ```text
//! i32 / bool   4 bytes, little-endian (bool is 0 or 1)
//! i64 / f64    8 bytes, little-endian
//! string       i32 byte length (-1 = null), UTF-8 bytes, zero padding to 4
//! ```
//!
//! A record written by [`crate::DecoderRegistry::write_parcelable`] is a type
//! name string followed by whatever the value's decoder expects to read.
//!
//! ## Usage
//!
//! ```rust
//! use parcel_registry::Parcel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut parcel = Parcel::new();
//! parcel.write_string(Some("geometry.Point"))?;
//! parcel.write_i32(3);
//!
//! parcel.rewind();
//! assert_eq!(parcel.read_type_name()?.as_deref(), Some("geometry.Point"));
//! assert_eq!(parcel.read_i32()?, 3);
//! assert_eq!(parcel.read_type_name()?, None);
//! # Ok(())
//! # }
//! ```

use crate::constants::wire::{ALIGNMENT, NULL_STRING_LENGTH};
use crate::error::RegistryError;
use thiserror::Error;

/// Errors raised while reading or writing parcel primitives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParcelError {
    #[error("Parcel truncated at offset {position}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        position: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Invalid string length {length} at offset {position}")]
    NegativeLength { position: usize, length: i32 },

    #[error("String at offset {position} is not valid UTF-8")]
    InvalidUtf8 { position: usize },

    #[error("Invalid boolean value {value} at offset {position}")]
    InvalidBool { position: usize, value: i32 },

    #[error("String of {length} bytes exceeds the maximum encodable length")]
    StringTooLong { length: usize },
}

pub type ParcelResult<T> = std::result::Result<T, ParcelError>;

impl From<ParcelError> for RegistryError {
    fn from(error: ParcelError) -> Self {
        RegistryError::malformed(error.to_string())
    }
}

/// Growable byte buffer with a single read cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parcel {
    data: Vec<u8>,
    position: usize,
}

impl Parcel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing record bytes, positioned at the start.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the read cursor, clamped to the end of the data.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.data.len());
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    // ---- writes -------------------------------------------------------

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_i32(i32::from(value));
    }

    /// Write a length-prefixed string, or the null marker for `None`.
    pub fn write_string(&mut self, value: Option<&str>) -> ParcelResult<()> {
        let Some(value) = value else {
            self.write_i32(NULL_STRING_LENGTH);
            return Ok(());
        };

        let length = i32::try_from(value.len()).map_err(|_| ParcelError::StringTooLong {
            length: value.len(),
        })?;
        self.write_i32(length);
        self.data.extend_from_slice(value.as_bytes());
        self.data
            .resize(self.data.len() + padding_for(value.len()), 0);
        Ok(())
    }

    // ---- reads --------------------------------------------------------

    pub fn read_i32(&mut self) -> ParcelResult<i32> {
        let bytes = self.take::<4>()?;
        Ok(i32::from_le_bytes(bytes))
    }

    pub fn read_i64(&mut self) -> ParcelResult<i64> {
        let bytes = self.take::<8>()?;
        Ok(i64::from_le_bytes(bytes))
    }

    pub fn read_f64(&mut self) -> ParcelResult<f64> {
        let bytes = self.take::<8>()?;
        Ok(f64::from_le_bytes(bytes))
    }

    pub fn read_bool(&mut self) -> ParcelResult<bool> {
        let position = self.position;
        match self.read_i32()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(ParcelError::InvalidBool { position, value }),
        }
    }

    /// Read a length-prefixed string; `None` for the null marker.
    pub fn read_string(&mut self) -> ParcelResult<Option<String>> {
        let start = self.position;
        let length = self.read_i32()?;
        if length == NULL_STRING_LENGTH {
            return Ok(None);
        }
        let length = usize::try_from(length).map_err(|_| {
            self.position = start;
            ParcelError::NegativeLength {
                position: start,
                length,
            }
        })?;

        let body_start = self.position;
        let padded = length + padding_for(length);
        if self.remaining() < padded {
            let remaining = self.remaining();
            self.position = start;
            return Err(ParcelError::Truncated {
                position: body_start,
                needed: padded,
                remaining,
            });
        }

        let bytes = &self.data[body_start..body_start + length];
        let Ok(value) = std::str::from_utf8(bytes).map(str::to_owned) else {
            self.position = start;
            return Err(ParcelError::InvalidUtf8 {
                position: body_start,
            });
        };
        self.position = body_start + padded;
        Ok(Some(value))
    }

    /// Read the type tag of the next record.
    ///
    /// End of stream and the null marker both mean "no value" and yield
    /// `Ok(None)`; a partially present tag is an error.
    pub fn read_type_name(&mut self) -> ParcelResult<Option<String>> {
        if self.is_exhausted() {
            return Ok(None);
        }
        self.read_string()
    }

    fn take<const N: usize>(&mut self) -> ParcelResult<[u8; N]> {
        if self.remaining() < N {
            return Err(ParcelError::Truncated {
                position: self.position,
                needed: N,
                remaining: self.remaining(),
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.position..self.position + N]);
        self.position += N;
        Ok(bytes)
    }
}

fn padding_for(length: usize) -> usize {
    (ALIGNMENT - length % ALIGNMENT) % ALIGNMENT
}
