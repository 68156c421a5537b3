//! Coercion of raw cells into typed destinations.
//!
//! [`convert`] applies three rules in order:
//!
//! 1. A [`Dest::Custom`] destination receives every cell, null included,
//!    through its [`Decode`] implementation.
//! 2. A null cell sets a [`Dest::Nullable`] destination to null and leaves
//!    every other destination untouched.
//! 3. Otherwise the cell is coerced to the destination type: numeric
//!    widening and narrowing, boolean encodings, text and byte conversions,
//!    and timestamp parsing with [`TIMESTAMP_FORMAT`](crate::types::TIMESTAMP_FORMAT).
//!    Pairs outside that matrix fail with [`ConvertError::Unsupported`].

mod numeric;
mod text;

use std::any::type_name;

use thiserror::Error;

use crate::binding::Dest;
use crate::types::{CellKind, RawCell};

/// Caller-defined decoding of raw cells.
///
/// Implement this for types that interpret cells themselves, then register
/// the type with [`custom_decode!`](crate::custom_decode).
pub trait Decode {
    /// Decodes `cell` into `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is not acceptable for this type.
    fn decode(&mut self, cell: &RawCell) -> Result<(), ConvertError>;

    /// Name of the decoding type, for error messages.
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Failure to coerce one cell into one destination.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// No coercion exists from this cell kind to this destination type.
    #[error("unsupported conversion from {kind} into {target}")]
    Unsupported { kind: CellKind, target: &'static str },

    /// The cell kind is convertible but this value is not.
    #[error("invalid {kind} value {value:?} for {target}")]
    Invalid {
        kind: CellKind,
        value: String,
        target: &'static str,
    },

    /// The value does not fit the destination type.
    #[error("{kind} value {value} out of range for {target}")]
    OutOfRange {
        kind: CellKind,
        value: String,
        target: &'static str,
    },

    /// Failure reported by a [`Decode`] implementation.
    #[error("{0}")]
    Custom(String),
}

impl ConvertError {
    /// Creates a [`ConvertError::Custom`] error.
    pub fn custom(message: impl Into<String>) -> Self {
        ConvertError::Custom(message.into())
    }

    /// Creates a [`ConvertError::Unsupported`] error for `cell`.
    #[must_use]
    pub fn unsupported(cell: &RawCell, target: &'static str) -> Self {
        ConvertError::Unsupported {
            kind: cell.kind(),
            target,
        }
    }
}

/// Writes `cell` into `dest`, coercing it to the destination type.
///
/// # Errors
///
/// Returns an error if the cell cannot be represented in the destination, or
/// if a custom decoder rejects it.
pub fn convert(cell: &RawCell, dest: Dest<'_>) -> Result<(), ConvertError> {
    match dest {
        Dest::Custom(decoder) => decoder.decode(cell),
        Dest::Discard => Ok(()),
        Dest::Nullable(slot) => {
            if cell.is_null() {
                slot.set_null();
                Ok(())
            } else {
                slot.fill(cell)
            }
        }
        _ if cell.is_null() => Ok(()),
        Dest::I8(d) => numeric::store_int(cell, d, "i8"),
        Dest::I16(d) => numeric::store_int(cell, d, "i16"),
        Dest::I32(d) => numeric::store_int(cell, d, "i32"),
        Dest::I64(d) => numeric::store_int(cell, d, "i64"),
        Dest::U8(d) => numeric::store_int(cell, d, "u8"),
        Dest::U16(d) => numeric::store_int(cell, d, "u16"),
        Dest::U32(d) => numeric::store_int(cell, d, "u32"),
        Dest::U64(d) => numeric::store_int(cell, d, "u64"),
        Dest::F32(d) => {
            let value = numeric::to_float(cell, "f32")?;
            let narrowed = value as f32;
            if value.is_finite() && narrowed.is_infinite() {
                return Err(ConvertError::OutOfRange {
                    kind: cell.kind(),
                    value: value.to_string(),
                    target: "f32",
                });
            }
            *d = narrowed;
            Ok(())
        }
        Dest::F64(d) => {
            *d = numeric::to_float(cell, "f64")?;
            Ok(())
        }
        Dest::Bool(d) => {
            *d = numeric::to_bool(cell)?;
            Ok(())
        }
        Dest::Text(d) => {
            *d = text::to_text(cell)?;
            Ok(())
        }
        Dest::Bytes(d) => {
            *d = text::to_bytes(cell)?;
            Ok(())
        }
        Dest::Timestamp(d) => {
            *d = text::to_timestamp(cell, "NaiveDateTime")?;
            Ok(())
        }
        Dest::TimestampUtc(d) => {
            *d = text::to_timestamp(cell, "DateTime<Utc>")?.and_utc();
            Ok(())
        }
        Dest::Date(d) => {
            *d = text::to_date(cell)?;
            Ok(())
        }
    }
}
