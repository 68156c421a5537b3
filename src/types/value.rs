//! `RawCell` and `CellKind` definitions.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Fixed textual timestamp format, used both to parse text into timestamps
/// and to render timestamps as text.
///
/// `%.f` accepts an optional fractional part when parsing; rendering goes
/// through [`RawCell::format_timestamp`] with six fractional digits.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Rendering counterpart of [`TIMESTAMP_FORMAT`].
pub(crate) const TIMESTAMP_RENDER_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Dynamic type of a raw cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Boolean.
    Bool,
    /// UTF-8 text.
    Text,
    /// Raw byte sequence.
    Bytes,
    /// Timestamp without time zone.
    Timestamp,
}

impl CellKind {
    /// Returns the name of the kind as shown in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CellKind::Null => "NULL",
            CellKind::Int => "INT",
            CellKind::Float => "FLOAT",
            CellKind::Bool => "BOOL",
            CellKind::Text => "TEXT",
            CellKind::Bytes => "BYTES",
            CellKind::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One column's value for one row, as reported by the cursor.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawCell {
    /// SQL NULL.
    #[default]
    Null,
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Text value.
    Text(String),
    /// Byte sequence.
    Bytes(Vec<u8>),
    /// Timestamp value.
    Timestamp(NaiveDateTime),
}

impl RawCell {
    /// Returns the dynamic kind of this cell.
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self {
            RawCell::Null => CellKind::Null,
            RawCell::Int(_) => CellKind::Int,
            RawCell::Float(_) => CellKind::Float,
            RawCell::Bool(_) => CellKind::Bool,
            RawCell::Text(_) => CellKind::Text,
            RawCell::Bytes(_) => CellKind::Bytes,
            RawCell::Timestamp(_) => CellKind::Timestamp,
        }
    }

    /// Returns true if this cell is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, RawCell::Null)
    }

    /// Attempts to extract an i64 value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawCell::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract a text reference.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawCell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to extract a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawCell::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Renders a timestamp in the fixed literal format.
    #[must_use]
    pub fn format_timestamp(ts: &NaiveDateTime) -> String {
        ts.format(TIMESTAMP_RENDER_FORMAT).to_string()
    }
}

impl From<i64> for RawCell {
    fn from(v: i64) -> Self {
        RawCell::Int(v)
    }
}

impl From<i32> for RawCell {
    fn from(v: i32) -> Self {
        RawCell::Int(i64::from(v))
    }
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Float(v)
    }
}

impl From<bool> for RawCell {
    fn from(v: bool) -> Self {
        RawCell::Bool(v)
    }
}

impl From<&str> for RawCell {
    fn from(v: &str) -> Self {
        RawCell::Text(v.to_string())
    }
}

impl From<String> for RawCell {
    fn from(v: String) -> Self {
        RawCell::Text(v)
    }
}

impl From<Vec<u8>> for RawCell {
    fn from(v: Vec<u8>) -> Self {
        RawCell::Bytes(v)
    }
}

impl From<&[u8]> for RawCell {
    fn from(v: &[u8]) -> Self {
        RawCell::Bytes(v.to_vec())
    }
}

impl From<NaiveDateTime> for RawCell {
    fn from(v: NaiveDateTime) -> Self {
        RawCell::Timestamp(v)
    }
}

impl<T: Into<RawCell>> From<Option<T>> for RawCell {
    fn from(v: Option<T>) -> Self {
        v.map_or(RawCell::Null, Into::into)
    }
}
