//! MySQL dialect.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{Result, RowbindError};
use crate::types::RawCell;

use super::{quote_ident, Dialect};

/// MySQL literal encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySql {
    /// Offset timestamps are shifted to before encoding; UTC when `None`.
    pub time_offset: Option<FixedOffset>,
}

impl MySql {
    /// Creates a dialect encoding timestamps in UTC.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dialect encoding timestamps at `offset`.
    #[must_use]
    pub fn with_time_offset(offset: FixedOffset) -> Self {
        MySql {
            time_offset: Some(offset),
        }
    }

    /// Decodes a literal produced by [`Dialect::encode_string`].
    ///
    /// # Errors
    ///
    /// Returns [`RowbindError::InvalidLiteral`] if `literal` is not a
    /// single-quoted, backslash-escaped string.
    pub fn decode_string(literal: &str) -> Result<String> {
        let inner = literal
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .ok_or_else(|| {
                RowbindError::InvalidLiteral(format!("not a string literal: {literal}"))
            })?;

        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escaped = chars.next().ok_or_else(|| {
                RowbindError::InvalidLiteral(format!("dangling escape in {literal}"))
            })?;
            out.push(match escaped {
                '0' => '\0',
                'b' => '\u{8}',
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'Z' => '\u{1a}',
                other => other,
            });
        }
        Ok(out)
    }
}

impl Dialect for MySql {
    fn quote_ident(&self, ident: &str) -> String {
        quote_ident(ident, '`')
    }

    fn encode_string(&self, s: &str) -> String {
        let mut buf = String::with_capacity(s.len() + 2);
        buf.push('\'');
        for c in s.chars() {
            match c {
                '\0' => buf.push_str("\\0"),
                '\'' => buf.push_str("\\'"),
                '"' => buf.push_str("\\\""),
                '\u{8}' => buf.push_str("\\b"),
                '\n' => buf.push_str("\\n"),
                '\r' => buf.push_str("\\r"),
                '\t' => buf.push_str("\\t"),
                '\u{1a}' => buf.push_str("\\Z"),
                '\\' => buf.push_str("\\\\"),
                other => buf.push(other),
            }
        }
        buf.push('\'');
        buf
    }

    fn encode_bool(&self, b: bool) -> String {
        String::from(if b { "1" } else { "0" })
    }

    fn encode_time(&self, t: DateTime<Utc>) -> String {
        let local = match self.time_offset {
            Some(offset) => t.with_timezone(&offset).naive_local(),
            None => t.naive_utc(),
        };
        format!("'{}'", RawCell::format_timestamp(&local))
    }

    fn encode_bytes(&self, b: &[u8]) -> String {
        let mut out = String::with_capacity(2 + b.len() * 2);
        out.push_str("0x");
        for byte in b {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}
