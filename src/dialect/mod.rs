//! SQL literal encoding for the write path.
//!
//! The loader never uses this module. It encodes values for outgoing
//! statements; [`MySql::decode_string`] reverses string literals so encoded
//! values can be checked against what a load returns.

mod mysql;
mod now;

pub use mysql::MySql;
pub use now::Now;

use chrono::{DateTime, Utc};

/// Per-dialect identifier quoting and literal encoding.
pub trait Dialect {
    /// Quotes an identifier; dotted names are quoted part by part.
    fn quote_ident(&self, ident: &str) -> String;

    /// Encodes a string literal.
    fn encode_string(&self, s: &str) -> String;

    /// Encodes a boolean literal.
    fn encode_bool(&self, b: bool) -> String;

    /// Encodes a timestamp literal.
    fn encode_time(&self, t: DateTime<Utc>) -> String;

    /// Encodes a byte-string literal.
    fn encode_bytes(&self, b: &[u8]) -> String;

    /// Placeholder for the positional parameter at `index` (0-based).
    fn placeholder(&self, index: usize) -> String;
}

/// Quotes each dot-separated part of `ident` with `quote`, doubling any
/// embedded quote character.
pub(crate) fn quote_ident(ident: &str, quote: char) -> String {
    ident
        .split('.')
        .map(|part| {
            let escaped = part.replace(quote, &format!("{quote}{quote}"));
            format!("{quote}{escaped}{quote}")
        })
        .collect::<Vec<_>>()
        .join(".")
}
