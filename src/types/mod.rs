//! Raw cell types produced by cursors.

mod value;

pub use value::{CellKind, RawCell, TIMESTAMP_FORMAT};
