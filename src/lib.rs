//! rowbind - result-set binding for SQL cursors
//!
//! Rows read from a [`Cursor`] are bound into typed destinations: a single
//! value, a record, a `Vec` of either, a map keyed by the first column, or a
//! map of `Vec`s. Record fields are matched to columns by name (or by a tag)
//! once per record type and cached in a shared [`TagStore`].
//!
//! ```
//! use std::collections::HashMap;
//! use rowbind::{record, Loader, MemoryCursor, RawCell};
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     id: i64,
//!     display_name: String,
//! }
//!
//! record!(User { id, display_name => "name" });
//!
//! let loader = Loader::default();
//! let mut cursor = MemoryCursor::new(["id", "name"])
//!     .row([RawCell::Int(1), RawCell::from("ada")])
//!     .row([RawCell::Int(2), RawCell::from("grace")]);
//!
//! let mut users: Vec<User> = Vec::new();
//! assert_eq!(loader.load(&mut cursor, &mut users).unwrap(), 2);
//! assert_eq!(users[1].display_name, "grace");
//!
//! let mut cursor = MemoryCursor::new(["id", "name"])
//!     .row([RawCell::Int(1), RawCell::from("ada")]);
//! let mut names: HashMap<i64, String> = HashMap::new();
//! loader.load(&mut cursor, &mut names).unwrap();
//! assert_eq!(names[&1], "ada");
//! ```

pub mod binding;
pub mod convert;
pub mod cursor;
pub mod dialect;
pub mod error;
pub mod loader;
pub mod shape;
pub mod tag_store;
pub mod types;

pub use binding::{Bind, Dest, Element, Field, Layout, Nullable, Slot};
pub use convert::{convert, ConvertError, Decode};
pub use cursor::{Cursor, MemoryCursor, RowReader};
pub use dialect::{Dialect, MySql, Now};
pub use error::{LoadError, Result, RowbindError};
pub use loader::{ExtraRows, Loader, LoaderConfig};
pub use shape::{Destination, ShapeDescriptor, ShapeKind};
pub use tag_store::{BindingPlan, CacheRetention, TagStore, TagStoreStats};
pub use types::{CellKind, RawCell, TIMESTAMP_FORMAT};
