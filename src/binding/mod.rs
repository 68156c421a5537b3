//! Destinations that raw cells are written into.
//!
//! Three traits describe what a load can write to:
//!
//! - [`Slot`]: a single writable value. It hands the converter a typed
//!   [`Dest`]. Primitives, `String`, `Vec<u8>`, chrono timestamps and
//!   `Option<T>` are slots; so is any type implementing
//!   [`Decode`](crate::convert::Decode) through [`custom_decode!`](crate::custom_decode).
//! - [`Bind`]: something a row (or a run of its columns) is bound into. Every
//!   slot binds as a scalar; [`record!`](crate::record) makes a struct bind as
//!   a record whose fields are matched by column name.
//! - [`Element`]: a [`Bind`] type that may be allocated once per row as the
//!   element of a list or map destination.

mod scalar;

use std::any::type_name;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::convert::{ConvertError, Decode};
use crate::types::RawCell;

/// A typed, writable destination for one cell.
pub enum Dest<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Bool(&'a mut bool),
    Text(&'a mut String),
    Bytes(&'a mut Vec<u8>),
    Timestamp(&'a mut NaiveDateTime),
    TimestampUtc(&'a mut DateTime<Utc>),
    Date(&'a mut NaiveDate),
    /// A destination with a null representation.
    Nullable(&'a mut dyn Nullable),
    /// A destination that interprets cells itself.
    Custom(&'a mut dyn Decode),
    /// Sink for columns that have no destination.
    Discard,
}

impl Dest<'_> {
    /// Name of the destination type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Dest::I8(_) => "i8",
            Dest::I16(_) => "i16",
            Dest::I32(_) => "i32",
            Dest::I64(_) => "i64",
            Dest::U8(_) => "u8",
            Dest::U16(_) => "u16",
            Dest::U32(_) => "u32",
            Dest::U64(_) => "u64",
            Dest::F32(_) => "f32",
            Dest::F64(_) => "f64",
            Dest::Bool(_) => "bool",
            Dest::Text(_) => "String",
            Dest::Bytes(_) => "Vec<u8>",
            Dest::Timestamp(_) => "NaiveDateTime",
            Dest::TimestampUtc(_) => "DateTime<Utc>",
            Dest::Date(_) => "NaiveDate",
            Dest::Nullable(n) => n.type_name(),
            Dest::Custom(d) => d.type_name(),
            Dest::Discard => "discard",
        }
    }
}

/// A single writable value.
pub trait Slot {
    /// Typed destination for this value.
    fn dest(&mut self) -> Dest<'_>;
}

/// A destination that can represent null.
pub trait Nullable {
    /// Stores the null representation.
    fn set_null(&mut self);

    /// Stores a non-null cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell cannot be converted.
    fn fill(&mut self, cell: &RawCell) -> Result<(), ConvertError>;

    /// Name of the nullable type, for error messages.
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// One named field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field identifier.
    pub name: &'static str,
    /// Column name override.
    pub tag: Option<&'static str>,
}

impl Field {
    /// Tag that excludes a field from column matching.
    pub const SKIP: &'static str = "-";

    /// Creates a field description.
    #[must_use]
    pub const fn new(name: &'static str, tag: Option<&'static str>) -> Self {
        Field { name, tag }
    }

    /// The column name this field answers to, or `None` if it is skipped.
    #[must_use]
    pub fn column_name(&self) -> Option<&'static str> {
        match self.tag {
            Some(tag) if tag == Self::SKIP => None,
            Some(tag) => Some(tag),
            None => Some(self.name),
        }
    }
}

/// How columns are laid onto a [`Bind`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The first column binds to the value itself.
    Scalar,
    /// Columns bind to fields by name.
    Record(&'static [Field]),
}

/// A value that columns can be bound into.
pub trait Bind: Default + 'static {
    /// Column layout of this type.
    fn layout() -> Layout {
        Layout::Scalar
    }

    /// Destination for the field at `locator` (ignored for scalars).
    fn locate(&mut self, locator: usize) -> Dest<'_>;
}

impl<T: Slot + Default + 'static> Bind for T {
    fn locate(&mut self, _locator: usize) -> Dest<'_> {
        self.dest()
    }
}

/// A [`Bind`] type usable as the per-row element of a list or map.
///
/// `u8` and `Vec<u8>` are not elements, so that `Vec<u8>` stays a byte value
/// rather than a list of rows. Byte values get their own destination impls.
pub trait Element: Bind {}

/// Implements [`Bind`] and [`Element`] for a struct with named fields, so it
/// loads as a record.
///
/// Each listed field must implement [`Slot`]. A field may carry a column-name
/// override after `=>`; the override `"-"` keeps the field out of matching.
///
/// ```
/// #[derive(Debug, Default)]
/// struct User {
///     id: i64,
///     full_name: String,
///     cached: bool,
/// }
///
/// rowbind::record!(User {
///     id,
///     full_name => "name",
///     cached => "-",
/// });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident $(=> $tag:literal)?),* $(,)? }) => {
        impl $crate::Bind for $ty {
            fn layout() -> $crate::Layout {
                const FIELDS: &[$crate::Field] = &[
                    $($crate::Field::new(stringify!($field), $crate::__record_tag!($($tag)?))),*
                ];
                $crate::Layout::Record(FIELDS)
            }

            #[allow(unused_assignments)]
            fn locate(&mut self, locator: usize) -> $crate::Dest<'_> {
                let mut index = 0usize;
                $(
                    if locator == index {
                        return $crate::Slot::dest(&mut self.$field);
                    }
                    index += 1;
                )*
                $crate::Dest::Discard
            }
        }

        impl $crate::Element for $ty {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_tag {
    () => {
        None
    };
    ($tag:literal) => {
        Some($tag)
    };
}

/// Implements [`Slot`] and [`Element`] for a type implementing
/// [`Decode`](crate::convert::Decode), so every cell bound to it goes through
/// its own decoding.
#[macro_export]
macro_rules! custom_decode {
    ($ty:ty) => {
        impl $crate::Slot for $ty {
            fn dest(&mut self) -> $crate::Dest<'_> {
                $crate::Dest::Custom(self)
            }
        }

        impl $crate::Element for $ty {}
    };
}
