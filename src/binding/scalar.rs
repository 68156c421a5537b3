//! [`Slot`] and [`Element`] implementations for built-in value types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::convert::{convert, ConvertError};
use crate::types::RawCell;

use super::{Dest, Element, Nullable, Slot};

macro_rules! slot {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Slot for $ty {
                fn dest(&mut self) -> Dest<'_> {
                    Dest::$variant(self)
                }
            }
        )*
    };
}

slot! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Text,
    Vec<u8> => Bytes,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampUtc,
    NaiveDate => Date,
}

macro_rules! element {
    ($($ty:ty),* $(,)?) => {
        $(impl Element for $ty {})*
    };
}

element!(
    i8,
    i16,
    i32,
    i64,
    u16,
    u32,
    u64,
    f32,
    f64,
    bool,
    String,
    NaiveDateTime,
    DateTime<Utc>,
    NaiveDate,
);

impl<T: Slot + Default> Nullable for Option<T> {
    fn set_null(&mut self) {
        *self = None;
    }

    fn fill(&mut self, cell: &RawCell) -> Result<(), ConvertError> {
        let mut value = T::default();
        convert(cell, value.dest())?;
        *self = Some(value);
        Ok(())
    }
}

impl<T: Slot + Default> Slot for Option<T> {
    fn dest(&mut self) -> Dest<'_> {
        Dest::Nullable(self)
    }
}

impl<T: Slot + Default + 'static> Element for Option<T> {}

/// The unit slot discards whatever is bound to it.
impl Slot for () {
    fn dest(&mut self) -> Dest<'_> {
        Dest::Discard
    }
}
