//! Current-timestamp value for statements.

use chrono::{Local, NaiveDateTime, Utc};

use crate::types::RawCell;

/// Current-timestamp value resolved when the statement is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Now {
    /// Use UTC instead of the local time zone.
    pub utc: bool,
}

impl Now {
    /// The current time, local or UTC.
    #[must_use]
    pub fn naive(&self) -> NaiveDateTime {
        if self.utc {
            Utc::now().naive_utc()
        } else {
            Local::now().naive_local()
        }
    }

    /// The current time rendered as a timestamp literal body.
    #[must_use]
    pub fn value(&self) -> String {
        RawCell::format_timestamp(&self.naive())
    }
}
