//! Text, byte and timestamp coercions.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{RawCell, TIMESTAMP_FORMAT};

use super::numeric::text_of;
use super::ConvertError;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn render(cell: &RawCell) -> Option<String> {
    match cell {
        RawCell::Int(i) => Some(i.to_string()),
        RawCell::Float(f) => Some(f.to_string()),
        RawCell::Bool(b) => Some(b.to_string()),
        RawCell::Timestamp(ts) => Some(RawCell::format_timestamp(ts)),
        RawCell::Null | RawCell::Text(_) | RawCell::Bytes(_) => None,
    }
}

pub(super) fn to_text(cell: &RawCell) -> Result<String, ConvertError> {
    match cell {
        RawCell::Text(s) => Ok(s.clone()),
        RawCell::Bytes(_) => text_of(cell, "String").map(str::to_owned),
        other => render(other).ok_or_else(|| ConvertError::unsupported(other, "String")),
    }
}

pub(super) fn to_bytes(cell: &RawCell) -> Result<Vec<u8>, ConvertError> {
    match cell {
        RawCell::Bytes(b) => Ok(b.clone()),
        RawCell::Text(s) => Ok(s.as_bytes().to_vec()),
        other => render(other)
            .map(String::into_bytes)
            .ok_or_else(|| ConvertError::unsupported(other, "Vec<u8>")),
    }
}

pub(super) fn to_timestamp(
    cell: &RawCell,
    target: &'static str,
) -> Result<NaiveDateTime, ConvertError> {
    match cell {
        RawCell::Timestamp(ts) => Ok(*ts),
        RawCell::Text(_) | RawCell::Bytes(_) => {
            let text = text_of(cell, target)?.trim();
            NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|_| {
                ConvertError::Invalid {
                    kind: cell.kind(),
                    value: text.to_string(),
                    target,
                }
            })
        }
        _ => Err(ConvertError::unsupported(cell, target)),
    }
}

pub(super) fn to_date(cell: &RawCell) -> Result<NaiveDate, ConvertError> {
    match cell {
        RawCell::Timestamp(ts) => Ok(ts.date()),
        RawCell::Text(_) | RawCell::Bytes(_) => {
            let text = text_of(cell, "NaiveDate")?.trim();
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map(|ts| ts.date())
                })
                .map_err(|_| ConvertError::Invalid {
                    kind: cell.kind(),
                    value: text.to_string(),
                    target: "NaiveDate",
                })
        }
        _ => Err(ConvertError::unsupported(cell, "NaiveDate")),
    }
}
