//! Integer, float and boolean coercions.

use crate::types::RawCell;

use super::ConvertError;

/// Textual payload of a text or byte cell, if it is valid UTF-8.
pub(super) fn text_of<'a>(
    cell: &'a RawCell,
    target: &'static str,
) -> Result<&'a str, ConvertError> {
    match cell {
        RawCell::Text(s) => Ok(s.as_str()),
        RawCell::Bytes(b) => std::str::from_utf8(b).map_err(|_| ConvertError::Invalid {
            kind: cell.kind(),
            value: String::from_utf8_lossy(b).into_owned(),
            target,
        }),
        _ => Err(ConvertError::unsupported(cell, target)),
    }
}

fn invalid(cell: &RawCell, value: impl ToString, target: &'static str) -> ConvertError {
    ConvertError::Invalid {
        kind: cell.kind(),
        value: value.to_string(),
        target,
    }
}

/// Largest magnitude at which every integral f64 still fits an i128.
const I128_FLOAT_LIMIT: f64 = 1.7e38;

fn to_wide_int(cell: &RawCell, target: &'static str) -> Result<i128, ConvertError> {
    match cell {
        RawCell::Int(i) => Ok(i128::from(*i)),
        RawCell::Bool(b) => Ok(i128::from(*b)),
        RawCell::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < I128_FLOAT_LIMIT {
                Ok(*f as i128)
            } else {
                Err(invalid(cell, f, target))
            }
        }
        RawCell::Text(_) | RawCell::Bytes(_) => {
            let text = text_of(cell, target)?.trim();
            text.parse::<i128>().map_err(|_| invalid(cell, text, target))
        }
        RawCell::Null | RawCell::Timestamp(_) => Err(ConvertError::unsupported(cell, target)),
    }
}

/// Stores `cell` into an integer destination, range-checked.
pub(super) fn store_int<T>(
    cell: &RawCell,
    dest: &mut T,
    target: &'static str,
) -> Result<(), ConvertError>
where
    T: TryFrom<i128>,
{
    let wide = to_wide_int(cell, target)?;
    *dest = T::try_from(wide).map_err(|_| ConvertError::OutOfRange {
        kind: cell.kind(),
        value: wide.to_string(),
        target,
    })?;
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
pub(super) fn to_float(cell: &RawCell, target: &'static str) -> Result<f64, ConvertError> {
    match cell {
        RawCell::Int(i) => Ok(*i as f64),
        RawCell::Float(f) => Ok(*f),
        RawCell::Text(_) | RawCell::Bytes(_) => {
            let text = text_of(cell, target)?.trim();
            text.parse::<f64>().map_err(|_| invalid(cell, text, target))
        }
        _ => Err(ConvertError::unsupported(cell, target)),
    }
}

/// Accepted boolean spellings.
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

pub(super) fn to_bool(cell: &RawCell) -> Result<bool, ConvertError> {
    match cell {
        RawCell::Bool(b) => Ok(*b),
        RawCell::Int(0) => Ok(false),
        RawCell::Int(1) => Ok(true),
        RawCell::Int(i) => Err(invalid(cell, i, "bool")),
        RawCell::Text(_) | RawCell::Bytes(_) => {
            let text = text_of(cell, "bool")?.trim();
            parse_bool(text).ok_or_else(|| invalid(cell, text, "bool"))
        }
        _ => Err(ConvertError::unsupported(cell, "bool")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellKind;

    fn int<T>(cell: RawCell, target: &'static str) -> Result<T, ConvertError>
    where
        T: TryFrom<i128> + Default,
    {
        let mut value = T::default();
        store_int(&cell, &mut value, target)?;
        Ok(value)
    }

    #[test]
    fn test_int_from_each_supported_kind() {
        assert_eq!(int::<i64>(RawCell::Int(-5), "i64").unwrap(), -5);
        assert_eq!(int::<i32>(RawCell::Float(12.0), "i32").unwrap(), 12);
        assert_eq!(int::<u8>(RawCell::Bool(true), "u8").unwrap(), 1);
        assert_eq!(int::<i16>(RawCell::from(" 42 "), "i16").unwrap(), 42);
        assert_eq!(int::<u64>(RawCell::from(b"7".as_slice()), "u64").unwrap(), 7);
    }

    #[test]
    fn test_int_range_checked() {
        let err = int::<u8>(RawCell::Int(256), "u8").unwrap_err();
        assert_eq!(
            err,
            ConvertError::OutOfRange {
                kind: CellKind::Int,
                value: "256".into(),
                target: "u8"
            }
        );
        assert!(int::<u32>(RawCell::Int(-1), "u32").is_err());
        assert_eq!(
            int::<u64>(RawCell::from("18446744073709551615"), "u64").unwrap(),
            u64::MAX
        );
        assert!(matches!(
            int::<i8>(RawCell::from("300"), "i8"),
            Err(ConvertError::OutOfRange { kind: CellKind::Text, .. })
        ));
    }

    #[test]
    fn test_fractional_float_is_not_an_int() {
        let err = int::<i64>(RawCell::Float(1.5), "i64").unwrap_err();
        assert!(matches!(err, ConvertError::Invalid { .. }));
        assert!(int::<i64>(RawCell::Float(f64::NAN), "i64").is_err());
    }

    #[test]
    fn test_timestamp_to_int_unsupported() {
        let ts = chrono::NaiveDateTime::default();
        let err = int::<i64>(RawCell::Timestamp(ts), "i64").unwrap_err();
        assert!(matches!(err, ConvertError::Unsupported { target: "i64", .. }));
    }

    #[test]
    fn test_float_conversions() {
        assert!((to_float(&RawCell::Int(3), "f64").unwrap() - 3.0).abs() < f64::EPSILON);
        assert!((to_float(&RawCell::from("2.5"), "f64").unwrap() - 2.5).abs() < f64::EPSILON);
        assert!(to_float(&RawCell::Bool(true), "f64").is_err());
        assert!(to_float(&RawCell::from("abc"), "f64").is_err());
    }

    #[test]
    fn test_bool_encodings() {
        assert!(to_bool(&RawCell::Int(1)).unwrap());
        assert!(!to_bool(&RawCell::Int(0)).unwrap());
        assert!(to_bool(&RawCell::Int(2)).is_err());
        assert!(to_bool(&RawCell::from("TRUE")).unwrap());
        assert!(!to_bool(&RawCell::from(b"f".as_slice())).unwrap());
        assert!(to_bool(&RawCell::from("yes")).is_err());
        assert!(to_bool(&RawCell::Float(1.0)).is_err());
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        let err = to_float(&RawCell::Bytes(vec![0xff, 0xfe]), "f64").unwrap_err();
        assert!(matches!(err, ConvertError::Invalid { .. }));
    }
}
