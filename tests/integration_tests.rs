//! Integration tests for the full load workflow.

use std::collections::{BTreeMap, HashMap};

use rowbind::{record, ExtraRows, Loader, LoaderConfig, MemoryCursor, RawCell, RowbindError};

#[derive(Debug, Default, Clone, PartialEq)]
struct User {
    id: i64,
    display_name: String,
    age: i32,
    email: Option<String>,
}

record!(User {
    id,
    display_name => "name",
    age,
    email,
});

fn users_cursor() -> MemoryCursor {
    MemoryCursor::new(["id", "Name", "age", "email"])
        .row([
            RawCell::Int(1),
            RawCell::from("ada"),
            RawCell::Int(36),
            RawCell::from("ada@example.com"),
        ])
        .row([RawCell::Int(2), RawCell::from("grace"), RawCell::Null, RawCell::Null])
        .row([
            RawCell::Int(3),
            RawCell::from("linus"),
            RawCell::from("54"),
            RawCell::Null,
        ])
}

// =============================================================================
// Shape Integration Tests
// =============================================================================

mod shape_integration {
    use super::*;

    #[test]
    fn test_slice_of_records_in_cursor_order() {
        let loader = Loader::default();
        let mut cursor = users_cursor();
        let mut users: Vec<User> = Vec::new();

        assert_eq!(loader.load(&mut cursor, &mut users).unwrap(), 3);
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(users[0].email.as_deref(), Some("ada@example.com"));
        assert_eq!(users[1].age, 0);
        assert_eq!(users[1].email, None);
        assert_eq!(users[2].age, 54);
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_record_takes_first_row() {
        let loader = Loader::default();
        let mut cursor = users_cursor();
        let mut user = User::default();

        assert_eq!(loader.load(&mut cursor, &mut user).unwrap(), 1);
        assert_eq!(user.display_name, "ada");
        assert_eq!(cursor.rows_advanced(), 3);
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_slice_of_scalars_binds_first_column() {
        let loader = Loader::default();
        let mut cursor = users_cursor();
        let mut ids: Vec<u32> = Vec::new();
        loader.load(&mut cursor, &mut ids).unwrap();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_slice_appends_to_existing_elements() {
        let loader = Loader::default();
        let mut cursor = MemoryCursor::new(["id"]).row([RawCell::Int(2)]);
        let mut ids = vec![1i64];
        assert_eq!(loader.load(&mut cursor, &mut ids).unwrap(), 1);
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn test_map_is_reset_before_loading() {
        let loader = Loader::default();
        let mut cursor =
            MemoryCursor::new(["id", "name"]).row([RawCell::Int(5), RawCell::from("e")]);
        let mut map: BTreeMap<i64, String> = BTreeMap::new();
        map.insert(9, "stale".into());

        loader.load(&mut cursor, &mut map).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&5], "e");
    }

    #[test]
    fn test_map_of_records_keyed_by_first_column() {
        #[derive(Debug, Default)]
        struct Profile {
            name: String,
            age: Option<i32>,
        }
        record!(Profile { name, age });

        let loader = Loader::default();
        let mut cursor = users_cursor();
        let mut profiles: HashMap<i64, Profile> = HashMap::new();

        assert_eq!(loader.load(&mut cursor, &mut profiles).unwrap(), 3);
        assert_eq!(profiles[&1].name, "ada");
        assert_eq!(profiles[&2].age, None);
        assert_eq!(profiles[&3].age, Some(54));
    }

    #[test]
    fn test_byte_values_are_not_slices() {
        let loader = Loader::default();
        let mut cursor = MemoryCursor::new(["payload"])
            .row([RawCell::from(vec![1u8, 2, 3])])
            .row([RawCell::from("ab")]);

        let mut blobs: Vec<Vec<u8>> = Vec::new();
        assert_eq!(loader.load(&mut cursor, &mut blobs).unwrap(), 2);
        assert_eq!(blobs, [vec![1u8, 2, 3], b"ab".to_vec()]);

        let mut cursor = MemoryCursor::new(["payload"]).row([RawCell::from(vec![7u8])]);
        let mut blob: Vec<u8> = Vec::new();
        assert_eq!(loader.load(&mut cursor, &mut blob).unwrap(), 1);
        assert_eq!(blob, [7u8]);
    }
}

// =============================================================================
// Custom Decode Integration Tests
// =============================================================================

mod custom_decode_integration {
    use super::*;
    use rowbind::{custom_decode, ConvertError, Decode};

    /// Records how each cell arrived instead of coercing it.
    #[derive(Debug, Default, PartialEq)]
    struct Audit(String);

    impl Decode for Audit {
        fn decode(&mut self, cell: &RawCell) -> Result<(), ConvertError> {
            match cell {
                RawCell::Text(s) if s.is_empty() => Err(ConvertError::custom("empty audit value")),
                other => {
                    self.0 = format!("{}:{other:?}", other.kind());
                    Ok(())
                }
            }
        }
    }

    custom_decode!(Audit);

    #[derive(Debug, Default)]
    struct Event {
        id: i64,
        audit: Audit,
    }

    record!(Event { id, audit });

    #[test]
    fn test_custom_decode_receives_raw_cell() {
        let loader = Loader::default();
        let mut cursor = MemoryCursor::new(["id", "audit"])
            .row([RawCell::Int(1), RawCell::Int(42)])
            .row([RawCell::Int(2), RawCell::Null]);
        let mut events: Vec<Event> = Vec::new();

        loader.load(&mut cursor, &mut events).unwrap();
        assert_eq!(events[0].audit, Audit("INT:Int(42)".into()));
        assert_eq!(events[1].audit, Audit("NULL:Null".into()));
    }

    #[test]
    fn test_custom_decode_scalar_and_slice() {
        let loader = Loader::default();
        let mut cursor = MemoryCursor::new(["v"]).row([RawCell::from("x")]);
        let mut single = Audit::default();
        loader.load(&mut cursor, &mut single).unwrap();
        assert_eq!(single.0, "TEXT:Text(\"x\")");

        let mut cursor = MemoryCursor::new(["v"])
            .row([RawCell::Bool(true)])
            .row([RawCell::Float(0.5)]);
        let mut many: Vec<Audit> = Vec::new();
        assert_eq!(loader.load(&mut cursor, &mut many).unwrap(), 2);
        assert_eq!(many[1].0, "FLOAT:Float(0.5)");
    }

    #[test]
    fn test_custom_decode_error_is_type_mismatch() {
        let loader = Loader::default();
        let mut cursor =
            MemoryCursor::new(["id", "audit"]).row([RawCell::Int(1), RawCell::from("")]);
        let mut events: Vec<Event> = Vec::new();

        let err = loader.load(&mut cursor, &mut events).unwrap_err();
        match err.source {
            RowbindError::TypeMismatch { column, source } => {
                assert_eq!(column, "audit");
                assert_eq!(source, ConvertError::custom("empty audit value"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(events.is_empty());
    }
}

// =============================================================================
// Failure Path Integration Tests
// =============================================================================

mod failure_integration {
    use super::*;

    #[test]
    fn test_fetch_failure_keeps_partial_rows() {
        let loader = Loader::default();
        let mut cursor = users_cursor().fail_fetch_at(2);
        let mut users: Vec<User> = Vec::new();

        let err = loader.load(&mut cursor, &mut users).unwrap_err();
        assert_eq!(err.rows, 2);
        assert!(matches!(err.source, RowbindError::Cursor(_)));
        assert_eq!(users.len(), 2);
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_convert_failure_names_column() {
        let loader = Loader::default();
        let mut cursor = MemoryCursor::new(["id", "age"])
            .row([RawCell::Int(1), RawCell::Int(30)])
            .row([RawCell::Int(2), RawCell::from("old")]);

        #[derive(Debug, Default)]
        struct Row {
            id: i64,
            age: u8,
        }
        record!(Row { id, age });

        let mut rows: Vec<Row> = Vec::new();
        let err = loader.load(&mut cursor, &mut rows).unwrap_err();
        assert_eq!(err.rows, 1);
        assert!(err.to_string().contains("column 'age'"));
        assert_eq!(rows[0].id, 1);
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_iteration_error_is_reported() {
        let loader = Loader::default();
        let mut cursor = users_cursor().fail_iteration("connection reset");
        let mut users: Vec<User> = Vec::new();

        let err = loader.load(&mut cursor, &mut users).unwrap_err();
        assert_eq!(err.rows, 3);
        assert_eq!(err.source.to_string(), "Cursor error: connection reset");
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_cancelled_cursor_stops_load() {
        let loader = Loader::default();
        let mut cursor = users_cursor().cancel_after(1);
        let mut users: Vec<User> = Vec::new();

        let err = loader.load(&mut cursor, &mut users).unwrap_err();
        assert_eq!(err.rows, 1);
        assert!(matches!(err.source, RowbindError::Cursor(_)));
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_close_error_after_success_is_reported() {
        let loader = Loader::default();
        let mut cursor = users_cursor().fail_close("release failed");
        let mut users: Vec<User> = Vec::new();

        let err = loader.load(&mut cursor, &mut users).unwrap_err();
        assert_eq!(err.rows, 3);
        assert_eq!(users.len(), 3);
        assert_eq!(err.source.to_string(), "Cursor error: release failed");
    }

    #[test]
    fn test_close_error_after_failure_keeps_first_error() {
        let loader = Loader::default();
        let mut cursor = users_cursor().fail_fetch_at(0).fail_close("release failed");
        let mut users: Vec<User> = Vec::new();

        let err = loader.load(&mut cursor, &mut users).unwrap_err();
        assert_eq!(err.rows, 0);
        assert!(err.source.to_string().contains("fetch failed"));
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_reject_extra_rows_for_record() {
        let loader = Loader::new(LoaderConfig::new().with_extra_rows(ExtraRows::Reject));
        let mut cursor = users_cursor();
        let mut user = User::default();

        let err = loader.load(&mut cursor, &mut user).unwrap_err();
        assert!(matches!(err.source, RowbindError::UnexpectedRows { extra: 2 }));
        assert_eq!(user.id, 1);
        assert_eq!(cursor.close_count(), 1);
    }
}

// =============================================================================
// Single-Row Integration Tests
// =============================================================================

mod single_row_integration {
    use super::*;
    use rowbind::Slot;

    #[test]
    fn test_load_one_record() {
        let loader = Loader::default();
        let mut cursor = users_cursor();
        let mut user = User::default();
        loader.load_one(&mut cursor, &mut user).unwrap();
        assert_eq!(user.display_name, "ada");
    }

    #[test]
    fn test_load_one_record_not_found() {
        let loader = Loader::default();
        let mut cursor = MemoryCursor::new(["id", "name"]);
        let mut user = User::default();
        let err = loader.load_one(&mut cursor, &mut user).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_load_row_not_found() {
        let loader = Loader::default();
        let mut cursor = MemoryCursor::new(["id"]);
        let mut id = 0i64;
        let mut dests: [&mut dyn Slot; 1] = [&mut id];
        let err = loader.load_row(&mut cursor, &mut dests).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_load_row_ignores_names() {
        let loader = Loader::default();
        let mut cursor = users_cursor();
        let mut id = 0u64;
        let mut name = String::new();
        let mut age: Option<u8> = None;
        let mut email: Option<String> = Some("old".into());
        {
            let mut dests: [&mut dyn Slot; 4] = [&mut id, &mut name, &mut age, &mut email];
            loader.load_row(&mut cursor, &mut dests).unwrap();
        }
        assert_eq!((id, name.as_str(), age), (1, "ada", Some(36)));
        assert_eq!(email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_load_row_discard_slot() {
        let loader = Loader::default();
        let mut cursor =
            MemoryCursor::new(["skip", "keep"]).row([RawCell::from("x"), RawCell::Int(4)]);
        let mut skip = ();
        let mut keep = 0i32;
        {
            let mut dests: [&mut dyn Slot; 2] = [&mut skip, &mut keep];
            loader.load_row(&mut cursor, &mut dests).unwrap();
        }
        assert_eq!(keep, 4);
    }
}

// =============================================================================
// Property Tests
// =============================================================================

mod property_integration {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Pair {
        key: i64,
        value: String,
    }

    record!(Pair { key, value });

    fn cursor_of(rows: &[(i64, String)]) -> MemoryCursor {
        rows.iter().fold(MemoryCursor::new(["key", "value"]), |cursor, (k, v)| {
            cursor.row([RawCell::Int(*k), RawCell::from(v.as_str())])
        })
    }

    fn rows_strategy() -> impl Strategy<Value = Vec<(i64, String)>> {
        proptest::collection::vec((0..5i64, "[a-z]{0,6}"), 0..30)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: a slice destination receives every row, in cursor order
        #[test]
        fn test_slice_preserves_rows(rows in rows_strategy()) {
            let loader = Loader::default();
            let mut cursor = cursor_of(&rows);
            let mut pairs: Vec<Pair> = Vec::new();

            let count = loader.load(&mut cursor, &mut pairs).unwrap();
            prop_assert_eq!(count, rows.len());
            let loaded: Vec<(i64, String)> = pairs.into_iter().map(|p| (p.key, p.value)).collect();
            prop_assert_eq!(loaded, rows);
            prop_assert_eq!(cursor.close_count(), 1);
        }

        /// Property: a map keeps the last row per key
        #[test]
        fn test_map_last_wins(rows in rows_strategy()) {
            let loader = Loader::default();
            let mut cursor = cursor_of(&rows);
            let mut map: HashMap<i64, String> = HashMap::new();

            let count = loader.load(&mut cursor, &mut map).unwrap();
            prop_assert_eq!(count, rows.len());
            let expected: HashMap<i64, String> = rows.iter().cloned().collect();
            prop_assert_eq!(map, expected);
        }

        /// Property: a map of slices keeps every row under its key in cursor order
        #[test]
        fn test_map_of_slice_keeps_all(rows in rows_strategy()) {
            let loader = Loader::default();
            let mut cursor = cursor_of(&rows);
            let mut map: BTreeMap<i64, Vec<String>> = BTreeMap::new();

            loader.load(&mut cursor, &mut map).unwrap();
            let mut expected: BTreeMap<i64, Vec<String>> = BTreeMap::new();
            for (k, v) in &rows {
                expected.entry(*k).or_default().push(v.clone());
            }
            prop_assert_eq!(map, expected);
        }

        /// Property: integer text converts exactly when it fits the target
        #[test]
        fn test_i32_from_text_range(n in any::<i64>()) {
            let loader = Loader::default();
            let mut cursor = MemoryCursor::new(["n"]).row([RawCell::from(n.to_string())]);
            let mut out = 0i32;

            let result = loader.load(&mut cursor, &mut out);
            match i32::try_from(n) {
                Ok(expected) => {
                    prop_assert!(result.is_ok());
                    prop_assert_eq!(out, expected);
                }
                Err(_) => prop_assert!(result.is_err()),
            }
        }
    }
}
