//! Property tests for error paths and aggregation.
//!
//! - Every element failure in an array is reported at `[index]`, in order
//! - Object field failures are prefixed with the field name
//! - A valid input parses to itself and re-parses to the same value

use proptest::prelude::*;
use serde_json::{Value, json};
use trellis_schema::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A JSON value that is either a number or something else.
fn arb_element() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(|b| json!(b)),
        "[a-z]{0,6}".prop_map(|s| json!(s)),
        Just(json!(null)),
    ]
}

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn array_errors_sit_at_failing_indices(items in prop::collection::vec(arb_element(), 0..20)) {
        let schema = array(number()).build().unwrap();
        let expected: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_number())
            .map(|(i, _)| i)
            .collect();

        match schema.safe_parse(&Value::Array(items.clone())) {
            Ok(out) => {
                prop_assert!(expected.is_empty());
                prop_assert_eq!(out, Value::Array(items));
            }
            Err(errors) => {
                let indices: Vec<usize> = errors
                    .iter()
                    .map(|e| match e.path.segments() {
                        [PathSegment::Index(i)] => *i,
                        other => panic!("unexpected path {other:?}"),
                    })
                    .collect();
                prop_assert_eq!(indices, expected);
            }
        }
    }

    #[test]
    fn field_errors_are_prefixed(key in arb_key(), inner in "[a-z]{1,8}") {
        let schema = object()
            .field(key.as_str(), object().field(inner.as_str(), number()))
            .build()
            .unwrap();
        let input = json!({ key.clone(): { inner.clone(): "not a number" } });
        let errors = schema.safe_parse(&input).unwrap_err();
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors.first().path.to_string(), format!("{key}.{inner}"));
        prop_assert_eq!(
            errors.first().path.to_json_pointer(),
            format!("/{key}/{inner}")
        );
    }

    #[test]
    fn valid_output_reparses_unchanged(
        name in "[a-z]{1,10}",
        port in 1u16..,
        tags in prop::collection::vec("[a-z]{2,5}", 0..5),
    ) {
        let schema = object()
            .field("name", string().min_length(1))
            .field("port", number().range(1.0, 65535.0))
            .field("tags", array(string().min_length(2)).optional())
            .field("secure", boolean().with_default(true))
            .build()
            .unwrap();

        let first = schema
            .parse(&json!({"name": name, "port": port, "tags": tags, "extra": 1}))
            .unwrap();
        let text = serde_json::to_string(&first).unwrap();
        let second = schema.parse(&serde_json::from_str::<Value>(&text).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn string_length_errors_agree_with_char_count(text in "\\PC{0,12}", min in 0usize..6, extra in 0usize..6) {
        let max = min + extra;
        let schema = string()
            .min_length(min)
            .max_length(max)
            .not_required()
            .build()
            .unwrap();
        let len = text.chars().count();
        let codes = schema
            .safe_parse(&json!(text))
            .map_or_else(|e| e.codes(), |_| Vec::new());
        let mut expected = Vec::new();
        if len < min {
            expected.push(ErrorCode::Min);
        }
        if len > max {
            expected.push(ErrorCode::Max);
        }
        prop_assert_eq!(codes, expected);
    }
}
