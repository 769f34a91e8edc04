//! Property-based tests for reply sanitising
//!
//! For any reply a model plausibly produces (a JSON document, optionally fenced,
//! optionally with trailing commas) sanitising is idempotent and recovers the document.

use pomaia_providers::sanitize_reply;
use proptest::prelude::*;
use serde_json::Value;

/// Strategy for small JSON values whose strings are drawn from `charset`
fn json_strategy_with(charset: &'static str) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        charset.prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// JSON values whose strings contain commas and closers
fn json_strategy() -> impl Strategy<Value = Value> {
    json_strategy_with("[a-zA-Z0-9 ,\\]}.]{0,12}")
}

/// JSON values whose strings cannot look like a trailing comma
fn plain_json_strategy() -> impl Strategy<Value = Value> {
    json_strategy_with("[a-zA-Z0-9 .]{0,12}")
}

/// Strategy for the code fence a model might wrap its reply in
fn fence_strategy() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        Just((String::new(), String::new())),
        Just(("```json\n".to_string(), "\n```".to_string())),
        Just(("```\n".to_string(), "\n```".to_string())),
        Just(("```json".to_string(), "```".to_string())),
    ]
}

/// Re-serialise an object or array with a trailing comma before its closer
fn with_trailing_comma(doc: &str) -> String {
    match doc.char_indices().last() {
        Some((idx, c)) if (c == '}' || c == ']') && doc.len() > 2 => {
            format!("{},\n{}", &doc[..idx], c)
        }
        _ => doc.to_string(),
    }
}

proptest! {
    #[test]
    fn prop_sanitize_is_idempotent(value in json_strategy(), fence in fence_strategy(), comma in any::<bool>()) {
        let doc = serde_json::to_string(&value).unwrap();
        let doc = if comma { with_trailing_comma(&doc) } else { doc };
        let raw = format!("{}{}{}", fence.0, doc, fence.1);

        let once = sanitize_reply(&raw);
        let twice = sanitize_reply(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_fenced_valid_json_unwrapped_unchanged(value in json_strategy(), fence in fence_strategy()) {
        let doc = serde_json::to_string_pretty(&value).unwrap();
        let raw = format!("{}{}{}", fence.0, doc, fence.1);

        prop_assert_eq!(sanitize_reply(&raw), doc);
    }

    #[test]
    fn prop_trailing_comma_repaired(value in plain_json_strategy()) {
        let doc = serde_json::to_string(&value).unwrap();
        let raw = with_trailing_comma(&doc);

        let parsed: Value = serde_json::from_str(&sanitize_reply(&raw)).unwrap();
        prop_assert_eq!(parsed, value);
    }
}
