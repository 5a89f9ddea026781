//! Round-trip tests across the query codec and the Url value type.

use file_url::{query_to_value, value_to_query, Url};
use serde_json::{json, Value};

fn round_trip(value: Value) {
    let Value::Object(expected) = &value else {
        panic!("round_trip takes a mapping");
    };
    let encoded = value_to_query(&value).unwrap();
    let decoded = query_to_value(&encoded);
    assert_eq!(&decoded, expected, "through {encoded:?}");
}

#[test]
fn scalar_leaves_round_trip() {
    round_trip(json!({"a": 1, "b": "hello", "c": true}));
    round_trip(json!({"n": -3.5, "zero": 0}));
    round_trip(json!({"text": "with space", "path": "a/b"}));
}

#[test]
fn json_looking_string_round_trips_as_string() {
    // "42" must come back as a string, not the number 42
    round_trip(json!({"a": "42"}));
    round_trip(json!({"b": "true"}));
    round_trip(json!({"c": "[1,2]"}));
}

#[test]
fn scalar_list_round_trips() {
    round_trip(json!({"a": [1, 2, 3]}));
    round_trip(json!({"a": ["x", "y"]}));
}

#[test]
fn unicode_round_trips() {
    round_trip(json!({"city": "Zürich", "emoji": "✓"}));
}

#[test]
fn url_string_round_trips() {
    for raw in [
        "https://example.com/a/b?x=1&y=hello#frag",
        "http://example.com:8080/x?flag",
        "file:///etc/hosts",
        "//cdn/assets/app.js",
    ] {
        let u = Url::parse(raw).unwrap();
        let rendered = u.to_string();
        let again = Url::parse(&rendered).unwrap();
        assert_eq!(again, u, "through {rendered:?}");
    }
}

#[test]
fn query_survives_reparse() {
    let u = Url::parse("https://example.com/p").unwrap();
    let u = u
        .merge_query(json!({"limit": 10, "tags": ["a", "b"], "q": "hello world"}))
        .unwrap();
    let again = Url::parse(&u.to_string()).unwrap();
    assert_eq!(again.query.get("limit"), Some(&json!(10)));
    assert_eq!(again.query.get("tags"), Some(&json!(["a", "b"])));
    assert_eq!(again.query.get("q"), Some(&json!("hello world")));
}
