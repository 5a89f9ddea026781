//! Query-string encoding.
//!
//! Structured values encode to `key=value` pairs; scalars JSON-serialize and
//! byte-escape. A string that itself parses as JSON is ambiguous, so it is
//! re-encoded as a JSON literal first: decoding then recovers the original
//! string rather than the parsed value.

use std::fmt::Write;

use serde_json::{Map, Value};

/// Punctuation that is always percent-escaped.
const RESERVED: &[u8] = b"{}<>;/?@&=+$%,";

/// Printable ASCII bytes that pass through unescaped. Space maps to `+` and
/// everything else to `%XX`.
static PASSTHROUGH: [bool; 256] = build_passthrough();

const fn build_passthrough() -> [bool; 256] {
    let mut table = [false; 256];
    let mut b = 33usize;
    while b < 128 {
        table[b] = true;
        b += 1;
    }
    let mut i = 0;
    while i < RESERVED.len() {
        table[RESERVED[i] as usize] = false;
        i += 1;
    }
    table
}

/// Encodes a structured value as a URL query string.
///
/// Objects flatten to sorted `key=value` pairs joined with `&`; a pair whose
/// encoded value is empty is omitted (numeric zero encodes as `"0"` and is
/// kept). Arrays of scalars join with `,`; arrays holding any object or array
/// encode as one JSON literal. Returns `None` for null.
pub fn value_to_query(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Object(map) => Some(encode_object(map)),
        Value::String(s) => Some(encode_string(s)),
        Value::Array(items) => Some(encode_array(items)),
        other => Some(escape_bytes(other.to_string().as_bytes())),
    }
}

/// Flattens a mapping to its leaf paths and joins the sorted pairs.
pub(crate) fn encode_object(map: &Map<String, Value>) -> String {
    let mut leaves: Vec<(String, &Value)> = Vec::new();
    collect_leaves(map, "", &mut leaves);
    leaves.sort_by(|a, b| a.0.cmp(&b.0));

    let mut pairs: Vec<String> = Vec::new();
    for (key, value) in leaves {
        let Some(encoded) = value_to_query(value) else {
            continue;
        };
        if encoded.is_empty() {
            continue;
        }
        pairs.push(format!("{}={}", encode_string(&key), encoded));
    }
    pairs.join("&")
}

/// Leaf paths of a nested mapping, as dotted key chains.
fn collect_leaves<'a>(
    map: &'a Map<String, Value>,
    prefix: &str,
    out: &mut Vec<(String, &'a Value)>,
) {
    for (k, v) in map {
        let key = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        match v {
            Value::Object(inner) => collect_leaves(inner, &key, out),
            other => out.push((key, other)),
        }
    }
}

fn encode_string(s: &str) -> String {
    if serde_json::from_str::<Value>(s).is_ok() {
        // ambiguous: looks like JSON, so encode the JSON literal form
        match serde_json::to_string(s) {
            Ok(literal) => escape_bytes(literal.as_bytes()),
            Err(_) => escape_bytes(s.as_bytes()),
        }
    } else {
        escape_bytes(s.as_bytes())
    }
}

fn encode_array(items: &[Value]) -> String {
    if items.iter().any(|v| v.is_object() || v.is_array()) {
        match serde_json::to_string(items) {
            Ok(literal) => escape_bytes(literal.as_bytes()),
            Err(_) => String::new(),
        }
    } else {
        let encoded: Vec<String> = items
            .iter()
            .filter_map(value_to_query)
            .filter(|s| !s.is_empty())
            .collect();
        encoded.join(",")
    }
}

/// Byte-escapes through the table: unreserved printable ASCII passes, space
/// becomes `+`, everything else becomes `%XX`.
pub(crate) fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if PASSTHROUGH[b as usize] {
            out.push(b as char);
        } else if b == b' ' {
            out.push('+');
        } else {
            let _ = write!(out, "%{b:02x}");
        }
    }
    out
}
