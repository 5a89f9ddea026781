//! Query-string decoding.
//!
//! Real-world query strings mix correctly percent-encoded UTF-8 with raw
//! Latin-1 bytes and literal `%` characters. The decoder here never fails:
//! malformed escapes degrade to literal characters, and byte sequences that
//! do not form valid UTF-8 are read as Latin-1.

use serde_json::{Map, Value};

/// Decoder state while scanning a sub-value.
///
/// A multi-byte UTF-8 sequence is provisional until all continuation bytes
/// arrive; on mismatch the cursor rewinds to `start` and the lead `%` is
/// emitted literally.
enum State {
    Scanning,
    InMultiByte {
        /// Continuation bytes still expected.
        remaining: usize,
        /// Char index where the sequence's `%` began.
        start: usize,
        /// Bytes buffered since `start` (lead plus continuations so far).
        taken: usize,
    },
}

/// Decodes a raw query string into a parameter mapping.
///
/// Tokens are split on `&` (empty tokens skipped). A token without `=` is a
/// bare key mapping to `true`. Repeated keys promote the stored value to a
/// growing list: scalar, then `[old, new]`, then append.
pub fn query_to_value(raw: &str) -> Map<String, Value> {
    let mut query = Map::new();
    for token in raw.split('&') {
        if token.is_empty() {
            continue;
        }
        let (key, value) = match token.split_once('=') {
            None => (token.to_string(), Value::Bool(true)),
            Some((k, v)) => (decode_text(k), decode_value(v)),
        };
        if let Some(existing) = query.get_mut(&key) {
            if let Value::Array(items) = existing {
                items.push(value);
            } else if existing.is_null() {
                *existing = value;
            } else {
                let old = existing.take();
                *existing = Value::Array(vec![old, value]);
            }
        } else {
            query.insert(key, value);
        }
    }
    query
}

/// Decodes one raw parameter value.
///
/// A top-level comma splits the value into a list of decoded sub-values,
/// unwrapped back to a scalar when only one element results. Each decoded
/// sub-value that parses as JSON becomes the parsed value; otherwise the
/// string is kept as-is.
fn decode_value(raw: &str) -> Value {
    let mut results: Vec<Value> = raw
        .split(',')
        .map(|sub| {
            let text = decode_text(sub);
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        })
        .collect();
    match results.len() {
        1 => results.swap_remove(0),
        _ => Value::Array(results),
    }
}

/// Percent/plus decode of one sub-value. Never fails.
pub(crate) fn decode_text(v: &str) -> String {
    let chars: Vec<char> = v.chars().collect();
    let mut bytes: Vec<u8> = Vec::with_capacity(v.len());
    let mut state = State::Scanning;
    let mut i = 0usize;

    while i < chars.len() {
        match state {
            State::InMultiByte {
                remaining,
                start,
                taken,
            } => {
                if chars[i] == '%' {
                    if let Some(d) = hex_pair(&chars, i + 1) {
                        if d & 0xC0 == 0x80 {
                            bytes.push(d);
                            i += 3;
                            state = if remaining == 1 {
                                State::Scanning
                            } else {
                                State::InMultiByte {
                                    remaining: remaining - 1,
                                    start,
                                    taken: taken + 1,
                                }
                            };
                            continue;
                        }
                    }
                }
                // missing continuation byte: revert to the sequence start and
                // take the original '%' literally
                bytes.truncate(bytes.len() - taken);
                bytes.push(b'%');
                i = start + 1;
                state = State::Scanning;
            }
            State::Scanning => {
                let c = chars[i];
                if c == '+' {
                    bytes.push(b' ');
                    i += 1;
                } else if c == '%' {
                    match hex_pair(&chars, i + 1) {
                        Some(d) if d & 0x80 != 0 => {
                            let ones = d.leading_ones() as usize;
                            if ones <= 1 || ones == 8 {
                                // malformed lead byte
                                bytes.push(b'%');
                                i += 1;
                            } else {
                                state = State::InMultiByte {
                                    remaining: ones - 1,
                                    start: i,
                                    taken: 1,
                                };
                                bytes.push(d);
                                i += 3;
                            }
                        }
                        Some(d) => {
                            bytes.push(d);
                            i += 3;
                        }
                        None => {
                            bytes.push(b'%');
                            i += 1;
                        }
                    }
                } else {
                    push_raw_char(&mut bytes, c);
                    i += 1;
                }
            }
        }
    }

    if let State::InMultiByte { start, taken, .. } = state {
        // truncated sequence at end of input: drop the provisional bytes and
        // read the tail as Latin-1 instead
        bytes.truncate(bytes.len() - taken);
        for &c in &chars[start..] {
            push_raw_char(&mut bytes, c);
        }
    }

    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::trace!("decoded query bytes are not UTF-8, reading as Latin-1");
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    }
}

/// Two hex digits at `at`, as a byte. Rejects short or non-hex input.
fn hex_pair(chars: &[char], at: usize) -> Option<u8> {
    let hi = chars.get(at)?.to_digit(16)?;
    let lo = chars.get(at + 1)?.to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// A character outside an escape: one Latin-1 byte when representable,
/// otherwise its UTF-8 bytes.
fn push_raw_char(bytes: &mut Vec<u8>, c: char) {
    let code = c as u32;
    if code < 256 {
        bytes.push(code as u8);
    } else {
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn repeated_key_grows_list() {
        let q = query_to_value("a=1&a=2");
        assert_eq!(q.get("a"), Some(&json!([1, 2])));
        let q = query_to_value("a=1&a=2&a=3");
        assert_eq!(q.get("a"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn bare_key_is_true() {
        let q = query_to_value("flag");
        assert_eq!(q.get("flag"), Some(&json!(true)));
    }

    #[test]
    fn empty_tokens_skipped() {
        let q = query_to_value("&&a=1&");
        assert_eq!(q.len(), 1);
        assert_eq!(q.get("a"), Some(&json!(1)));
    }

    #[test]
    fn comma_value_is_list() {
        let q = query_to_value("a=1,2,3");
        assert_eq!(q.get("a"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn single_value_unwraps_to_scalar() {
        let q = query_to_value("a=1");
        assert_eq!(q.get("a"), Some(&json!(1)));
    }

    #[test]
    fn json_string_value_keeps_string_type() {
        let q = query_to_value("a=%2242%22");
        assert_eq!(q.get("a"), Some(&json!("42")));
    }

    #[test]
    fn plus_is_space() {
        let q = query_to_value("a=b+c");
        assert_eq!(q.get("a"), Some(&json!("b c")));
    }

    #[test]
    fn empty_value_is_empty_string() {
        let q = query_to_value("a=");
        assert_eq!(q.get("a"), Some(&json!("")));
    }

    #[test]
    fn valid_utf8_sequences() {
        assert_eq!(decode_text("caf%C3%A9"), "café");
        assert_eq!(decode_text("%E2%82%AC"), "€");
    }

    #[test]
    fn invalid_hex_is_literal_percent() {
        let q = query_to_value("k=%zz");
        assert_eq!(q.get("k"), Some(&json!("%zz")));
    }

    #[test]
    fn lone_percent_is_literal() {
        assert_eq!(decode_text("100%"), "100%");
        assert_eq!(decode_text("%"), "%");
    }

    #[test]
    fn malformed_lead_byte_is_literal() {
        // 0x80 is a bare continuation byte, 0xFF has no zero bit
        assert_eq!(decode_text("%80"), "%80");
        assert_eq!(decode_text("%FF"), "%FF");
    }

    #[test]
    fn missing_continuation_rewinds() {
        assert_eq!(decode_text("%C3%zz"), "%C3%zz");
        assert_eq!(decode_text("%C3x"), "%C3x");
    }

    #[test]
    fn truncated_sequence_reads_tail_as_latin1() {
        assert_eq!(decode_text("%C3"), "%C3");
        assert_eq!(decode_text("abc%E2%82"), "abc%E2%82");
    }

    #[test]
    fn raw_latin1_char_survives() {
        // a raw é in the input is one Latin-1 byte, recovered on the
        // Latin-1 fallback path
        assert_eq!(decode_text("caf\u{e9}"), "café");
    }

    #[test]
    fn percent_with_whitespace_hex_is_literal() {
        assert_eq!(decode_text("% 1x"), "% 1x");
    }

    #[test]
    fn json_object_value() {
        let q = query_to_value("a=%7B%22x%22:1%7D");
        assert_eq!(q.get("a"), Some(&json!({"x": 1})));
    }

    #[test]
    fn repeated_key_after_list_value() {
        let q = query_to_value("a=1,2&a=3");
        assert_eq!(q.get("a"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn keys_are_percent_decoded() {
        let q = query_to_value("a+b=1");
        assert_eq!(q.get("a b"), Some(&json!(1)));
    }
}
