//! Canonical, order-independent textual encoding of field maps.
//!
//! The hash chain commits to each entry through a string form of its field
//! map. That form must be byte-identical for identical mappings no matter
//! how the pairs were produced, on every platform. The encoding is
//! JSON-shaped but hand-rolled:
//!
//!   - keys sorted lexicographically by Unicode scalar value
//!   - no whitespace
//!   - `"` and `\` backslash-escaped
//!   - every control character and every non-ASCII character escaped as
//!     `\uXXXX` (UTF-16 surrogate pairs above the BMP)
//!
//! The output therefore contains only printable ASCII.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Encode a set of (key, value) string pairs canonically.
///
/// Pure function. Insertion order is irrelevant: pairs are collected into
/// lexicographic key order before encoding. A duplicated key keeps the last
/// value supplied.
pub fn canonical_string<I>(pairs: I) -> String
where
    I: IntoIterator<Item = (String, String)>,
{
    let map: BTreeMap<String, String> = pairs.into_iter().collect();

    let mut out = String::with_capacity(map.len() * 24 + 2);
    out.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        push_escaped(&mut out, key);
        out.push_str("\":\"");
        push_escaped(&mut out, value);
        out.push('"');
    }
    out.push('}');
    out
}

/// Append `s` to `out` with ASCII-safe escaping.
fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (' '..='~').contains(&c) => out.push(c),
            c => {
                // Control or non-ASCII: \uXXXX per UTF-16 code unit.
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
}
