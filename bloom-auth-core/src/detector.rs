//! Heuristic suspicious-input detection (XSS / SQL injection).
//!
//! [`is_suspicious`] is a pure, deterministic predicate over a single string.
//! Request-level callers flatten a request into a bag of strings (URL, query
//! values, body values, selected headers) and reject if any one of them is
//! suspicious.
//!
//! Every string is inspected twice: once lower-cased as-is, and once after
//! percent-decoding, so that `%3Cscript%3E` is caught the same as
//! `<script>`. A failed decode falls back to the lower-cased raw string.
//!
//! Short strings made only of plausible form-field characters take a fast
//! allow-path so that strong passwords like `Admin123!@#` never trip the
//! heuristics; see [`is_suspicious`] for the exact rules.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;

/// The aggregate pattern set, applied to the lower-cased raw string and to
/// its percent-decoded form. A match in either classifies the input as
/// suspicious. Each pattern is narrow enough to unit-test and tune on its
/// own.
static SUSPICIOUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // XSS
        r"<\s*script",
        r"%3c\s*script",
        r"onerror\s*=|onload\s*=|onclick\s*=",
        r"javascript:",
        r"data:\s*text/html",
        // SQL injection
        r"union\s+all\s+select|union\s+select",
        r"select\s+.*\s+from",
        r"insert\s+into|update\s+.*\s+set|delete\s+from|drop\s+table|alter\s+table",
        r";--|#|/\*",
        r"or\s+1\s*=\s*1|and\s+1\s*=\s*1",
        r"sleep\s*\(\s*\d+\s*\)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid suspicious pattern"))
    .collect()
});

/// Characters a plausible password or short form field may consist of.
static PLAUSIBLE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[a-zA-Z0-9!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/? ]+$"#)
        .expect("invalid field charset regex")
});

/// Quick screen used on the fast allow-path: anything a short benign field
/// would never contain. Hitting this does not condemn the string by itself;
/// it only forces evaluation against the full pattern set.
static DANGER_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"union|select|insert|update|delete|drop|alter|exec|execute",
        r"|<\s*script|%3c\s*script|javascript:|onerror\s*=|onload\s*=|onclick\s*=",
        r"|data:\s*text/html|or\s+1\s*=\s*1|and\s+1\s*=\s*1|--|sleep\s*\(",
    ))
    .expect("invalid danger marker regex")
});

/// Shape of an ordinary strong password (`Admin123!@#` and friends) that
/// happens to contain a SQL keyword substring. Deliberately narrow;
/// broadening it is a product decision, not a correctness fix.
static PASSWORD_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^(admin|user|manager|password)\d+[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]+$"#)
        .expect("invalid password shape regex")
});

/// Maximum length for the fast allow-path.
const SHORT_FIELD_LIMIT: usize = 50;

/// Classify a single string as suspicious (potential XSS/SQLi payload) or
/// benign.
///
/// Pure and deterministic: no state, no I/O, case-insensitive.
pub fn is_suspicious(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }

    let lowered = value.to_lowercase();
    let decoded = match percent_decode_str(&lowered).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => lowered.clone(),
    };

    // Fast allow-path for password-like strings: short, drawn from ordinary
    // form-field characters, and free of danger markers in both forms.
    if value.len() < SHORT_FIELD_LIMIT && PLAUSIBLE_FIELD.is_match(value) {
        if !DANGER_MARKERS.is_match(&lowered) && !DANGER_MARKERS.is_match(&decoded) {
            return false;
        }
        if PASSWORD_SHAPE.is_match(value) {
            return false;
        }
    }

    SUSPICIOUS_PATTERNS
        .iter()
        .any(|p| p.is_match(&lowered) || p.is_match(&decoded))
}

/// Recursively collect every leaf value of a JSON document as a string.
///
/// Strings, numbers, and booleans are stringified; arrays and objects are
/// walked; nulls are skipped. This keeps the traversal total over any body a
/// client can send.
pub fn flatten_values(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Null => {}
        serde_json::Value::Bool(b) => out.push(b.to_string()),
        serde_json::Value::Number(n) => out.push(n.to_string()),
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Array(items) => {
            for item in items {
                flatten_values(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                flatten_values(item, out);
            }
        }
    }
}
