use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use regex::Regex;

use crate::foundation::core::CurvePoint;

const NUMBER: &str = r"[+-]?\d*(?:\.\d+)?(?:[eE][+-]?\d+)?";

static QUAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"Q\s({NUMBER})\s({NUMBER}),\s({NUMBER})\s({NUMBER})"))
        .expect("invalid quadratic command regex")
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s\u{00A0}]+").expect("invalid whitespace regex")
});

/// Extract every quadratic segment (`Q cx cy, x y`) from path data, in document order.
///
/// Anything that is not a quadratic command is skipped. A command whose numbers do not parse
/// is dropped rather than guessed at.
pub fn parse_path(d: &str) -> Vec<CurvePoint> {
    QUAD_RE
        .captures_iter(d)
        .filter_map(|caps| {
            let num = |i: usize| caps.get(i)?.as_str().parse::<f64>().ok();
            Some(CurvePoint::new(num(1)?, num(2)?, num(3)?, num(4)?))
        })
        .collect()
}

/// Collapse whitespace runs (non-breaking spaces included) to single spaces and trim.
pub fn normalize_whitespace(d: &str) -> String {
    WHITESPACE_RE.replace_all(d, " ").trim().to_string()
}

/// Encode path data into a compact token that fits in a single attribute value.
pub fn encode_seed(d: &str) -> String {
    BASE64_STANDARD.encode(normalize_whitespace(d).as_bytes())
}

/// Decode a token produced by [`encode_seed`].
///
/// Returns `None` for empty tokens and for anything that is not valid base64 carrying UTF-8.
pub fn decode_seed(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let bytes = BASE64_STANDARD.decode(token).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    if decoded.is_empty() {
        return None;
    }
    Some(decoded)
}

#[cfg(test)]
#[path = "../../tests/unit/wave/codec.rs"]
mod tests;
