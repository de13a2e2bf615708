//! Normalization of volatile per-request fields out of the digested body.
//!
//! A heuristic text scan over the raw body bytes, not an HTML parser: the
//! rules tolerate attribute reordering and malformed surrounding markup, and
//! only the bytes fed to the digest are rewritten. The body sent to the
//! client is never altered.

use http::HeaderValue;
use lazy_static::lazy_static;
use regex::bytes::Regex;

/// A pattern/replacement pass applied to the body text before hashing.
struct NormalizationRule {
    pattern: Regex,
    replacement: &'static [u8],
}

lazy_static! {
    /// Volatile per-request fields, stripped in this fixed order.
    static ref RULES: [NormalizationRule; 4] = [
        // <meta name="csrf-token" content="..."> in any attribute order
        NormalizationRule {
            pattern: Regex::new(r#"(?i)<meta\b[^<>]*\bname\s*=\s*["']csrf-token["'][^<>]*>"#)
                .unwrap(),
            replacement: b"",
        },
        // hidden <input name="authenticity_token" value="...">
        NormalizationRule {
            pattern: Regex::new(
                r#"(?i)<input\b[^<>]*\bname\s*=\s*["']authenticity_token["'][^<>]*>"#,
            )
            .unwrap(),
            replacement: b"",
        },
        // <meta name="csp-nonce" content="...">
        NormalizationRule {
            pattern: Regex::new(r#"(?i)<meta\b[^<>]*\bname\s*=\s*["']csp-nonce["'][^<>]*>"#)
                .unwrap(),
            replacement: b"",
        },
        // nonce attribute on any element, e.g. <script nonce="...">
        NormalizationRule {
            pattern: Regex::new(r#"(?i)\snonce\s*=\s*("[^"]*"|'[^']*')"#).unwrap(),
            replacement: br#" nonce="""#,
        },
    ];
}

/// Applies the normalization rules in order and returns the bytes that feed
/// the digest.
pub fn normalize(raw: &[u8]) -> Vec<u8> {
    let mut out = raw.to_vec();
    for rule in RULES.iter() {
        if rule.pattern.is_match(&out) {
            out = rule.pattern.replace_all(&out, rule.replacement).into_owned();
        }
    }
    out
}

/// Returns true if the content type is one the normalization rules may run
/// on. An absent content type counts as text: the rules are a no-op on
/// bodies that contain none of the volatile fields.
pub fn is_text_like(content_type: Option<&HeaderValue>) -> bool {
    let Some(value) = content_type else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase();
    mime.starts_with("text/") || mime == "application/xml" || mime.ends_with("+xml")
}
