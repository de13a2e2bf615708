use data_encoding::HEXLOWER;
use http::HeaderValue;

use crate::SessionKey;

/// Digest bytes kept in the rendered tag (128 bits).
const DIGEST_LEN: usize = 16;

/// Calculates the weak entity tag `W/"<hex>"` as the truncated blake3 hash
/// of the normalized body bytes followed by the session identifier, if any.
///
/// Weak because only the rendered body feeds the digest, not full response
/// semantics such as headers.
pub fn weak_hex_blake3_etag(normalized_body: &[u8], session: Option<&SessionKey>) -> HeaderValue {
    let mut hasher = blake3::Hasher::new();
    hasher.update(normalized_body);
    if let Some(session) = session {
        hasher.update(session.as_bytes());
    }
    let hash = hasher.finalize();
    let hex = HEXLOWER.encode(&hash.as_bytes()[..DIGEST_LEN]);
    // hex digits and quotes are always valid ascii
    HeaderValue::from_str(&format!("W/\"{hex}\"")).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_weak_marker() {
        let etag = weak_hex_blake3_etag(b"Hello, World!", None);
        assert!(etag.to_str().unwrap().starts_with("W/\""));
        assert!(etag.to_str().unwrap().ends_with('"'));
    }

    #[test]
    fn matches_truncated_blake3_of_input() {
        let etag = weak_hex_blake3_etag(b"Hello, World!", None);
        let hash = blake3::hash(b"Hello, World!");
        let expected = format!("W/\"{}\"", HEXLOWER.encode(&hash.as_bytes()[..DIGEST_LEN]));
        assert_eq!(etag.to_str().unwrap(), expected);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let a = weak_hex_blake3_etag(b"<html></html>", None);
        let b = weak_hex_blake3_etag(b"<html></html>", None);
        assert_eq!(a, b);
    }

    #[test]
    fn differs_for_different_bodies() {
        let a = weak_hex_blake3_etag(b"page one", None);
        let b = weak_hex_blake3_etag(b"page two", None);
        assert_ne!(a, b);
    }

    #[test]
    fn session_changes_the_tag() {
        let anonymous = weak_hex_blake3_etag(b"same body", None);
        let s1 = weak_hex_blake3_etag(b"same body", Some(&SessionKey::from("session-1")));
        let s2 = weak_hex_blake3_etag(b"same body", Some(&SessionKey::from("session-2")));
        assert_ne!(anonymous, s1);
        assert_ne!(s1, s2);
    }

    #[test]
    fn same_session_same_tag() {
        let key = SessionKey::from("session-1");
        let a = weak_hex_blake3_etag(b"same body", Some(&key));
        let b = weak_hex_blake3_etag(b"same body", Some(&key));
        assert_eq!(a, b);
    }
}
