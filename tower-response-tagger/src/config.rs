use http::{
    header::{Entry, CACHE_CONTROL},
    HeaderMap, HeaderValue,
};

/// Directive applied to digested responses that carry no Cache-Control of
/// their own.
pub const DEFAULT_CACHE_CONTROL: &str = "max-age=0, private, must-revalidate";

/// Cache-Control behavior for responses that got a computed ETag.
///
/// A dedicated three-state enum so that "not configured" never collapses
/// into an explicit opt-out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CacheControlDirective {
    /// Use [`DEFAULT_CACHE_CONTROL`].
    #[default]
    Builtin,
    /// Never set Cache-Control.
    Omit,
    /// Set this literal directive.
    Value(HeaderValue),
}

impl CacheControlDirective {
    fn resolve(&self) -> Option<HeaderValue> {
        match self {
            Self::Builtin => Some(HeaderValue::from_static(DEFAULT_CACHE_CONTROL)),
            Self::Omit => None,
            Self::Value(v) => Some(v.clone()),
        }
    }
}

/// Construction-time configuration of [`ResponseTagger`](crate::ResponseTagger).
///
/// The two slots are kept separate on purpose: one covers responses whose
/// digest was computed, the other covers responses where digesting was
/// skipped or impossible (error statuses, empty or zero-copy bodies,
/// pre-existing validators).
#[derive(Clone, Debug, Default)]
pub struct TaggerConfig {
    pub(crate) cache_control: CacheControlDirective,
    pub(crate) no_digest_cache_control: Option<HeaderValue>,
}

/// Sets Cache-Control if absent. A directive already present always wins.
pub(crate) fn apply_cache_control(headers: &mut HeaderMap, config: &TaggerConfig, digested: bool) {
    let directive = if digested {
        config.cache_control.resolve()
    } else {
        config.no_digest_cache_control.clone()
    };
    let Some(directive) = directive else { return };
    if let Entry::Vacant(slot) = headers.entry(CACHE_CONTROL) {
        slot.insert(directive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_default_applied_when_digested() {
        let mut headers = HeaderMap::new();
        apply_cache_control(&mut headers, &TaggerConfig::default(), true);
        assert_eq!(headers[CACHE_CONTROL], DEFAULT_CACHE_CONTROL);
    }

    #[test]
    fn nothing_applied_without_digest_by_default() {
        let mut headers = HeaderMap::new();
        apply_cache_control(&mut headers, &TaggerConfig::default(), false);
        assert!(!headers.contains_key(CACHE_CONTROL));
    }

    #[test]
    fn already_set_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=60"));
        apply_cache_control(&mut headers, &TaggerConfig::default(), true);
        assert_eq!(headers[CACHE_CONTROL], "public, max-age=60");
    }

    #[test]
    fn omit_never_sets_the_header() {
        let config = TaggerConfig {
            cache_control: CacheControlDirective::Omit,
            no_digest_cache_control: None,
        };
        let mut headers = HeaderMap::new();
        apply_cache_control(&mut headers, &config, true);
        assert!(!headers.contains_key(CACHE_CONTROL));
    }

    #[test]
    fn custom_directive_applied_when_digested() {
        let config = TaggerConfig {
            cache_control: CacheControlDirective::Value(HeaderValue::from_static("no-cache")),
            no_digest_cache_control: None,
        };
        let mut headers = HeaderMap::new();
        apply_cache_control(&mut headers, &config, true);
        assert_eq!(headers[CACHE_CONTROL], "no-cache");
    }

    #[test]
    fn fallback_applied_when_digest_skipped() {
        let config = TaggerConfig {
            cache_control: CacheControlDirective::Builtin,
            no_digest_cache_control: Some(HeaderValue::from_static("no-store")),
        };
        let mut headers = HeaderMap::new();
        apply_cache_control(&mut headers, &config, false);
        assert_eq!(headers[CACHE_CONTROL], "no-store");
    }
}
