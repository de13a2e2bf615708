use http::HeaderValue;
use tower_layer::Layer;

use crate::{CacheControlDirective, ResponseTagger, TaggerConfig};

/// Applies [`ResponseTagger`] middleware to the wrapped service.
#[derive(Clone, Debug, Default)]
pub struct ResponseTaggerLayer {
    config: TaggerConfig,
}

impl ResponseTaggerLayer {
    /// Layer with the builtin Cache-Control default and no digest-failure
    /// fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Cache-Control directive applied to digested responses that
    /// carry none of their own.
    pub fn cache_control(mut self, directive: HeaderValue) -> Self {
        self.config.cache_control = CacheControlDirective::Value(directive);
        self
    }

    /// Never set Cache-Control on digested responses.
    pub fn without_cache_control(mut self) -> Self {
        self.config.cache_control = CacheControlDirective::Omit;
        self
    }

    /// Sets the Cache-Control directive applied when no digest could be
    /// computed: error statuses, empty or zero-copy bodies, pre-existing
    /// validators.
    pub fn no_digest_cache_control(mut self, directive: HeaderValue) -> Self {
        self.config.no_digest_cache_control = Some(directive);
        self
    }
}

impl<S> Layer<S> for ResponseTaggerLayer {
    type Service = ResponseTagger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResponseTagger::with_config(self.config.clone(), inner)
    }
}
