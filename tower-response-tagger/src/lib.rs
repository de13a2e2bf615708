//! Tower middleware that labels successful responses with a content-based
//! weak `ETag` and a default `Cache-Control` directive.
//!
//! Volatile per-request fields (CSRF token tags, CSP nonces) are normalized
//! out of the digested bytes, so semantically identical pages keep the same
//! tag across requests even though every render embeds fresh tokens. The
//! bytes sent to the client are never rewritten. When the request carries a
//! [`SessionKey`] extension, the session identifier is folded into the
//! digest so tags never collide across sessions.
//!
//! # Example
//!
//! ```ignore
//! use tower::ServiceBuilder;
//! use tower_response_tagger::ResponseTaggerLayer;
//!
//! let service = ServiceBuilder::new()
//!     .layer(ResponseTaggerLayer::new())
//!     .service(my_service);
//! ```
//!
//! # Tagging Rules
//!
//! A response gets a computed `ETag` only when all of the following hold:
//! - Status is 200 or 201
//! - No `ETag` header is already present (an existing tag is never replaced
//!   or removed)
//! - No `Last-Modified` header is present (the origin already provides a
//!   freshness mechanism)
//! - The response is not marked [`SendfileHint`] (zero-copy bodies are never
//!   buffered)
//! - The fully buffered body is non-empty
//!
//! `Cache-Control` handling runs for every response, tagged or not, and an
//! already-present directive always wins. See [`ResponseTaggerLayer`] for
//! the configuration slots.

use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::Body;
use tower_service::Service;

mod body;
mod config;
mod err;
mod future;
mod layer;
mod session;

pub mod normalize;
pub mod weak_etag;

pub use body::*;
pub use config::*;
pub use err::*;
pub use future::*;
pub use layer::*;
pub use session::*;

/// Middleware that computes a weak content ETag for eligible responses and
/// fills in a default Cache-Control directive.
///
/// Eligible response bodies are fully buffered; the response then carries a
/// replay of the captured bytes. Everything else passes through untouched.
#[derive(Clone, Debug)]
pub struct ResponseTagger<S> {
    config: TaggerConfig,
    inner: S,
}

impl<S> ResponseTagger<S> {
    /// Tagger with default configuration around `inner`.
    pub fn new(inner: S) -> Self {
        Self::with_config(TaggerConfig::default(), inner)
    }

    pub(crate) fn with_config(config: TaggerConfig, inner: S) -> Self {
        Self { config, inner }
    }
}

impl<ReqBody, ResBody, S> Service<http::Request<ReqBody>> for ResponseTagger<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<ResBody>>,
    ResBody: Body<Data = Bytes> + Unpin,
{
    type Response = http::Response<TaggedBody<ResBody>>;

    type Error = ResponseTaggerError<S::Error, ResBody::Error>;

    type Future = ResponseTaggerFuture<S::Future, ResBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(ResponseTaggerError::Inner)
    }

    fn call(&mut self, req: http::Request<ReqBody>) -> Self::Future {
        let session = req.extensions().get::<SessionKey>().cloned();
        ResponseTaggerFuture::new(self.config.clone(), session, self.inner.call(req))
    }
}
