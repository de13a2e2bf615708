use std::{
    borrow::Cow,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::{Bytes, BytesMut};
use http::{
    header::{CONTENT_TYPE, ETAG, LAST_MODIFIED},
    HeaderMap, StatusCode,
};
use http_body::Body;
use pin_project::pin_project;

use crate::{
    config::apply_cache_control,
    normalize::{is_text_like, normalize},
    weak_etag::weak_hex_blake3_etag,
    ResponseTaggerError, SendfileHint, SessionKey, TaggedBody, TaggerConfig,
};

/// Success statuses whose responses are eligible for a computed ETag.
const TAGGABLE_STATUSES: [StatusCode; 2] = [StatusCode::OK, StatusCode::CREATED];

/// Response future of [`ResponseTagger`](crate::ResponseTagger).
#[pin_project]
pub struct ResponseTaggerFuture<F, B> {
    config: TaggerConfig,
    session: Option<SessionKey>,
    #[pin]
    state: ResponseTaggerFutureState<F, B>,
}

impl<F, B> ResponseTaggerFuture<F, B> {
    pub(crate) fn new(config: TaggerConfig, session: Option<SessionKey>, fut: F) -> Self {
        Self {
            config,
            session,
            state: ResponseTaggerFutureState::Inner { fut },
        }
    }
}

#[pin_project(project = ResponseTaggerFutureStateProj)]
enum ResponseTaggerFutureState<F, B> {
    Inner {
        #[pin]
        fut: F,
    },
    // fields unpinned: the drained source has to move into the replay body
    Buffering {
        parts: Option<http::response::Parts>,
        body: Option<B>,
        buf: BytesMut,
        trailers: Option<HeaderMap>,
    },
}

impl<F, B, E> Future for ResponseTaggerFuture<F, B>
where
    F: Future<Output = Result<http::Response<B>, E>>,
    B: Body<Data = Bytes> + Unpin,
{
    type Output = Result<http::Response<TaggedBody<B>>, ResponseTaggerError<E, B::Error>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let mut curr_state = this.state;

        match curr_state.as_mut().project() {
            ResponseTaggerFutureStateProj::Inner { fut } => match fut.poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(result) => {
                    let resp = match result {
                        Ok(r) => r,
                        Err(e) => return Poll::Ready(Err(ResponseTaggerError::Inner(e))),
                    };
                    if !is_taggable(&resp) {
                        tracing::trace!(status = %resp.status(), "passing response through untagged");
                        let (mut parts, body) = resp.into_parts();
                        apply_cache_control(&mut parts.headers, this.config, false);
                        return Poll::Ready(Ok(http::Response::from_parts(
                            parts,
                            TaggedBody::passthrough(body),
                        )));
                    }
                    let (parts, body) = resp.into_parts();
                    curr_state.set(ResponseTaggerFutureState::Buffering {
                        parts: Some(parts),
                        body: Some(body),
                        buf: BytesMut::new(),
                        trailers: None,
                    });
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
            },
            ResponseTaggerFutureStateProj::Buffering {
                parts,
                body,
                buf,
                trailers,
            } => loop {
                match Pin::new(body.as_mut().unwrap()).poll_frame(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(Some(Err(e))) => {
                        return Poll::Ready(Err(ResponseTaggerError::ReadBody(e)))
                    }
                    Poll::Ready(Some(Ok(frame))) => match frame.into_data() {
                        Ok(data) => buf.extend_from_slice(&data),
                        Err(frame) => {
                            if let Ok(t) = frame.into_trailers() {
                                *trailers = Some(t);
                            }
                        }
                    },
                    Poll::Ready(None) => {
                        let mut parts = parts.take().unwrap();
                        let source = body.take().unwrap();
                        let captured = std::mem::take(buf).freeze();
                        let digested = !captured.is_empty();
                        if digested {
                            let digest_input: Cow<'_, [u8]> =
                                if is_text_like(parts.headers.get(CONTENT_TYPE)) {
                                    Cow::Owned(normalize(&captured))
                                } else {
                                    Cow::Borrowed(captured.as_ref())
                                };
                            let etag = weak_hex_blake3_etag(&digest_input, this.session.as_ref());
                            tracing::trace!(etag = ?etag, "tagged response");
                            parts.headers.insert(ETAG, etag);
                        }
                        apply_cache_control(&mut parts.headers, this.config, digested);
                        return Poll::Ready(Ok(http::Response::from_parts(
                            parts,
                            TaggedBody::replay(captured, trailers.take(), source),
                        )));
                    }
                }
            },
        }
    }
}

fn is_taggable<B>(resp: &http::Response<B>) -> bool {
    TAGGABLE_STATUSES.contains(&resp.status())
        && !resp.headers().contains_key(ETAG)
        && !resp.headers().contains_key(LAST_MODIFIED)
        && resp.extensions().get::<SendfileHint>().is_none()
}
