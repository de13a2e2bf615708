use std::{
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use http::HeaderMap;
use http_body::{Body, Frame, SizeHint};
use pin_project::pin_project;

/// Response extension marking the body as a filesystem-backed zero-copy
/// transfer (a sendfile handle). Buffering such a body would defeat its
/// purpose, so marked responses pass through the middleware untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SendfileHint;

/// `http::Response` body type of [`ResponseTagger`](crate::ResponseTagger)
///
/// The replay variant keeps the drained upstream source alive so it is
/// released together with this body, never earlier.
#[pin_project(project = TaggedBodyProj)]
#[derive(Debug)]
pub enum TaggedBody<B> {
    /// Ineligible path: the original source, untouched.
    Passthrough(#[pin] B),
    /// Buffered path: replays the captured bytes and trailers.
    Replay {
        buf: Option<Bytes>,
        trailers: Option<HeaderMap>,
        source: B,
    },
}

impl<B> TaggedBody<B> {
    pub(crate) fn passthrough(body: B) -> Self {
        Self::Passthrough(body)
    }

    pub(crate) fn replay(buf: Bytes, trailers: Option<HeaderMap>, source: B) -> Self {
        Self::Replay {
            buf: if buf.is_empty() { None } else { Some(buf) },
            trailers,
            source,
        }
    }
}

impl<B: Body<Data = Bytes>> Body for TaggedBody<B> {
    /// Data has to be Bytes due to axum's blanket IntoResponse impl
    /// for Response<B: Body<Data = Bytes>>
    type Data = Bytes;

    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            TaggedBodyProj::Passthrough(b) => b.poll_frame(cx),
            TaggedBodyProj::Replay { buf, trailers, .. } => {
                if let Some(bytes) = buf.take() {
                    return Poll::Ready(Some(Ok(Frame::data(bytes))));
                }
                match trailers.take() {
                    Some(t) => Poll::Ready(Some(Ok(Frame::trailers(t)))),
                    None => Poll::Ready(None),
                }
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Passthrough(b) => b.is_end_stream(),
            Self::Replay { buf, trailers, .. } => buf.is_none() && trailers.is_none(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            Self::Passthrough(b) => b.size_hint(),
            Self::Replay { buf, .. } => {
                SizeHint::with_exact(buf.as_ref().map_or(0, Bytes::len) as u64)
            }
        }
    }
}
