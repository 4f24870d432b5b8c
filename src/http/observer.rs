//! Capture of upstream responses for the token-count cache.
//!
//! The upstream body is streamed to the client untouched while a copy is
//! collected. When the stream ends cleanly with a `200 OK` and a non-empty
//! body, the copy is stored under the request's content hash.

use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::StatusCode;

use crate::cache::{ContentHash, ResponseCache};

/// Where a completed response is recorded.
#[derive(Debug, Clone)]
pub struct ResponseObserver {
    cache: Arc<ResponseCache>,
    key: ContentHash,
}

impl ResponseObserver {
    pub fn new(cache: Arc<ResponseCache>, key: ContentHash) -> Self {
        Self { cache, key }
    }

    /// Store `body` if the round trip is worth caching.
    pub fn complete(self, status: StatusCode, body: Bytes) {
        tracing::debug!(
            hash = %self.key.short(),
            status = %status,
            body = %String::from_utf8_lossy(&body),
            "Upstream response body"
        );
        if status != StatusCode::OK || body.is_empty() {
            tracing::debug!(hash = %self.key.short(), status = %status, "Response not cached");
            return;
        }
        tracing::info!(hash = %self.key.short(), bytes = body.len(), "Cached token count response");
        self.cache.set(self.key, body);
    }

    /// Wrap an upstream body stream so its bytes are recorded on completion.
    pub fn observe<S>(self, status: StatusCode, inner: S) -> ObservedStream<S> {
        ObservedStream {
            inner,
            status,
            captured: BytesMut::new(),
            observer: Some(self),
        }
    }
}

/// Body stream that copies every chunk it yields.
pub struct ObservedStream<S> {
    inner: S,
    status: StatusCode,
    captured: BytesMut,
    observer: Option<ResponseObserver>,
}

impl<S, E> Stream for ObservedStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    type Item = Result<Bytes, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                if this.observer.is_some() {
                    this.captured.extend_from_slice(&chunk);
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                // A broken body is never cached.
                this.observer = None;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                if let Some(observer) = this.observer.take() {
                    observer.complete(this.status, this.captured.split().freeze());
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
