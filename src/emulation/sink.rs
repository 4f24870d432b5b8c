//! Destinations for emitted event frames.

use axum::body::Body;
use bytes::Bytes;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Errors raised while emitting a synthesized stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmulationError {
    /// The sink would hold frames back instead of delivering each one.
    #[error("Streaming unsupported")]
    StreamingUnsupported,
    /// The client went away before the stream finished.
    #[error("Client disconnected")]
    Disconnected,
}

/// Where emitted frames go.
pub trait EventSink {
    /// True if every sent frame is delivered to the client on its own.
    fn flushes_incrementally(&self) -> bool;

    /// Deliver one frame.
    fn send(&mut self, frame: Bytes) -> Result<(), EmulationError>;
}

/// Sink backed by a channel that feeds a streaming response body. Each frame
/// becomes its own body chunk.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Result<Bytes, Infallible>>,
}

impl ChannelSink {
    /// Create the sink and the body that streams what it receives.
    ///
    /// The body ends once the sink is dropped.
    pub fn open() -> (Self, Body) {
        let (tx, rx) = mpsc::unbounded_channel();
        let body = Body::from_stream(UnboundedReceiverStream::new(rx));
        (Self { tx }, body)
    }
}

impl EventSink for ChannelSink {
    fn flushes_incrementally(&self) -> bool {
        true
    }

    fn send(&mut self, frame: Bytes) -> Result<(), EmulationError> {
        self.tx.send(Ok(frame)).map_err(|_| EmulationError::Disconnected)
    }
}
