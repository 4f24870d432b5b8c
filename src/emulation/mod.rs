//! Locally synthesized streaming replies.
//!
//! # Data Flow
//! ```text
//! suppression gate fires
//!     → events.rs (seven-event template, fresh message id)
//!     → sink.rs (one body chunk per event)
//!     → text/event-stream response
//! ```
//!
//! The upstream is never contacted. A sink that cannot deliver frames one at a
//! time is refused with a 500 rather than buffered.

pub mod events;
pub mod sink;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

pub use events::{random_message_id, reply_events, StreamEvent, REPLY_MODEL, REPLY_TEXT};
pub use sink::{ChannelSink, EmulationError, EventSink};

/// Push the whole reply through `sink`, one frame per event.
pub fn emit_reply<S: EventSink>(sink: &mut S) -> Result<(), EmulationError> {
    if !sink.flushes_incrementally() {
        return Err(EmulationError::StreamingUnsupported);
    }

    let message_id = random_message_id();
    for event in reply_events(&message_id) {
        sink.send(event.to_frame())?;
    }

    tracing::debug!(message_id = %message_id, "Synthesized streaming reply");
    Ok(())
}

/// Emit through `sink` and wrap `body` (the sink's reader) as the response.
pub fn reply_through<S: EventSink>(sink: &mut S, body: Body) -> Response {
    match emit_reply(sink) {
        Ok(()) => event_stream(body),
        Err(EmulationError::Disconnected) => {
            tracing::debug!("Client disconnected during synthesized reply");
            event_stream(body)
        }
        Err(e @ EmulationError::StreamingUnsupported) => {
            tracing::error!(error = %e, "Cannot stream synthesized reply");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// A complete synthesized streaming reply.
pub fn streamed_reply() -> Response {
    let (mut sink, body) = ChannelSink::open();
    reply_through(&mut sink, body)
}

fn event_stream(body: Body) -> Response {
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    response
}
