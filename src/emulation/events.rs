//! Event template for the synthesized reply.

use bytes::Bytes;
use serde_json::{json, Value};

/// Model name reported in the synthesized `message_start`.
pub const REPLY_MODEL: &str = "claude-3-5-haiku-20241022";

/// The single word the synthesized reply contains.
pub const REPLY_TEXT: &str = "Processing";

/// One server-sent event.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEvent {
    pub name: &'static str,
    pub data: Value,
}

impl StreamEvent {
    fn new(name: &'static str, data: Value) -> Self {
        Self { name, data }
    }

    /// Wire form: `event: <name>\ndata: <json>\n\n`.
    pub fn to_frame(&self) -> Bytes {
        Bytes::from(format!("event: {}\ndata: {}\n\n", self.name, self.data))
    }
}

/// `msg_` followed by 8 random bytes in hex.
pub fn random_message_id() -> String {
    let bytes: [u8; 8] = rand::random();
    format!("msg_{}", hex::encode(bytes))
}

/// The seven events of a complete one-word streamed reply.
pub fn reply_events(message_id: &str) -> Vec<StreamEvent> {
    vec![
        StreamEvent::new(
            "message_start",
            json!({
                "type": "message_start",
                "message": {
                    "id": message_id,
                    "type": "message",
                    "role": "assistant",
                    "model": REPLY_MODEL,
                    "content": [],
                    "stop_reason": null,
                    "stop_sequence": null,
                    "usage": {
                        "input_tokens": 207,
                        "cache_creation_input_tokens": 0,
                        "cache_read_input_tokens": 0,
                        "output_tokens": 2,
                        "service_tier": "standard",
                    },
                },
            }),
        ),
        StreamEvent::new(
            "content_block_start",
            json!({
                "type": "content_block_start",
                "index": 0,
                "content_block": {"type": "text", "text": ""},
            }),
        ),
        StreamEvent::new("ping", json!({"type": "ping"})),
        StreamEvent::new(
            "content_block_delta",
            json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "text_delta", "text": REPLY_TEXT},
            }),
        ),
        StreamEvent::new(
            "content_block_stop",
            json!({"type": "content_block_stop", "index": 0}),
        ),
        StreamEvent::new(
            "message_delta",
            json!({
                "type": "message_delta",
                "delta": {"stop_reason": "end_turn", "stop_sequence": null},
                "usage": {"output_tokens": 5},
            }),
        ),
        StreamEvent::new("message_stop", json!({"type": "message_stop"})),
    ]
}
