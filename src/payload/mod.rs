//! Request payload model.
//!
//! # Design Decisions
//! - Typed only where a rewrite pass needs to look
//! - Unknown fields are flattened into `extra` and written back verbatim
//! - All tool variants collapse into one `ToolDescriptor` shape

pub mod request;
pub mod tool;

pub use request::{
    CacheControl, ContentBlock, Message, MessageContent, RequestPayload, SystemPrompt, TextBlock,
    ThinkingConfig,
};
pub use tool::ToolDescriptor;
