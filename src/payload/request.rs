//! Message creation request body.
//!
//! Only the fields the rewrite passes look at are typed. Everything else is
//! kept in `extra` maps so a decode/encode cycle never drops data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::payload::tool::ToolDescriptor;

/// Decoded chat-completion request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestPayload {
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemPrompt>,

    #[serde(default)]
    pub messages: Vec<Message>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDescriptor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestPayload {
    /// Number of system blocks; a plain string counts as one.
    pub fn system_block_count(&self) -> usize {
        match &self.system {
            None => 0,
            Some(SystemPrompt::Text(_)) => 1,
            Some(SystemPrompt::Blocks(blocks)) => blocks.len(),
        }
    }

    /// Text of the first system block.
    pub fn first_system_text(&self) -> Option<&str> {
        match &self.system {
            None => None,
            Some(SystemPrompt::Text(text)) => Some(text),
            Some(SystemPrompt::Blocks(blocks)) => blocks.first().map(|b| b.text.as_str()),
        }
    }

    /// Mutable text of the first message's first text-carrying block.
    pub fn first_message_text_mut(&mut self) -> Option<&mut String> {
        self.messages.first_mut()?.first_text_mut()
    }

    pub fn first_message_text(&self) -> Option<&str> {
        self.messages.first()?.first_text()
    }

    /// Whether extended thinking is explicitly turned on.
    pub fn thinking_enabled(&self) -> bool {
        self.thinking.as_ref().is_some_and(ThinkingConfig::is_enabled)
    }

    pub fn tools_mut(&mut self) -> Option<&mut Vec<ToolDescriptor>> {
        self.tools.as_mut()
    }
}

/// The `system` field accepts either a bare string or a list of text blocks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SystemPrompt {
    Text(String),
    Blocks(Vec<TextBlock>),
}

/// A text block with an optional cache annotation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextBlock {
    #[serde(rename = "type", default = "text_kind")]
    pub kind: String,

    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<CacheControl>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn text_kind() -> String {
    "text".to_string()
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: text_kind(),
            text: text.into(),
            cache_control: None,
            extra: Map::new(),
        }
    }

    pub fn cached(mut self) -> Self {
        self.cache_control = Some(CacheControl::ephemeral());
        self
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub role: String,

    pub content: MessageContent,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    fn first_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(blocks) => blocks.first()?.text.as_deref(),
        }
    }

    fn first_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(blocks) => blocks.first_mut()?.text.as_mut(),
        }
    }
}

/// Message content: a bare string is one text block.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// Any content block. Only `text` is inspected; images, tool results and
/// the like ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Extended thinking settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThinkingConfig {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ThinkingConfig {
    pub fn is_enabled(&self) -> bool {
        self.kind == "enabled"
    }
}

/// Prompt caching marker attached to system and tool blocks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheControl {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CacheControl {
    pub fn ephemeral() -> Self {
        Self {
            kind: "ephemeral".to_string(),
            extra: Map::new(),
        }
    }
}
