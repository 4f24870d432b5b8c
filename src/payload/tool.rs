//! Tool descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::payload::request::CacheControl;

/// One entry of the request's `tools` list.
///
/// Every tool variant (custom tools with an `input_schema`, server tools with
/// a `type`) shares this shape; whatever the passes do not touch is kept in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolDescriptor {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<CacheControl>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            cache_control: None,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description length in characters, zero when absent.
    pub fn description_len(&self) -> usize {
        self.description.as_deref().map_or(0, |d| d.chars().count())
    }

    pub fn is_cached(&self) -> bool {
        self.cache_control.is_some()
    }
}
