//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Upstream API the proxy forwards to.
    pub upstream: UpstreamConfig,

    /// Which requests are intercepted and how they are rewritten.
    pub interception: InterceptionConfig,

    /// Replacement texts fed into the rewrite passes.
    pub assets: AssetsConfig,

    /// Free-text notes interpolated into the user prompt.
    pub context: ContextConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "localhost:8080").
    pub bind_address: String,

    /// Largest request body buffered for inspection.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "localhost:8080".to_string(),
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every request is rewritten onto.
    pub target: String,

    /// Time allowed until the upstream response head arrives, in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            request_timeout_secs: 600,
            connect_timeout_secs: 10,
        }
    }
}

/// Interception settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InterceptionConfig {
    /// Message creation path.
    pub messages_path: String,

    /// Token counting path.
    pub count_tokens_path: String,

    /// Model every rewrite pass is gated on.
    pub target_model: String,

    /// Lightweight model whose verb-generation requests are answered locally.
    pub suppressed_model: String,

    /// Answer verb-generation requests locally.
    pub suppress_verb_generation: bool,

    /// Temperature forced onto target-model requests.
    pub temperature: f64,

    /// Tool descriptions longer than this (in characters) get replaced.
    pub description_limit: usize,

    /// Tools dropped from target-model requests.
    pub removed_tools: Vec<String>,
}

impl Default for InterceptionConfig {
    fn default() -> Self {
        Self {
            messages_path: "/v1/messages".to_string(),
            count_tokens_path: "/v1/messages/count_tokens".to_string(),
            target_model: "claude-sonnet-4-20250514".to_string(),
            suppressed_model: "claude-3-5-haiku-20241022".to_string(),
            suppress_verb_generation: true,
            temperature: 0.0,
            description_limit: 5000,
            removed_tools: vec!["NotebookRead".to_string(), "NotebookEdit".to_string()],
        }
    }
}

/// Asset file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Template rendered over the injected context reminder.
    pub user_prompt_template: PathBuf,

    /// Text that replaces the upstream system prompt.
    pub system_prompt: PathBuf,

    /// Shorter tool descriptions, keyed by tool name.
    pub tool_descriptions: BTreeMap<String, PathBuf>,

    /// Reload assets when the files change.
    pub watch: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let mut tool_descriptions = BTreeMap::new();
        tool_descriptions.insert("Bash".to_string(), PathBuf::from("assets/tools/bash.md"));
        tool_descriptions.insert("Task".to_string(), PathBuf::from("assets/tools/task.md"));

        Self {
            user_prompt_template: PathBuf::from("assets/user_prompt.md"),
            system_prompt: PathBuf::from("assets/system_prompt.md"),
            tool_descriptions,
            watch: true,
        }
    }
}

/// Context note locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Project root the project notes live in.
    pub root_dir: PathBuf,

    /// User-private notes. Defaults to `~/.claude/CLAUDE.md`.
    pub user_private: Option<PathBuf>,

    /// Project-private notes file name, relative to `root_dir`.
    pub project_private_file: String,

    /// Project-public notes file name, relative to `root_dir`.
    pub project_public_file: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            user_private: None,
            project_private_file: "CLAUDE.local.md".to_string(),
            project_public_file: "CLAUDE.md".to_string(),
        }
    }
}

impl ContextConfig {
    /// Absolute-or-relative path of the user-private notes, if one can be resolved.
    pub fn user_private_path(&self) -> Option<PathBuf> {
        self.user_private
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".claude").join("CLAUDE.md")))
    }

    pub fn project_private_path(&self) -> PathBuf {
        self.root_dir.join(&self.project_private_file)
    }

    pub fn project_public_path(&self) -> PathBuf {
        self.root_dir.join(&self.project_public_file)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "prompt_proxy=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
