//! Replacement texts consumed by the rewrite passes.
//!
//! # Data Flow
//! ```text
//! AssetsConfig (paths)
//!     → Assets::load (read every file, absent on failure)
//!     → AssetStore (ArcSwap, one snapshot per request)
//!
//! On file change:
//!     watcher.rs sees modify/create/remove in an asset directory
//!     → AssetStore::reload
//!     → atomic swap; in-flight requests keep their snapshot
//!
//! Per request, only when the user-prompt sentinel is present:
//!     ContextConfig → notes.rs (async reads, empty on failure)
//! ```
//!
//! # Design Decisions
//! - A missing asset disables the pass that needs it; nothing else fails
//! - Notes are read fresh each time since they are edited while the proxy runs

pub mod notes;
pub mod watcher;

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AssetsConfig;

pub use notes::ContextNotes;
pub use watcher::AssetWatcher;

/// One consistent set of asset texts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assets {
    pub user_prompt_template: Option<String>,
    pub system_prompt: Option<String>,
    pub tool_descriptions: HashMap<String, String>,
}

impl Assets {
    /// Read every configured file. Unreadable files are logged and left out.
    pub fn load(config: &AssetsConfig) -> Self {
        let tool_descriptions = config
            .tool_descriptions
            .iter()
            .filter_map(|(name, path)| read_asset("tool description", path).map(|text| (name.clone(), text)))
            .collect();

        Self {
            user_prompt_template: read_asset("user prompt template", &config.user_prompt_template),
            system_prompt: read_asset("system prompt", &config.system_prompt),
            tool_descriptions,
        }
    }

    pub fn tool_description(&self, name: &str) -> Option<&str> {
        self.tool_descriptions.get(name).map(String::as_str)
    }
}

fn read_asset(kind: &'static str, path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!(kind, path = %path.display(), bytes = text.len(), "Loaded asset");
            Some(text)
        }
        Err(e) => {
            tracing::warn!(kind, path = %path.display(), error = %e, "Asset unavailable");
            None
        }
    }
}

/// Current asset snapshot, swappable at runtime.
#[derive(Debug)]
pub struct AssetStore {
    config: AssetsConfig,
    current: ArcSwap<Assets>,
}

impl AssetStore {
    pub fn load(config: AssetsConfig) -> Self {
        let assets = Assets::load(&config);
        Self {
            config,
            current: ArcSwap::from_pointee(assets),
        }
    }

    /// A store holding fixed texts; `reload` re-reads the default paths.
    pub fn from_assets(assets: Assets) -> Self {
        Self {
            config: AssetsConfig::default(),
            current: ArcSwap::from_pointee(assets),
        }
    }

    pub fn current(&self) -> Arc<Assets> {
        self.current.load_full()
    }

    /// Re-read every file and publish the new set.
    pub fn reload(&self) {
        self.current.store(Arc::new(Assets::load(&self.config)));
        tracing::info!("Assets reloaded");
    }

    /// Every file the store reads.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![
            self.config.user_prompt_template.clone(),
            self.config.system_prompt.clone(),
        ];
        paths.extend(self.config.tool_descriptions.values().cloned());
        paths
    }
}
