//! Asset file watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::assets::AssetStore;

/// Reloads an `AssetStore` whenever one of its files changes.
pub struct AssetWatcher {
    store: Arc<AssetStore>,
}

impl AssetWatcher {
    pub fn new(store: Arc<AssetStore>) -> Self {
        Self { store }
    }

    /// Start watching every asset directory in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let paths = self.store.paths();
        let file_names: BTreeSet<OsString> = paths
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_os_string()))
            .collect();
        let dirs: BTreeSet<PathBuf> = paths.iter().map(|p| parent_dir(p)).collect();

        let store = self.store.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let relevant = event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove();
                    let touches_asset = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().is_some_and(|n| file_names.contains(n)));
                    if relevant && touches_asset {
                        tracing::info!(paths = ?event.paths, "Asset change detected, reloading...");
                        store.reload();
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for dir in &dirs {
            match watcher.watch(dir, RecursiveMode::NonRecursive) {
                Ok(()) => tracing::info!(path = %dir.display(), "Asset watcher started"),
                Err(e) => tracing::warn!(path = %dir.display(), error = %e, "Cannot watch asset directory"),
            }
        }

        Ok(watcher)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
