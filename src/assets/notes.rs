//! Free-text context notes interpolated into the user prompt.

use std::path::Path;

use crate::config::ContextConfig;

/// The three note files. Absent or unreadable files are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextNotes {
    pub user_private: String,
    pub project_private: String,
    pub project_public: String,
}

impl ContextNotes {
    pub async fn load(config: &ContextConfig) -> Self {
        let user_private = match config.user_private_path() {
            Some(path) => read_note("user_private", &path).await,
            None => {
                tracing::warn!("No home directory; user-private notes left empty");
                String::new()
            }
        };

        Self {
            user_private,
            project_private: read_note("project_private", &config.project_private_path()).await,
            project_public: read_note("project_public", &config.project_public_path()).await,
        }
    }
}

async fn read_note(kind: &'static str, path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(kind, path = %path.display(), error = %e, "Context notes unavailable");
            String::new()
        }
    }
}
