//! Errors that stop the proxy from starting.

use crate::config::ConfigError;
use crate::http::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("upstream client error: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("asset watcher error: {0}")]
    Watch(#[from] notify::Error),
}
