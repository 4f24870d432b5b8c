//! Prompt-rewriting proxy library.
//!
//! Sits between a coding-assistant client and the model API, rewriting
//! requests for one target model and answering a few requests locally.

pub mod assets;
pub mod cache;
pub mod cli;
pub mod config;
pub mod emulation;
pub mod error;
pub mod http;
pub mod intercept;
pub mod lifecycle;
pub mod observability;
pub mod payload;
pub mod pipeline;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
