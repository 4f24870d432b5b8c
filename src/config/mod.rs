//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to the HTTP server and interceptor at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the asset files are hot-reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, validated, ConfigError};
pub use schema::{
    AssetsConfig, ContextConfig, InterceptionConfig, ListenerConfig, ObservabilityConfig,
    ProxyConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
