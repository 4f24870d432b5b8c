//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → intercept (local answer, rewrite, or pass through)
//!     → upstream.rs (URL rewrite, hop-by-hop strip, stream)
//!         → observer.rs (copy a token-count response into the cache)
//!     → Send to client
//! ```

pub mod observer;
pub mod server;
pub mod upstream;

pub use observer::ResponseObserver;
pub use server::{AppState, HttpServer, X_REQUEST_ID};
pub use upstream::{Upstream, UpstreamError};
