//! Token-count response cache.
//!
//! # Data Flow
//! ```text
//! POST count_tokens (raw bytes)
//!     → key.rs (SHA-256 of the exact bytes)
//!     → store.rs lookup
//!         hit  → cached body served, upstream never contacted
//!         miss → request forwarded with the key attached
//!                → http/observer.rs captures the 200 body
//!                → store.rs insert
//! ```
//!
//! # Design Decisions
//! - Keyed on raw bytes, so re-serialization drift can never alias two requests
//! - Single RwLock around a HashMap; reads share, writes exclude
//! - No eviction or TTL; growth is bounded by distinct requests in one process

pub mod key;
pub mod store;

pub use key::ContentHash;
pub use store::ResponseCache;
