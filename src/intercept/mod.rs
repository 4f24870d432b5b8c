//! Request interception.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → not POST, or path is neither messages nor count_tokens
//!         → PassThrough (body never read)
//!     → messages
//!         → undecodable          → PassThrough (original bytes)
//!         → verb generation      → Handled (emulation::streamed_reply)
//!         → pipeline::run
//!             unchanged          → PassThrough (original bytes)
//!             changed            → Rewritten (re-encoded, new Content-Length)
//!     → count_tokens
//!         → cache hit            → Handled (stored body)
//!         → cache miss           → PassThrough with the content hash
//! ```

pub mod interceptor;

pub use interceptor::{Disposition, RequestInterceptor};
