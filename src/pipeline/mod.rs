//! Request rewrite pipeline.
//!
//! # Data Flow
//! ```text
//! decoded RequestPayload
//!     → suppression.rs (pass zero: answer locally, nothing else runs)
//!     → temperature.rs
//!     → user_prompt.rs
//!     → system_prompt.rs
//!     → tools.rs (filter, then annotate the last survivor)
//!     → changed? re-encode once : forward the original bytes
//! ```
//!
//! # Design Decisions
//! - Each pass is a plain function: inspect, mutate in place, report a change
//! - Every pass carries its own gate; a miss is a no-op, never an error
//! - A pass whose asset is missing reports no change and the rest still run
//! - Passes are idempotent, so a rewritten request rewrites to itself
//! - The order is fixed; tool annotation must follow tool removal

pub mod suppression;
pub mod system_prompt;
pub mod temperature;
pub mod tools;
pub mod user_prompt;

use crate::assets::{Assets, ContextNotes};
use crate::config::InterceptionConfig;
use crate::payload::RequestPayload;

pub use suppression::should_suppress;
pub use user_prompt::wants_context_notes;

/// Everything a pass may read besides the payload itself.
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    pub settings: &'a InterceptionConfig,
    pub assets: &'a Assets,
    pub notes: &'a ContextNotes,
}

impl<'a> PassContext<'a> {
    pub fn new(settings: &'a InterceptionConfig, assets: &'a Assets, notes: &'a ContextNotes) -> Self {
        Self {
            settings,
            assets,
            notes,
        }
    }

    /// The model gate shared by every pass.
    pub fn targets(&self, payload: &RequestPayload) -> bool {
        payload.model == self.settings.target_model
    }
}

type Pass = fn(&mut RequestPayload, &PassContext<'_>) -> bool;

const PASSES: [(&str, Pass); 5] = [
    ("temperature", temperature::apply),
    ("user_prompt", user_prompt::apply),
    ("system_prompt", system_prompt::apply),
    ("tool_filter", tools::filter),
    ("tool_cache_control", tools::annotate_last),
];

/// Run every pass in order. Returns true if any of them changed the payload.
pub fn run(payload: &mut RequestPayload, ctx: &PassContext<'_>) -> bool {
    let mut changed = false;
    for (name, pass) in PASSES {
        if pass(payload, ctx) {
            tracing::debug!(pass = name, model = %payload.model, "Pass rewrote request");
            changed = true;
        }
    }
    changed
}
