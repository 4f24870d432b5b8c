//! System prompt replacement.

use crate::payload::{RequestPayload, SystemPrompt, TextBlock};
use crate::pipeline::PassContext;

/// First system block. The upstream refuses these requests without it, so
/// it is sent exactly as written.
pub const IDENTITY: &str = "You are Claude Code, Anthropic's official CLI for Claude.";

/// Replace any system prompt with the identity line plus the configured text,
/// the latter marked for prompt caching.
pub fn apply(payload: &mut RequestPayload, ctx: &PassContext<'_>) -> bool {
    if !ctx.targets(payload) || payload.system_block_count() == 0 {
        return false;
    }
    let Some(replacement) = ctx.assets.system_prompt.as_deref() else {
        tracing::warn!("System prompt asset unavailable; system prompt kept");
        return false;
    };

    let replaced = SystemPrompt::Blocks(vec![
        TextBlock::new(IDENTITY),
        TextBlock::new(replacement).cached(),
    ]);
    if payload.system.as_ref() == Some(&replaced) {
        return false;
    }
    payload.system = Some(replaced);
    true
}
