//! Temperature override.

use crate::payload::RequestPayload;
use crate::pipeline::PassContext;

/// Force the configured temperature, except when extended thinking is on
/// (the upstream rejects a temperature alongside enabled thinking).
pub fn apply(payload: &mut RequestPayload, ctx: &PassContext<'_>) -> bool {
    if !ctx.targets(payload) {
        return false;
    }
    if payload.thinking_enabled() {
        tracing::debug!("Thinking enabled; temperature left alone");
        return false;
    }

    let temperature = ctx.settings.temperature;
    if payload.temperature == Some(temperature) {
        return false;
    }
    payload.temperature = Some(temperature);
    true
}
