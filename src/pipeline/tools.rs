//! Tool list rewrites: description truncation, removal, cache marker.

use crate::payload::{CacheControl, RequestPayload};
use crate::pipeline::PassContext;

/// Swap oversized descriptions for the configured shorter text, then drop
/// the removed tools. Order of the survivors is preserved.
pub fn filter(payload: &mut RequestPayload, ctx: &PassContext<'_>) -> bool {
    if !ctx.targets(payload) {
        return false;
    }
    let Some(tools) = payload.tools_mut() else {
        return false;
    };

    let mut changed = false;
    let limit = ctx.settings.description_limit;
    for tool in tools.iter_mut().filter(|t| t.description_len() > limit) {
        match ctx.assets.tool_description(&tool.name) {
            Some(text) if tool.description.as_deref() != Some(text) => {
                tracing::debug!(tool = %tool.name, from = tool.description_len(), to = text.chars().count(), "Replacing tool description");
                tool.description = Some(text.to_string());
                changed = true;
            }
            Some(_) => {}
            None => tracing::debug!(tool = %tool.name, "No replacement for oversized tool description"),
        }
    }

    let before = tools.len();
    tools.retain(|t| !ctx.settings.removed_tools.contains(&t.name));
    if tools.len() != before {
        tracing::debug!(removed = before - tools.len(), "Removed tools");
        changed = true;
    }

    changed
}

/// Mark the last remaining tool for prompt caching. Runs after `filter` so
/// the marker never lands on a tool that is later removed.
pub fn annotate_last(payload: &mut RequestPayload, ctx: &PassContext<'_>) -> bool {
    if !ctx.targets(payload) {
        return false;
    }
    match payload.tools_mut().and_then(|tools| tools.last_mut()) {
        Some(last) if !last.is_cached() => {
            last.cache_control = Some(CacheControl::ephemeral());
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{context, payload};
    use serde_json::json;

    #[test]
    fn oversized_known_description_replaced() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({
            "tools": [
                {"name": "Bash", "description": "x".repeat(6000), "input_schema": {"type": "object"}},
                {"name": "Task", "description": "short"}
            ]
        }));

        assert!(filter(&mut request, &ctx));
        let tools = request.tools.as_ref().unwrap();
        assert_eq!(tools[0].description.as_deref(), Some("Short Bash description."));
        assert_eq!(tools[0].extra["input_schema"], json!({"type": "object"}));
        assert_eq!(tools[1].description.as_deref(), Some("short"));
        assert!(!filter(&mut request, &ctx));
    }

    #[test]
    fn oversized_unknown_description_kept() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let long = "y".repeat(5001);
        let mut request = payload(json!({"tools": [{"name": "Custom", "description": long.clone()}]}));

        assert!(!filter(&mut request, &ctx));
        assert_eq!(request.tools.unwrap()[0].description.as_deref(), Some(long.as_str()));
    }

    #[test]
    fn description_at_limit_kept() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({"tools": [{"name": "Bash", "description": "z".repeat(5000)}]}));

        assert!(!filter(&mut request, &ctx));
    }

    #[test]
    fn removal_is_a_stable_filter() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({
            "tools": [
                {"name": "Read"},
                {"name": "NotebookRead"},
                {"name": "Edit"},
                {"name": "NotebookEdit"},
                {"name": "Write"}
            ]
        }));

        assert!(filter(&mut request, &ctx));
        let names: Vec<_> = request.tools.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Read", "Edit", "Write"]);
    }

    #[test]
    fn duplicates_pass_through() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({"tools": [{"name": "Read"}, {"name": "Read"}]}));

        assert!(!filter(&mut request, &ctx));
        assert_eq!(request.tools.unwrap().len(), 2);
    }

    #[test]
    fn annotates_only_last_tool() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({"tools": [{"name": "Read"}, {"name": "Write"}]}));

        assert!(annotate_last(&mut request, &ctx));
        let tools = request.tools.as_ref().unwrap();
        assert!(!tools[0].is_cached());
        assert!(tools[1].is_cached());
        assert!(!annotate_last(&mut request, &ctx));
    }

    #[test]
    fn empty_or_absent_tools_are_safe() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);

        let mut empty = payload(json!({"tools": []}));
        assert!(!filter(&mut empty, &ctx));
        assert!(!annotate_last(&mut empty, &ctx));

        let mut absent = payload(json!({}));
        assert!(!filter(&mut absent, &ctx));
        assert!(!annotate_last(&mut absent, &ctx));
        assert!(absent.tools.is_none());
    }

    #[test]
    fn all_tools_removed_leaves_nothing_to_annotate() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({"tools": [{"name": "NotebookRead"}]}));

        assert!(filter(&mut request, &ctx));
        assert!(!annotate_last(&mut request, &ctx));
        assert_eq!(request.tools, Some(vec![]));
    }
}
