//! Substitution of the injected context reminder in the first user message.

use crate::assets::ContextNotes;
use crate::config::InterceptionConfig;
use crate::payload::RequestPayload;
use crate::pipeline::PassContext;

/// Opening of the reminder block the client prepends to the first message.
pub const CONTEXT_REMINDER_PREFIX: &str =
    "<system-reminder>\nAs you answer the user's questions, you can use the following context:";

/// True when the pass would fire, so notes are only read when needed.
pub fn wants_context_notes(payload: &RequestPayload, settings: &InterceptionConfig) -> bool {
    payload.model == settings.target_model
        && payload
            .first_message_text()
            .is_some_and(|text| text.starts_with(CONTEXT_REMINDER_PREFIX))
}

pub fn apply(payload: &mut RequestPayload, ctx: &PassContext<'_>) -> bool {
    if !wants_context_notes(payload, ctx.settings) {
        return false;
    }
    let Some(template) = ctx.assets.user_prompt_template.as_deref() else {
        tracing::warn!("User prompt template unavailable; context reminder kept");
        return false;
    };
    let Some(text) = payload.first_message_text_mut() else {
        return false;
    };

    let rendered = render(template, ctx.notes);
    if *text == rendered {
        return false;
    }
    *text = rendered;
    true
}

/// Fill `{{user_private}}`, `{{project_private}}` and `{{project_public}}`.
///
/// Substituted text is never re-scanned, so notes that happen to contain
/// placeholder syntax come through literally. Unknown placeholders are kept.
pub fn render(template: &str, notes: &ContextNotes) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        match after_open[..end].trim() {
            "user_private" => out.push_str(&notes.user_private),
            "project_private" => out.push_str(&notes.project_private),
            "project_public" => out.push_str(&notes.project_public),
            _ => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{context, payload};
    use serde_json::json;

    fn notes() -> ContextNotes {
        ContextNotes {
            user_private: "I like short answers.".into(),
            project_private: String::new(),
            project_public: "Run `make test`.".into(),
        }
    }

    #[test]
    fn render_fills_placeholders() {
        let rendered = render(
            "User: {{user_private}}\nLocal: {{ project_private }}\nProject: {{project_public}}",
            &notes(),
        );
        assert_eq!(rendered, "User: I like short answers.\nLocal: \nProject: Run `make test`.");
    }

    #[test]
    fn render_keeps_unknown_and_unterminated_placeholders() {
        assert_eq!(render("{{other}} and {{user_private", &notes()), "{{other}} and {{user_private");
    }

    #[test]
    fn render_does_not_rescan_substitutions() {
        let notes = ContextNotes {
            user_private: "{{project_public}}".into(),
            ..Default::default()
        };
        assert_eq!(render("{{user_private}}", &notes), "{{project_public}}");
    }

    #[test]
    fn replaces_reminder_block() {
        let (settings, mut assets, _) = context();
        assets.user_prompt_template = Some("Notes: {{project_public}}".into());
        let notes = notes();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": format!("{}\n# claudeMd\n...", CONTEXT_REMINDER_PREFIX)},
                    {"type": "text", "text": "fix the build"}
                ]
            }]
        }));

        assert!(apply(&mut request, &ctx));
        assert_eq!(request.first_message_text(), Some("Notes: Run `make test`."));
        assert!(!apply(&mut request, &ctx));
    }

    #[test]
    fn ordinary_first_message_untouched() {
        let (settings, mut assets, notes) = context();
        assets.user_prompt_template = Some("template".into());
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({}));

        assert!(!apply(&mut request, &ctx));
    }

    #[test]
    fn missing_template_leaves_reminder() {
        let (settings, mut assets, notes) = context();
        assets.user_prompt_template = None;
        let ctx = PassContext::new(&settings, &assets, &notes);
        let reminder = format!("{} stuff", CONTEXT_REMINDER_PREFIX);
        let mut request = payload(json!({"messages": [{"role": "user", "content": reminder.clone()}]}));

        assert!(!apply(&mut request, &ctx));
        assert_eq!(request.first_message_text(), Some(reminder.as_str()));
    }

    #[test]
    fn empty_messages_are_safe() {
        let (settings, assets, notes) = context();
        let ctx = PassContext::new(&settings, &assets, &notes);
        let mut request = payload(json!({"messages": []}));

        assert!(!wants_context_notes(&request, &settings));
        assert!(!apply(&mut request, &ctx));
    }
}
