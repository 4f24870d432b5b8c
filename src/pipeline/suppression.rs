//! Gate for requests answered locally instead of upstream.
//!
//! The client asks the lightweight model for a single whimsical gerund to
//! show as a spinner label. The answer never matters, so the round trip is
//! skipped and a canned reply is streamed back.

use crate::config::InterceptionConfig;
use crate::payload::RequestPayload;

/// Instruction that identifies a verb-generation request.
pub const VERB_GENERATION_PROMPT: &str = "Analyze this message and come up with a single positive, cheerful and delightful verb in gerund form that's related to the message. Only include the word with no other text or punctuation. The word should have the first letter capitalized. Add some whimsy and surprise to entertain the user. Ensure the word is highly relevant to the user's message.";

/// True when the request should be answered by the stream emulator.
pub fn should_suppress(payload: &RequestPayload, settings: &InterceptionConfig) -> bool {
    settings.suppress_verb_generation
        && payload.model == settings.suppressed_model
        && payload.system_block_count() == 1
        && payload
            .first_system_text()
            .is_some_and(|text| text.contains(VERB_GENERATION_PROMPT))
}
