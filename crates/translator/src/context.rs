//! Prompt context builder.
//!
//! Folds the tail of the caller's conversation into the current utterance so
//! that details given earlier ("it's on June 5th") reach the backend along
//! with the latest request ("create the event").

use querywright_core::message::ConversationTurn;

/// Raw turns considered by default: the last three user/assistant exchanges.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Builds the PromptContext text for one request. Stateless; reuse freely.
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder {
    window: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl ContextBuilder {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Concatenate the user-authored turns of the most recent `window` raw
    /// turns, oldest first, then the current utterance, space-separated.
    ///
    /// With no usable history the result is `utterance` verbatim. Blank user
    /// turns are skipped so they cannot introduce doubled separators.
    pub fn build(&self, utterance: &str, history: &[ConversationTurn]) -> String {
        let start = history.len().saturating_sub(self.window);

        let prior: Vec<&str> = history[start..]
            .iter()
            .filter(|turn| turn.is_user() && !turn.content.trim().is_empty())
            .map(|turn| turn.content.as_str())
            .collect();

        if prior.is_empty() {
            return utterance.to_string();
        }

        let mut context = prior.join(" ");
        context.push(' ');
        context.push_str(utterance);
        context
    }
}
