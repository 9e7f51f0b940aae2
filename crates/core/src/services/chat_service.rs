use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::interpretation::ChatTurn;
use crate::models::variant::VariantRecord;
use crate::providers::traits::{GenerationParams, TextGenerator};
use super::interpretation_service::or_unknown;

const CHAT_TEMPERATURE: f32 = 0.7;

/// Turns replayed into each prompt.
pub const PROMPT_HISTORY_TURNS: usize = 5;

/// Turns kept in memory; older ones are dropped.
pub const MAX_HISTORY_TURNS: usize = 10;

/// One conversation with the variant assistant.
///
/// Each value holds its own history, so give every user their own session.
pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
    history: VecDeque<ChatTurn>,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("provider", &self.generator.name())
            .field("turns", &self.history.len())
            .finish()
    }
}

impl ChatService {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self {
            generator,
            params,
            history: VecDeque::new(),
        }
    }

    /// Answer `message`, optionally about `variant`.
    ///
    /// Provider errors become an apology in the reply and are not recorded
    /// in the history.
    pub async fn send(&mut self, message: &str, variant: Option<&VariantRecord>) -> String {
        let prompt = self.prompt(message, variant);
        let params = GenerationParams {
            temperature: CHAT_TEMPERATURE,
            ..self.params
        };

        let result = self.generator.generate_text(&prompt, params).await;
        match result {
            Ok(reply) => {
                self.history.push_back(ChatTurn {
                    user: message.to_string(),
                    assistant: reply.clone(),
                });
                while self.history.len() > MAX_HISTORY_TURNS {
                    self.history.pop_front();
                }
                debug!(turns = self.history.len(), "chat reply recorded");
                reply
            }
            Err(e) => {
                warn!(error = %e, "chat assistant failed");
                format!("I apologize, but I encountered an error: {e}")
            }
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &ChatTurn> {
        self.history.iter()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn prompt(&self, message: &str, variant: Option<&VariantRecord>) -> String {
        let mut out = String::from(
            "You are a helpful assistant for a genetic variant analysis platform. Answer \
             questions about genetic variants, their clinical significance, and related \
             topics.\n",
        );

        if let Some(v) = variant {
            let _ = writeln!(out, "\nCurrent Variant Context:");
            let _ = writeln!(out, "- Variant: {}", v.locus());
            let _ = writeln!(out, "- Gene: {}", or_unknown(v.gene.as_deref()));
            let _ = writeln!(out, "- Impact: {}", or_unknown(v.impact.as_deref()));
        }

        if !self.history.is_empty() {
            let _ = writeln!(out, "\nPrevious conversation:");
            let skip = self.history.len().saturating_sub(PROMPT_HISTORY_TURNS);
            for turn in self.history.iter().skip(skip) {
                let _ = writeln!(out, "User: {}\nAssistant: {}", turn.user, turn.assistant);
            }
        }

        let _ = write!(
            out,
            "\nUser Question: {message}\n\
             \n\
             Provide a helpful, accurate answer. If you're unsure, say so. If the question \
             needs variant data that isn't in context, ask for clarification.\n\
             \n\
             Answer:"
        );
        out
    }
}
