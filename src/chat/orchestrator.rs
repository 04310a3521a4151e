// ABOUTME: Orchestrator — sends a user message with the session's history and commits on success.
// ABOUTME: A failed completion leaves the session exactly as it was before the call.

use std::sync::Arc;

use tracing::{info, warn};

use crate::chat::completion::{CompletionRequest, CompletionService, Usage};
use crate::error::ChatError;
use crate::session::{SessionStore, Turn};

/// The assistant's answer to one `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    pub usage: Usage,
}

/// Ties the session store to a completion service for one model.
pub struct Orchestrator {
    store: Arc<SessionStore>,
    service: Arc<dyn CompletionService>,
    model: String,
}

impl Orchestrator {
    pub fn new(
        store: Arc<SessionStore>,
        service: Arc<dyn CompletionService>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            service,
            model: model.into(),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Send `user_text` on `session_id`.
    ///
    /// The outbound sequence is the system instruction, every prior turn
    /// oldest first, then the new user turn. The session stays locked for the
    /// whole call, so sends on the same session never interleave. On success
    /// the user and assistant turns are appended in that order.
    pub async fn send(
        &self,
        session_id: &str,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<AssistantReply, ChatError> {
        let handle = self.store.get_or_create(session_id);
        let mut session = handle.lock().await;

        let user_turn = Turn::user(user_text);
        let mut messages = Vec::with_capacity(session.len() + 2);
        messages.push(Turn::system(system_instruction));
        messages.extend(session.turns().iter().cloned());
        messages.push(user_turn.clone());

        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
        };

        match self.service.complete(&request).await {
            Ok(completion) => {
                session.push(user_turn);
                session.push(Turn::assistant(completion.text.clone()));
                info!(
                    session_id,
                    turns = session.len(),
                    total_tokens = completion.usage.total_tokens,
                    "reply committed"
                );
                Ok(AssistantReply {
                    text: completion.text,
                    usage: completion.usage,
                })
            }
            Err(err) => {
                warn!(session_id, tag = err.tag(), error = %err, "send failed, session unchanged");
                Err(err)
            }
        }
    }
}
