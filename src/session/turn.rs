// ABOUTME: Conversation primitives — role-tagged turns and the per-session ordered history.
// ABOUTME: A Session is append-only; the display transcript is a role-filtered view of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a turn. Serialized lowercase to match the chat-completion wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Whether turns with this role appear in the visible transcript.
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::User | Self::Assistant)
    }
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// One conversation's ordered history.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a turn at the end of the history.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.updated_at = Utc::now();
    }

    /// Drop every turn, keeping the session itself.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.updated_at = Utc::now();
    }

    /// The user/assistant turns shown to the user, in conversational order.
    pub fn visible_turns(&self) -> Vec<Turn> {
        self.turns
            .iter()
            .filter(|t| t.role.is_visible())
            .cloned()
            .collect()
    }
}
