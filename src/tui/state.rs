// ABOUTME: TUI state types — visible transcript, notices, chat/user events, and the input buffer.
// ABOUTME: The transcript is a snapshot of the session's visible turns, replaced after each reply.

use crate::chat::Usage;
use crate::error::ChatError;
use crate::session::{Role, Turn};

/// The kind of a single rendered chat entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessageKind {
    User,
    Assistant,
    /// A user line that has been sent but not answered yet.
    Pending,
    Notice {
        is_error: bool,
    },
}

/// A single entry in the rendered chat.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub kind: ChatMessageKind,
    pub content: String,
}

/// UI-only message anchored after the first `at` transcript turns.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub at: usize,
    pub text: String,
    pub is_error: bool,
}

/// Events sent from the chat worker to the TUI.
#[derive(Debug)]
pub enum ChatEvent {
    /// A send has started.
    Thinking,
    /// A send succeeded; `transcript` is the session's full visible history.
    Reply {
        transcript: Vec<Turn>,
        usage: Usage,
    },
    /// A send failed; the session is unchanged.
    Failed(ChatError),
    /// The session history was cleared.
    Cleared,
}

/// Events sent from the TUI to the chat worker.
#[derive(Debug, PartialEq)]
pub enum UserEvent {
    /// User submitted a chat message.
    Message(String),
    /// User asked to start the conversation over.
    Clear,
    /// User requested to quit.
    Quit,
}

/// Full TUI application state.
pub struct TuiState {
    pub transcript: Vec<Turn>,
    pub notices: Vec<Notice>,
    pub pending: Option<String>,
    pub waiting: bool,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    pub model: String,
    pub session_id: String,
    pub total_tokens: u64,
    pub context_used: u64,
}

impl TuiState {
    /// Create a new empty TUI state for the given model and session.
    pub fn new(model: String, session_id: String) -> Self {
        Self {
            transcript: Vec::new(),
            notices: Vec::new(),
            pending: None,
            waiting: false,
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            model,
            session_id,
            total_tokens: 0,
            context_used: 0,
        }
    }

    /// Add an informational notice at the current end of the transcript.
    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.add_notice(text.into(), false);
    }

    /// Add an error notice at the current end of the transcript.
    pub fn push_error(&mut self, text: impl Into<String>) {
        self.add_notice(text.into(), true);
    }

    fn add_notice(&mut self, text: String, is_error: bool) {
        self.notices.push(Notice {
            at: self.transcript.len(),
            text,
            is_error,
        });
        self.scroll_offset = 0;
    }

    /// Mark `text` as sent and waiting for a reply.
    pub fn begin_send(&mut self, text: String) {
        self.pending = Some(text);
        self.waiting = true;
        self.scroll_offset = 0;
    }

    /// Fold a worker event into the state.
    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Thinking => {
                self.waiting = true;
            }
            ChatEvent::Reply { transcript, usage } => {
                self.transcript = transcript;
                self.pending = None;
                self.waiting = false;
                self.total_tokens += usage.total_tokens;
                self.context_used = usage.prompt_tokens;
                self.scroll_offset = 0;
            }
            ChatEvent::Failed(err) => {
                self.waiting = false;
                if let Some(text) = self.pending.take() {
                    // Give the unsent line back so it can be retried.
                    if self.input.is_empty() {
                        self.input = text;
                        self.cursor_pos = self.input_char_len();
                    }
                }
                self.push_error(format!("\u{26a0}\u{fe0f} Error: {}", err));
            }
            ChatEvent::Cleared => {
                self.transcript.clear();
                self.notices.clear();
                self.pending = None;
                self.waiting = false;
                self.context_used = 0;
                self.push_notice("Conversation cleared");
            }
        }
    }

    /// Interleave transcript turns, notices, and the pending line in display order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut out = Vec::with_capacity(self.transcript.len() + self.notices.len() + 1);
        let mut notices = self.notices.iter().peekable();

        for (idx, turn) in self.transcript.iter().enumerate() {
            while let Some(n) = notices.next_if(|n| n.at <= idx) {
                out.push(notice_message(n));
            }
            let kind = match turn.role {
                Role::Assistant => ChatMessageKind::Assistant,
                Role::User | Role::System => ChatMessageKind::User,
            };
            out.push(ChatMessage {
                kind,
                content: turn.text.clone(),
            });
        }
        out.extend(notices.map(notice_message));

        if let Some(ref text) = self.pending {
            out.push(ChatMessage {
                kind: ChatMessageKind::Pending,
                content: text.clone(),
            });
        }
        out
    }

    /// Submit the current input buffer. Returns the trimmed text if non-empty.
    pub fn submit_input(&mut self) -> Option<String> {
        let trimmed = self.input.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        self.input.clear();
        self.cursor_pos = 0;
        Some(trimmed)
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    /// Return the total number of characters in the input buffer.
    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Insert a string at the cursor (used for pasted text).
    pub fn insert_str_at_cursor(&mut self, s: &str) {
        for c in s.chars().filter(|c| *c != '\r' && *c != '\n') {
            self.insert_char_at_cursor(c);
        }
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    /// Move cursor one character to the left.
    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor one character to the right.
    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to start of input.
    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Move cursor to end of input.
    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }
}

fn notice_message(notice: &Notice) -> ChatMessage {
    ChatMessage {
        kind: ChatMessageKind::Notice {
            is_error: notice.is_error,
        },
        content: notice.text.clone(),
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
