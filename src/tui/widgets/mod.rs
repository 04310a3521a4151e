// ABOUTME: TUI widget sub-modules for the chat transcript and status bar.
// ABOUTME: Each widget is a pure rendering function over state values.

pub mod chat;
pub mod status;
