// ABOUTME: E2E tests for TUI rendering using ratatui's TestBackend.
// ABOUTME: Verifies the TUI renders the header, chat bubbles, notices, input, and status bar.

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use llama_chat::chat::Usage;
use llama_chat::error::ChatError;
use llama_chat::session::Turn;
use llama_chat::tui::state::{ChatEvent, TuiState};
use llama_chat::tui::ui;

/// Extract a single row of text from the terminal buffer as a String.
fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buf = terminal.backend().buffer();
    let width = buf.area.width;
    (0..width)
        .map(|x| {
            buf.cell((x, y))
                .map(|c| c.symbol().chars().next().unwrap_or(' '))
                .unwrap_or(' ')
        })
        .collect()
}

/// Extract all text from the terminal buffer as a single string (rows joined by newlines).
fn all_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let height = buf.area.height;
    (0..height)
        .map(|y| row_text(terminal, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn draw(state: &mut TuiState) -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, state)).unwrap();
    terminal
}

fn new_state() -> TuiState {
    TuiState::new("llama-3.1-8b-instant".to_string(), "chat_ui".to_string())
}

/// An empty state still shows the title, the intro line, the input
/// placeholder, and the model in the status bar.
#[test]
fn renders_empty_state() {
    let mut state = new_state();
    let terminal = draw(&mut state);

    let header = row_text(&terminal, 0);
    assert!(
        header.contains("LLAMA Chatbot"),
        "header should contain the title, got: {:?}",
        header,
    );
    let text = all_text(&terminal);
    assert!(text.contains("Ask me anything"));
    assert!(text.contains("Ask your question here..."));

    let status = row_text(&terminal, 23);
    assert!(
        status.contains("llama-3.1-8b-instant"),
        "status bar should show the model, got: {:?}",
        status,
    );
    assert!(status.contains("session chat_ui"));
}

/// A reply snapshot renders both the user and the assistant bubble.
#[test]
fn renders_transcript_after_reply() {
    let mut state = new_state();
    state.begin_send("hello".to_string());
    state.apply(ChatEvent::Reply {
        transcript: vec![Turn::user("hello"), Turn::assistant("hi there")],
        usage: Usage::default(),
    });

    let terminal = draw(&mut state);
    let text = all_text(&terminal);
    assert!(text.contains("❯"), "missing user prefix:\n{}", text);
    assert!(text.contains("hello"), "missing user bubble:\n{}", text);
    assert!(text.contains("hi there"), "missing assistant bubble:\n{}", text);
    assert!(!text.contains("thinking"));
}

/// While a reply is pending the sent line and a thinking marker are visible.
#[test]
fn renders_pending_line_while_waiting() {
    let mut state = new_state();
    state.begin_send("what is rust?".to_string());

    let terminal = draw(&mut state);
    let text = all_text(&terminal);
    assert!(text.contains("what is rust?"));
    assert!(text.contains("thinking"));
    assert!(text.contains("waiting for reply"));
}

/// A failed send shows the error notice and puts the text back in the input box.
#[test]
fn renders_error_notice_after_failure() {
    let mut state = new_state();
    state.begin_send("hello".to_string());
    state.apply(ChatEvent::Failed(ChatError::ServiceUnavailable(
        "request timed out".to_string(),
    )));

    let terminal = draw(&mut state);
    let text = all_text(&terminal);
    assert!(text.contains("Error"), "missing error notice:\n{}", text);
    assert!(text.contains("request timed out"));
    assert!(!text.contains('❯'), "failed line must not look sent:\n{}", text);
    assert!(!text.contains("Ask your question here..."));
}

/// Long transcripts stay scrolled to the bottom so the newest reply is visible.
#[test]
fn long_transcript_shows_latest_turn() {
    let mut state = new_state();
    let mut turns = Vec::new();
    for i in 0..20 {
        turns.push(Turn::user(format!("question {}", i)));
        turns.push(Turn::assistant(format!("answer {}", i)));
    }
    state.apply(ChatEvent::Reply {
        transcript: turns,
        usage: Usage::default(),
    });

    let terminal = draw(&mut state);
    let text = all_text(&terminal);
    assert!(text.contains("answer 19"));
    assert!(!text.contains("question 0 "));
}
