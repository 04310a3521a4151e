// ABOUTME: Terminal event loop — redraws, reads crossterm events, and applies chat worker events.
// ABOUTME: Key handling never blocks on the network; replies arrive through the worker channel.

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::ChatError;
use crate::tui::input::{InputResult, handle_key};
use crate::tui::state::{ChatEvent, TuiState, UserEvent};
use crate::tui::ui;

/// What the loop should do after a key was handled.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Forward(UserEvent),
    Quit,
}

/// Turn an input result into a state change plus an optional event for the worker.
pub fn dispatch(state: &mut TuiState, result: InputResult) -> Flow {
    match result {
        InputResult::None => Flow::Continue,
        InputResult::Send(text) => {
            state.begin_send(text.clone());
            Flow::Forward(UserEvent::Message(text))
        }
        InputResult::Clear => Flow::Forward(UserEvent::Clear),
        InputResult::Quit => Flow::Quit,
    }
}

/// Drive the TUI until the user quits. Returns the final state for the exit summary.
pub async fn run_tui(
    terminal: &mut DefaultTerminal,
    mut state: TuiState,
    user_tx: mpsc::Sender<UserEvent>,
    mut chat_rx: mpsc::Receiver<ChatEvent>,
) -> anyhow::Result<TuiState> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, &mut state))?;

        tokio::select! {
            maybe_event = events.next() => {
                let flow = match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        let result = handle_key(&mut state, key);
                        dispatch(&mut state, result)
                    }
                    Some(Ok(Event::Paste(text))) => {
                        state.insert_str_at_cursor(&text);
                        Flow::Continue
                    }
                    // Resize and focus changes only need a redraw.
                    Some(Ok(_)) => Flow::Continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => Flow::Quit,
                };

                match flow {
                    Flow::Continue => {}
                    Flow::Quit => break,
                    Flow::Forward(event) => {
                        if user_tx.send(event).await.is_err() {
                            warn!("chat worker is gone");
                            state.apply(ChatEvent::Failed(ChatError::ServiceUnavailable(
                                "chat worker stopped".to_string(),
                            )));
                        }
                    }
                }
            }
            Some(event) = chat_rx.recv() => {
                state.apply(event);
            }
        }
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TuiState {
        TuiState::new("m".to_string(), "chat_ui".to_string())
    }

    #[test]
    fn send_marks_pending_and_forwards() {
        let mut state = state();
        let flow = dispatch(&mut state, InputResult::Send("hello".to_string()));
        assert_eq!(flow, Flow::Forward(UserEvent::Message("hello".to_string())));
        assert_eq!(state.pending.as_deref(), Some("hello"));
        assert!(state.waiting);
    }

    #[test]
    fn clear_and_quit() {
        let mut state = state();
        assert_eq!(
            dispatch(&mut state, InputResult::Clear),
            Flow::Forward(UserEvent::Clear)
        );
        assert_eq!(dispatch(&mut state, InputResult::Quit), Flow::Quit);
        assert_eq!(dispatch(&mut state, InputResult::None), Flow::Continue);
    }
}
