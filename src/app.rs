// ABOUTME: App orchestrator — wires together config, completion client, session store, worker, and TUI.
// ABOUTME: Sets up subsystems, runs the terminal loop, then shuts the worker down.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use tokio::sync::mpsc;
use tracing::info;

use crate::chat::{
    ChatWorkerParams, OpenAiCompatClient, Orchestrator, run_chat_worker, shutdown_chat_worker,
};
use crate::config::Config;
use crate::prompt::SystemPromptBuilder;
use crate::secret::ApiKey;
use crate::session::SessionStore;
use crate::tui::runner::run_tui;
use crate::tui::state::{ChatEvent, TuiState, UserEvent};

/// How long exit waits for the worker before abandoning an in-flight send.
const WORKER_SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    api_key: ApiKey,
}

impl App {
    /// Create a new app from loaded configuration and an already validated key.
    pub fn new(config: Config, api_key: ApiKey) -> Self {
        Self { config, api_key }
    }

    /// Run the application: set up subsystems, launch the chat worker, and drive the TUI.
    pub async fn run(self) -> anyhow::Result<()> {
        let session_start = Instant::now();
        let startup_notice = startup_message(&self.api_key);

        let client = OpenAiCompatClient::new(&self.config.llm, self.api_key)?;
        let store = Arc::new(SessionStore::new());
        let orchestrator = Arc::new(Orchestrator::new(
            store,
            Arc::new(client),
            self.config.llm.model.clone(),
        ));

        let system_instruction = SystemPromptBuilder::new()
            .load_file_override(&Config::config_dir())
            .with_config_override(self.config.chat.system_prompt.clone())
            .build();

        let session_id = self.config.chat.session_id.clone();
        info!(
            model = %self.config.llm.model,
            session_id = %session_id,
            base_url = %self.config.llm.base_url,
            "starting chat"
        );

        // Channels for worker <-> TUI communication.
        let (user_tx, user_rx) = mpsc::channel::<UserEvent>(16);
        let (chat_tx, chat_rx) = mpsc::channel::<ChatEvent>(16);

        let worker = tokio::spawn(run_chat_worker(
            ChatWorkerParams {
                orchestrator,
                session_id: session_id.clone(),
                system_instruction,
            },
            user_rx,
            chat_tx,
        ));

        let mut state = TuiState::new(self.config.llm.model.clone(), session_id);
        state.push_notice(startup_notice);

        let mut terminal = ratatui::init();
        let _ = crossterm::execute!(std::io::stdout(), EnableBracketedPaste);

        let result = run_tui(&mut terminal, state, user_tx.clone(), chat_rx).await;

        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        ratatui::restore();

        shutdown_chat_worker(user_tx, worker, WORKER_SHUTDOWN_GRACE).await;

        let state = result?;
        print_exit_screen(&state, session_start);
        info!("chat ended");
        Ok(())
    }
}

/// Notice confirming which key is in use without revealing it.
pub fn startup_message(api_key: &ApiKey) -> String {
    format!(
        "\u{2705} API key loaded successfully (ends with: ...{})",
        api_key.masked_suffix()
    )
}

/// Print a farewell summary after the TUI exits.
fn print_exit_screen(state: &TuiState, session_start: Instant) {
    let elapsed_secs = session_start.elapsed().as_secs();
    let elapsed = if elapsed_secs >= 3600 {
        format!("{}h {:02}m", elapsed_secs / 3600, (elapsed_secs % 3600) / 60)
    } else {
        format!("{}m {:02}s", elapsed_secs / 60, elapsed_secs % 60)
    };
    let exchanged = state.transcript.len();

    println!();
    println!("  \u{1f916} \x1b[1mLLAMA Chatbot\x1b[0m");
    println!("  Session lasted {elapsed} with {exchanged} messages exchanged.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_message_shows_only_suffix() {
        let key = ApiKey::validate("GROQ_API_KEY", Some("gsk_hidden_part_ABCD1234")).unwrap();
        let msg = startup_message(&key);
        assert!(msg.contains("...ABCD1234"));
        assert!(!msg.contains("hidden"));
    }
}
