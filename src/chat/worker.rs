// ABOUTME: Chat worker — background task that runs sends off the UI loop.
// ABOUTME: Receives UserEvents from the TUI and answers with ChatEvents when each call completes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::chat::orchestrator::Orchestrator;
use crate::tui::state::{ChatEvent, UserEvent};

/// Bundled parameters for the chat worker.
pub struct ChatWorkerParams {
    pub orchestrator: Arc<Orchestrator>,
    pub session_id: String,
    pub system_instruction: String,
}

/// Process user events until Quit or until the TUI drops its sender.
///
/// Events are handled one at a time, so at most one completion call is in
/// flight for the session.
pub async fn run_chat_worker(
    params: ChatWorkerParams,
    mut user_rx: mpsc::Receiver<UserEvent>,
    chat_tx: mpsc::Sender<ChatEvent>,
) {
    let ChatWorkerParams {
        orchestrator,
        session_id,
        system_instruction,
    } = params;

    while let Some(event) = user_rx.recv().await {
        match event {
            UserEvent::Quit => break,
            UserEvent::Message(text) => {
                let _ = chat_tx.send(ChatEvent::Thinking).await;
                let outcome = orchestrator
                    .send(&session_id, &system_instruction, &text)
                    .await;
                let reply = match outcome {
                    Ok(reply) => {
                        let handle = orchestrator.store().get_or_create(&session_id);
                        let transcript = handle.lock().await.visible_turns();
                        ChatEvent::Reply {
                            transcript,
                            usage: reply.usage,
                        }
                    }
                    Err(err) => ChatEvent::Failed(err),
                };
                if chat_tx.send(reply).await.is_err() {
                    debug!("UI channel closed, stopping chat worker");
                    break;
                }
            }
            UserEvent::Clear => {
                orchestrator.store().clear(&session_id).await;
                let _ = chat_tx.send(ChatEvent::Cleared).await;
            }
        }
    }

    info!(session_id = %session_id, "chat worker stopped");
}

/// Ask the worker to quit and wait up to `grace` for it.
///
/// A send still in flight only sees Quit after its HTTP call returns, so the
/// worker is aborted once `grace` runs out. Dropping the send commits nothing.
pub async fn shutdown_chat_worker(
    user_tx: mpsc::Sender<UserEvent>,
    mut worker: JoinHandle<()>,
    grace: Duration,
) {
    let _ = user_tx.try_send(UserEvent::Quit);
    drop(user_tx);

    if tokio::time::timeout(grace, &mut worker).await.is_err() {
        warn!("chat worker still busy at exit, aborting in-flight send");
        worker.abort();
        let _ = worker.await;
    }
}
