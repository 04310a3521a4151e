// ABOUTME: Chat module — completion service boundary, orchestrator, and background worker.
// ABOUTME: The worker bridges the TUI's event channel to Orchestrator::send.

pub mod completion;
pub mod orchestrator;
pub mod worker;

pub use completion::{
    Completion, CompletionRequest, CompletionService, OpenAiCompatClient, Usage,
};
pub use orchestrator::{AssistantReply, Orchestrator};
pub use worker::{ChatWorkerParams, run_chat_worker, shutdown_chat_worker};
