// ABOUTME: Library root for llama-chat — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod secret;
pub mod session;
pub mod tui;
