// ABOUTME: System instruction resolution — compiled-in default with config and file overrides.
// ABOUTME: The resolved text is sent as the first message of every completion request.

use std::fs;
use std::path::{Path, PathBuf};

/// Compiled-in default instruction.
const DEFAULT_SYSTEM: &str = include_str!("prompts/system.md");

/// Reads a file if it exists, returning None otherwise.
pub fn read_if_exists(path: PathBuf) -> Option<String> {
    if path.exists() {
        fs::read_to_string(&path).ok()
    } else {
        None
    }
}

/// Resolves the system instruction. Precedence, highest first: an explicit
/// `system_prompt` from config, a `system.md` in the config directory, then
/// the compiled-in default. Blank candidates are skipped.
#[derive(Debug, Clone)]
pub struct SystemPromptBuilder {
    pub default: String,
    pub file_override: Option<String>,
    pub config_override: Option<String>,
}

impl SystemPromptBuilder {
    /// Creates a new builder loaded with the compiled-in default.
    pub fn new() -> Self {
        Self {
            default: DEFAULT_SYSTEM.trim().to_string(),
            file_override: None,
            config_override: None,
        }
    }

    /// Checks `<config_dir>/system.md` and records it as the file override.
    pub fn load_file_override(&mut self, config_dir: &Path) -> &mut Self {
        self.file_override = read_if_exists(config_dir.join("system.md"));
        self
    }

    pub fn with_config_override(&mut self, prompt: Option<String>) -> &mut Self {
        self.config_override = prompt;
        self
    }

    /// Returns the highest-precedence non-blank instruction.
    pub fn build(&self) -> String {
        [
            self.config_override.as_deref(),
            self.file_override.as_deref(),
            Some(self.default.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
    }
}

impl Default for SystemPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
