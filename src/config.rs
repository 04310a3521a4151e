// ABOUTME: Configuration loading for llama-chat.
// ABOUTME: Reads <config_dir>/llama-chat/config.toml and applies CLI overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

/// Completion service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            max_tokens: None,
            temperature: None,
            timeout_seconds: 60,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub session_id: String,
    /// Replaces the compiled-in system instruction when set.
    pub system_prompt: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            session_id: "chat_ui".to_string(),
            system_prompt: None,
        }
    }
}

/// Log output settings. File logging is off unless `dir` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides on top of the loaded values.
    pub fn apply(&mut self, overrides: Overrides) -> anyhow::Result<()> {
        if let Some(model) = overrides.model {
            self.llm.model = model;
        }
        if let Some(session_id) = overrides.session_id {
            self.chat.session_id = session_id;
        }
        if let Some(dir) = overrides.log_dir {
            self.logging.dir = Some(dir);
        }
        self.validate()
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.chat.session_id.trim().is_empty() {
            anyhow::bail!("chat.session_id must not be empty");
        }
        if self.llm.model.trim().is_empty() {
            anyhow::bail!("llm.model must not be empty");
        }
        if self.llm.timeout_seconds == 0 {
            anyhow::bail!("llm.timeout_seconds must be greater than zero");
        }
        Ok(())
    }

    /// Directory holding config.toml and the optional system.md override.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("llama-chat")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
