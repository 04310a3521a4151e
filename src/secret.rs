// ABOUTME: API key loading and validation — presence and minimum-length checks.
// ABOUTME: Reads the key from the environment after .env has been loaded by dotenvy.

use std::fmt;

use crate::error::StartupError;

/// Keys shorter than this are rejected as obviously malformed.
pub const MIN_API_KEY_LEN: usize = 10;

/// Number of trailing characters shown when confirming which key was loaded.
const VISIBLE_SUFFIX_LEN: usize = 8;

/// A validated API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate a raw value as supplied by the environment.
    ///
    /// Absent or blank values are `MissingSecret`; anything shorter than
    /// [`MIN_API_KEY_LEN`] characters is `InvalidSecret`.
    pub fn validate(var: &str, raw: Option<&str>) -> Result<Self, StartupError> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(StartupError::MissingSecret {
                var: var.to_string(),
            });
        }
        let len = value.chars().count();
        if len < MIN_API_KEY_LEN {
            return Err(StartupError::InvalidSecret {
                var: var.to_string(),
                len,
                min: MIN_API_KEY_LEN,
            });
        }
        Ok(Self(value.to_string()))
    }

    /// Read and validate the key from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, StartupError> {
        let raw = std::env::var(var).ok();
        Self::validate(var, raw.as_deref())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The last few characters of the key, for the startup confirmation notice.
    pub fn masked_suffix(&self) -> String {
        let count = self.0.chars().count();
        let skip = count.saturating_sub(VISIBLE_SUFFIX_LEN);
        self.0.chars().skip(skip).collect()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(...{})", self.masked_suffix())
    }
}
