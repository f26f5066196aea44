//! Credential Resolution
//!
//! The Gemini API key is looked up once at start-up from configuration,
//! the environment, and finally the system keychain (Keyring).

use keyring::Entry;
use thiserror::Error;

const SERVICE_NAME: &str = "rpm-generator";

/// Keychain entry holding the Gemini API key.
pub const GEMINI_KEY_ENTRY: &str = "gemini_api_key";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keyring error: {0}")]
    KeyringError(#[from] keyring::Error),

    #[error("Credential not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CredentialError>;

/// Where the API key came from. Never carries the key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Config,
    Environment(&'static str),
    Keyring,
}

// ============================================================================
// Credential Manager
// ============================================================================

pub struct CredentialManager {
    service: String,
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialManager {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Retrieve a raw string secret
    pub fn get_secret(&self, key: &str) -> Result<String> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(value),
            Err(keyring::Error::NoEntry) => Err(CredentialError::NotFound(key.to_string())),
            Err(e) => Err(CredentialError::KeyringError(e)),
        }
    }
}

/// Resolve the API key: config value, then `GEMINI_API_KEY`, then `API_KEY`,
/// then the keychain. Blank values are skipped.
pub fn resolve_api_key(
    configured: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    keychain: impl FnOnce() -> Result<String>,
) -> Option<(String, KeySource)> {
    fn non_blank(value: &str) -> Option<String> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    if let Some(key) = configured.and_then(non_blank) {
        return Some((key, KeySource::Config));
    }

    for var in API_KEY_ENV_VARS {
        if let Some(key) = env(var).as_deref().and_then(non_blank) {
            return Some((key, KeySource::Environment(var)));
        }
    }

    match keychain() {
        Ok(value) => non_blank(&value).map(|key| (key, KeySource::Keyring)),
        Err(CredentialError::NotFound(_)) => None,
        Err(e) => {
            log::debug!("Keychain lookup failed: {e}");
            None
        }
    }
}

/// Resolve against the real process environment and system keychain.
pub fn resolve_api_key_from_system(configured: Option<&str>) -> Option<(String, KeySource)> {
    resolve_api_key(
        configured,
        |var| std::env::var(var).ok(),
        || CredentialManager::new().get_secret(GEMINI_KEY_ENTRY),
    )
}
