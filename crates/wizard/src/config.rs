//! Wizard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `PASARELA_DEBOUNCE_MS` - Debounce delay for input-driven async
//!   validation, in milliseconds (default: 500)
//! - `PASARELA_AUTOSAVE_SECS` - Periodic draft autosave interval, in seconds
//!   (default: 30)
//! - `PASARELA_POSTAL_LATENCY_MS` - Simulated postal lookup latency, in
//!   milliseconds (default: 500)
//! - `PASARELA_DISCOUNT_LATENCY_MS` - Simulated discount lookup latency, in
//!   milliseconds (default: 800)
//! - `PASARELA_DRAFT_PATH` - Path of the draft file
//!   (default: `checkout-draft.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::draft::DEFAULT_DRAFT_FILE;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Wizard timing and persistence configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Debounce delay for input-driven async validation.
    pub debounce: Duration,
    /// Periodic draft autosave interval.
    pub autosave_interval: Duration,
    /// Simulated postal lookup latency.
    pub postal_latency: Duration,
    /// Simulated discount lookup latency.
    pub discount_latency: Duration,
    /// Path of the draft file (used by the file-backed store).
    pub draft_path: PathBuf,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            autosave_interval: Duration::from_secs(30),
            postal_latency: Duration::from_millis(500),
            discount_latency: Duration::from_millis(800),
            draft_path: PathBuf::from(DEFAULT_DRAFT_FILE),
        }
    }
}

impl WizardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    /// Every variable has a default, so a bare environment works.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        Ok(Self {
            debounce: get_millis_or("PASARELA_DEBOUNCE_MS", defaults.debounce)?,
            autosave_interval: get_secs_or("PASARELA_AUTOSAVE_SECS", defaults.autosave_interval)?,
            postal_latency: get_millis_or("PASARELA_POSTAL_LATENCY_MS", defaults.postal_latency)?,
            discount_latency: get_millis_or(
                "PASARELA_DISCOUNT_LATENCY_MS",
                defaults.discount_latency,
            )?,
            draft_path: std::env::var("PASARELA_DRAFT_PATH")
                .map_or(defaults.draft_path, PathBuf::from),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional duration variable given in milliseconds.
fn get_millis_or(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    parse_duration(key, default, Duration::from_millis)
}

/// Parse an optional duration variable given in seconds.
fn get_secs_or(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    parse_duration(key, default, Duration::from_secs)
}

fn parse_duration(
    key: &str,
    default: Duration,
    to_duration: fn(u64) -> Duration,
) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(to_duration)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
