//! Ledger engine configuration management.

use serde::Deserialize;
use std::time::Duration;

/// Ledger engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Account lock acquisition settings.
    #[serde(default)]
    pub locking: LockingConfig,
    /// Retry policy for retryable commit failures.
    #[serde(default)]
    pub retry: RetryConfig,
    /// History query settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Account lock acquisition settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LockingConfig {
    /// Budget for acquiring a single account lock, in milliseconds.
    /// Exhausting it surfaces a retryable lock conflict.
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,
}

fn default_wait_ms() -> u64 {
    5_000
}

impl Default for LockingConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_wait_ms(),
        }
    }
}

impl LockingConfig {
    /// The lock wait budget as a `Duration`.
    #[must_use]
    pub const fn wait_budget(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

/// Retry policy for retryable commit failures.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts for one intent (first try included).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

/// History query settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Page size used when a history filter does not set one.
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
}

fn default_per_page() -> u32 {
    20
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PASSBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
