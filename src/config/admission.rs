//! Admission and store configuration structures.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StoreBackendConfig {
    /// In-memory store for development/testing.
    InMemory,
    /// Append-only JSON lines journal.
    Journal {
        /// Directory holding the journal.
        path: PathBuf,
        /// Subdirectory of `path` holding one journal file per event.
        #[serde(default = "default_stream")]
        stream: String,
    },
}

fn default_stream() -> String {
    "reservations".into()
}

/// Admission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Reservation store backend.
    pub store: StoreBackendConfig,
    /// Upper bound on each registry lookup, in milliseconds.
    pub lookup_timeout_ms: u64,
    /// Audit records kept in memory. Zero disables the in-memory audit buffer.
    #[serde(default)]
    pub audit_capacity: usize,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            store: StoreBackendConfig::InMemory,
            lookup_timeout_ms: 5_000,
            audit_capacity: 0,
        }
    }
}

impl AdmissionConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.lookup_timeout_ms == 0 {
            return Err("lookup_timeout_ms must be greater than 0".into());
        }
        if let StoreBackendConfig::Journal { path, stream } = &self.store {
            if path.as_os_str().is_empty() {
                return Err("journal path must not be empty".into());
            }
            if stream.is_empty() {
                return Err("journal stream must not be empty".into());
            }
        }
        Ok(())
    }

    /// Registry lookup bound as a [`Duration`].
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the process environment, loading `.env` first.
    ///
    /// Recognized variables: `RESERVATION_STORE` (`in_memory` or `journal`),
    /// `RESERVATION_JOURNAL_PATH`, `RESERVATION_JOURNAL_STREAM`,
    /// `RESERVATION_LOOKUP_TIMEOUT_MS`, `RESERVATION_AUDIT_CAPACITY`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut cfg = Self::default();

        match lookup("RESERVATION_STORE").as_deref() {
            None | Some("in_memory") => {}
            Some("journal") => {
                let path = lookup("RESERVATION_JOURNAL_PATH")
                    .context("RESERVATION_JOURNAL_PATH is required for the journal store")?;
                cfg.store = StoreBackendConfig::Journal {
                    path: PathBuf::from(path),
                    stream: lookup("RESERVATION_JOURNAL_STREAM").unwrap_or_else(default_stream),
                };
            }
            Some(other) => anyhow::bail!("unknown RESERVATION_STORE `{other}`"),
        }

        if let Some(raw) = lookup("RESERVATION_LOOKUP_TIMEOUT_MS") {
            cfg.lookup_timeout_ms = raw
                .parse()
                .with_context(|| format!("invalid RESERVATION_LOOKUP_TIMEOUT_MS `{raw}`"))?;
        }
        if let Some(raw) = lookup("RESERVATION_AUDIT_CAPACITY") {
            cfg.audit_capacity = raw
                .parse()
                .with_context(|| format!("invalid RESERVATION_AUDIT_CAPACITY `{raw}`"))?;
        }

        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
