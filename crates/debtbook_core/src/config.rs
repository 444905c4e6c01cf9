//! Ledger location configuration.
//!
//! # Responsibility
//! - Resolve the persisted ledger path once, from one precedence chain.
//! - Open the file-backed store at that path.
//!
//! # Invariants
//! - Precedence: explicit value, then `DEBTBOOK_LEDGER_PATH`, then
//!   `debts.json` in the working directory.
//! - Blank values are treated as unset.

use crate::repo::ledger_repo::JsonFileLedgerRepository;
use crate::service::ledger_store::{LedgerResult, LedgerStore};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no explicit path is supplied.
pub const LEDGER_PATH_ENV: &str = "DEBTBOOK_LEDGER_PATH";
/// File name used when nothing else is configured.
pub const DEFAULT_LEDGER_FILE: &str = "debts.json";

/// Resolved ledger settings shared by every adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    ledger_path: PathBuf,
}

impl LedgerConfig {
    /// Uses `path` verbatim.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            ledger_path: path.into(),
        }
    }

    /// Resolves from an optional explicit path and the process environment.
    pub fn resolve(explicit: Option<&str>) -> Self {
        let from_env = std::env::var(LEDGER_PATH_ENV).ok();
        Self::resolve_with(explicit, from_env.as_deref())
    }

    /// Resolves from explicit values only; no environment access.
    pub fn resolve_with(explicit: Option<&str>, from_env: Option<&str>) -> Self {
        let path = [explicit, from_env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_LEDGER_FILE);
        Self::new(path)
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Opens the file-backed store for this configuration.
    ///
    /// # Errors
    /// - `LedgerError::Load` when the existing file is unreadable or invalid.
    pub fn open_store(&self) -> LedgerResult<LedgerStore<JsonFileLedgerRepository>> {
        LedgerStore::open(JsonFileLedgerRepository::new(self.ledger_path.clone()))
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_FILE)
    }
}
