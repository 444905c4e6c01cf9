//! Core ledger engine for Debtbook.
//! This crate is the single source of truth for ledger invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{LedgerConfig, DEFAULT_LEDGER_FILE, LEDGER_PATH_ENV};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::amount::{parse_amount, validate_amount, validate_person, ValidationError};
pub use model::debt::{DebtId, DebtRecord, DebtStatus, DebtValidationError};
pub use repo::ledger_repo::{
    decode_records, encode_records, InMemoryLedgerRepository, JsonFileLedgerRepository,
    LedgerRepository, RepoError, RepoResult,
};
pub use service::ledger_store::{LedgerError, LedgerResult, LedgerStore, SettleTarget};
pub use service::outcome::{LedgerSummary, Outcome, OutcomeKind, PersonBalance};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
