//! Ledger repository contracts, JSON codec and file/in-memory backends.
//!
//! # Responsibility
//! - Persist the whole record collection as one ordered JSON array.
//! - Keep codec and file-system details inside the core persistence boundary.
//!
//! # Invariants
//! - `save` replaces the full collection atomically; there are no partial
//!   or incremental writes.
//! - Read paths reject invalid persisted state instead of masking it.
//! - A missing file is an empty ledger; an unreadable one is an error.

use crate::model::debt::{DebtId, DebtRecord, DebtValidationError};
use crate::repo::atomic_write::atomic_write;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for ledger load/save operations.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Codec(serde_json::Error),
    Validation(DebtValidationError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "ledger file `{}`: {source}", path.display()),
            Self::Codec(err) => write!(f, "ledger codec error: {err}"),
            Self::Validation(err) => write!(f, "invalid persisted debt: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted ledger data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

impl From<DebtValidationError> for RepoError {
    fn from(value: DebtValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Storage contract for the full ledger collection.
pub trait LedgerRepository {
    /// Loads every record in storage order.
    fn load(&self) -> RepoResult<Vec<DebtRecord>>;
    /// Replaces the stored collection with `records`.
    fn save(&self, records: &[DebtRecord]) -> RepoResult<()>;
    /// Short location label for diagnostics (`file`, `memory`).
    fn mode(&self) -> &'static str;
}

/// Encodes records as a pretty-printed JSON array (two-space indent).
pub fn encode_records(records: &[DebtRecord]) -> RepoResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(records)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes and validates a JSON array of records.
///
/// # Errors
/// - `Codec` when the payload is not a JSON array of record objects.
/// - `Validation` when one record breaks a record-level invariant.
/// - `InvalidData` when two records share an id.
pub fn decode_records(bytes: &[u8]) -> RepoResult<Vec<DebtRecord>> {
    let records: Vec<DebtRecord> = serde_json::from_slice(bytes)?;
    validate_collection(&records)?;
    Ok(records)
}

/// Checks per-record invariants plus id uniqueness across the collection.
pub fn validate_collection(records: &[DebtRecord]) -> RepoResult<()> {
    let mut seen: HashSet<DebtId> = HashSet::with_capacity(records.len());
    for record in records {
        record.validate()?;
        if !seen.insert(record.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate debt id {}",
                record.id
            )));
        }
    }
    Ok(())
}

/// JSON-file-backed ledger repository.
#[derive(Debug, Clone)]
pub struct JsonFileLedgerRepository {
    path: PathBuf,
}

impl JsonFileLedgerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl LedgerRepository for JsonFileLedgerRepository {
    fn load(&self) -> RepoResult<Vec<DebtRecord>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        decode_records(&bytes)
    }

    fn save(&self, records: &[DebtRecord]) -> RepoResult<()> {
        let bytes = encode_records(records)?;
        atomic_write(&self.path, &bytes).map_err(|err| self.io_error(err))
    }

    fn mode(&self) -> &'static str {
        "file"
    }
}

/// Process-local repository, used for scratch ledgers and tests.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    records: Mutex<Vec<DebtRecord>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository, e.g. to simulate externally edited data.
    pub fn with_records(records: Vec<DebtRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Returns what was last saved.
    pub fn stored(&self) -> Vec<DebtRecord> {
        self.records.lock().clone()
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    fn load(&self) -> RepoResult<Vec<DebtRecord>> {
        let records = self.records.lock().clone();
        validate_collection(&records)?;
        Ok(records)
    }

    fn save(&self, records: &[DebtRecord]) -> RepoResult<()> {
        *self.records.lock() = records.to_vec();
        Ok(())
    }

    fn mode(&self) -> &'static str {
        "memory"
    }
}

impl<R: LedgerRepository + ?Sized> LedgerRepository for &R {
    fn load(&self) -> RepoResult<Vec<DebtRecord>> {
        (**self).load()
    }

    fn save(&self, records: &[DebtRecord]) -> RepoResult<()> {
        (**self).save(records)
    }

    fn mode(&self) -> &'static str {
        (**self).mode()
    }
}
