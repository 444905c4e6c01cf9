//! Structured operation results and report shapes.
//!
//! # Responsibility
//! - Carry success/not-found/error signaling separately from display text.
//! - Provide serializable report shapes for adapters to render.
//!
//! # Invariants
//! - `record_id` is set for `Created` and `Updated`, never for `NotFound`.

use crate::model::debt::DebtId;
use serde::Serialize;

/// Result category of one ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// A new record was appended.
    Created,
    /// An existing record was changed (charge, payment or settlement).
    Updated,
    /// No unpaid record matched; nothing changed.
    NotFound,
    /// Input was rejected; nothing changed.
    Error,
}

/// Structured result returned by every mutating ledger operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<DebtId>,
    /// Human-readable summary; adapters may use or replace it.
    pub message: String,
}

impl Outcome {
    pub fn created(record_id: DebtId, message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Created,
            record_id: Some(record_id),
            message: message.into(),
        }
    }

    pub fn updated(record_id: DebtId, message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Updated,
            record_id: Some(record_id),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::NotFound,
            record_id: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Error,
            record_id: None,
            message: message.into(),
        }
    }

    /// Whether the ledger changed.
    pub fn is_success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Created | OutcomeKind::Updated)
    }
}

/// Unpaid total for one counterparty spelling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonBalance {
    pub person: String,
    pub amount: f64,
}

/// Aggregate ledger report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub record_count: usize,
    pub total_unpaid: f64,
    pub total_paid: f64,
    /// Grouped by exact `person` string, in first-seen order.
    pub unpaid_by_person: Vec<PersonBalance>,
}

impl LedgerSummary {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}
