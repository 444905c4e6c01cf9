//! Debt record domain model.
//!
//! # Responsibility
//! - Define the canonical record for one counterparty debt.
//! - Provide lifecycle helpers for charge/payment/settle transitions.
//!
//! # Invariants
//! - `id` is unique within a ledger and never reused.
//! - `amount` only changes while `status == DebtStatus::Unpaid`.
//! - `date_paid` is set exactly when `status == DebtStatus::Paid`.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one ledger record.
pub type DebtId = u64;

/// Settlement state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    /// Still owed; amount may change.
    Unpaid,
    /// Settled; record is frozen.
    Paid,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

/// Record-level invariant violations.
#[derive(Debug, Clone, PartialEq)]
pub enum DebtValidationError {
    ZeroId,
    BlankPerson(DebtId),
    NonFiniteAmount(DebtId),
    PaidWithoutDate(DebtId),
    UnpaidWithDate(DebtId),
}

impl Display for DebtValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId => write!(f, "debt id must be >= 1"),
            Self::BlankPerson(id) => write!(f, "debt {id}: person cannot be blank"),
            Self::NonFiniteAmount(id) => write!(f, "debt {id}: amount must be finite"),
            Self::PaidWithoutDate(id) => write!(f, "debt {id}: paid record has no date_paid"),
            Self::UnpaidWithDate(id) => write!(f, "debt {id}: unpaid record has date_paid"),
        }
    }
}

impl Error for DebtValidationError {}

/// One ledger entry tied to a counterparty.
///
/// Field names match the persisted JSON keys one-to-one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRecord {
    pub id: DebtId,
    /// Counterparty name with original casing.
    pub person: String,
    /// Signed balance; payments may push it below zero.
    pub amount: f64,
    /// Free text, extended with `" | Payment: $X"` / `" | Additional: $X"`.
    #[serde(default)]
    pub description: String,
    /// Local wall-clock creation time. Never changes.
    pub date_added: NaiveDateTime,
    pub status: DebtStatus,
    /// Omitted from the wire form while unpaid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_paid: Option<NaiveDateTime>,
}

impl DebtRecord {
    /// Creates a new unpaid record stamped with the current local time.
    pub fn new(
        id: DebtId,
        person: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            person: person.into(),
            amount,
            description: description.into(),
            date_added: now(),
            status: DebtStatus::Unpaid,
            date_paid: None,
        }
    }

    pub fn is_unpaid(&self) -> bool {
        self.status == DebtStatus::Unpaid
    }

    /// Case-insensitive counterparty match. Whitespace is significant:
    /// `"Sarah "` does not match `"sarah"`.
    pub fn matches_person(&self, person: &str) -> bool {
        normalize_person(&self.person) == normalize_person(person)
    }

    /// Adds `delta` to the balance and records the addition in the description.
    pub fn apply_charge(&mut self, delta: f64) {
        debug_assert!(self.is_unpaid());
        self.amount += delta;
        self.description
            .push_str(&format!(" | Additional: ${}", format_delta(delta)));
    }

    /// Subtracts `delta` from the balance and records the payment in the
    /// description. No lower bound is enforced.
    pub fn apply_payment(&mut self, delta: f64) {
        debug_assert!(self.is_unpaid());
        self.amount -= delta;
        self.description
            .push_str(&format!(" | Payment: ${}", format_delta(delta)));
    }

    /// Freezes the record as paid at `paid_at`.
    pub fn settle(&mut self, paid_at: NaiveDateTime) {
        self.status = DebtStatus::Paid;
        self.date_paid = Some(paid_at);
    }

    /// Validates invariants visible on a single record.
    pub fn validate(&self) -> Result<(), DebtValidationError> {
        if self.id == 0 {
            return Err(DebtValidationError::ZeroId);
        }
        if self.person.trim().is_empty() {
            return Err(DebtValidationError::BlankPerson(self.id));
        }
        if !self.amount.is_finite() {
            return Err(DebtValidationError::NonFiniteAmount(self.id));
        }
        match (self.status, self.date_paid) {
            (DebtStatus::Paid, None) => Err(DebtValidationError::PaidWithoutDate(self.id)),
            (DebtStatus::Unpaid, Some(_)) => Err(DebtValidationError::UnpaidWithDate(self.id)),
            _ => Ok(()),
        }
    }
}

/// Current local wall-clock time at microsecond precision, the timestamp
/// base for every record.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

pub(crate) fn normalize_person(person: &str) -> String {
    person.to_lowercase()
}

/// Float repr used in annotations and messages: `500.0`, `12.5`, `-20.0`.
///
/// Keeps notes appended to files carried over from the previous tracker in
/// one style.
pub(crate) fn format_delta(delta: f64) -> String {
    format!("{delta:?}")
}

#[cfg(test)]
mod tests {
    use super::{format_delta, DebtRecord, DebtStatus, DebtValidationError};

    #[test]
    fn matches_person_ignores_case_only() {
        let record = DebtRecord::new(1, "Sarah", 10.0, "");
        assert!(record.matches_person("sarah"));
        assert!(record.matches_person("SARAH"));
        assert!(!record.matches_person("Sara"));

        let padded = DebtRecord::new(2, "Sarah ", 10.0, "");
        assert!(!padded.matches_person("sarah"));
        assert!(padded.matches_person("SARAH "));
    }

    #[test]
    fn format_delta_keeps_decimal_point() {
        assert_eq!(format_delta(500.0), "500.0");
        assert_eq!(format_delta(12.5), "12.5");
        assert_eq!(format_delta(-20.0), "-20.0");
    }

    #[test]
    fn validate_rejects_status_date_mismatch() {
        let mut record = DebtRecord::new(3, "Omar", 1.0, "");
        record.status = DebtStatus::Paid;
        assert_eq!(
            record.validate().unwrap_err(),
            DebtValidationError::PaidWithoutDate(3)
        );
    }
}
