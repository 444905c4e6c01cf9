//! Input validation for adapter-supplied amounts and counterparties.
//!
//! # Responsibility
//! - Turn free-text amount input (`"500"`, `"$12.50"`, `"20 MAD"`) into a
//!   finite number before it reaches the ledger.
//! - Reject blank counterparty names.
//!
//! # Invariants
//! - Currency symbols and codes are stripped, never converted.
//! - Every accepted amount is finite.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<sign>[-+])?\s*\$?\s*(?P<num>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)\s*(?:\$|[A-Za-z]{1,4})?\s*$",
    )
    .expect("valid amount regex")
});

/// Malformed caller input rejected before any ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Counterparty name is empty or whitespace.
    EmptyPerson,
    /// Amount text is not a number.
    NonNumericAmount(String),
    /// Amount is NaN or infinite.
    NonFiniteAmount,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPerson => write!(f, "person cannot be empty"),
            Self::NonNumericAmount(value) => write!(f, "amount is not a number: `{value}`"),
            Self::NonFiniteAmount => write!(f, "amount must be a finite number"),
        }
    }
}

impl Error for ValidationError {}

/// Parses free-text amount input.
///
/// Accepts an optional sign, an optional `$` prefix, thousands separators and
/// a trailing currency code of up to four letters.
///
/// # Errors
/// - `NonNumericAmount` when the text does not look like a number.
/// - `NonFiniteAmount` when the number overflows `f64`.
pub fn parse_amount(text: &str) -> Result<f64, ValidationError> {
    let captures = AMOUNT_RE
        .captures(text)
        .ok_or_else(|| ValidationError::NonNumericAmount(text.trim().to_string()))?;

    let digits = captures["num"].replace(',', "");
    let magnitude: f64 = digits
        .parse()
        .map_err(|_| ValidationError::NonNumericAmount(text.trim().to_string()))?;
    let value = match captures.name("sign").map(|sign| sign.as_str()) {
        Some("-") => -magnitude,
        _ => magnitude,
    };

    validate_amount(value)
}

/// Checks that an already-numeric amount is usable by the ledger.
pub fn validate_amount(value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFiniteAmount)
    }
}

/// Trims a counterparty name and rejects blank input.
pub fn validate_person(person: &str) -> Result<&str, ValidationError> {
    let trimmed = person.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPerson);
    }
    Ok(trimmed)
}
