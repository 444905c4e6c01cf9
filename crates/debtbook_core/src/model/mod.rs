//! Ledger domain model.
//!
//! # Responsibility
//! - Define the canonical debt record stored by the ledger.
//! - Provide input validation helpers shared by every adapter.
//!
//! # Invariants
//! - Every record is identified by a stable integer `DebtId`.
//! - Settlement is a one-way `unpaid -> paid` transition; records are never
//!   physically deleted.

pub mod amount;
pub mod debt;
