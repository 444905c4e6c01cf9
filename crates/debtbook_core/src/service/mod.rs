//! Core use-case services.
//!
//! # Responsibility
//! - Enforce ledger rules over repository-backed storage.
//! - Return structured outcomes so adapters never parse display strings.

pub mod ledger_store;
pub mod outcome;
