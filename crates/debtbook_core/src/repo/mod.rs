//! Repository layer: ledger persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the whole-collection load/save contract used by the store.
//! - Isolate JSON codec and file replacement details from store logic.
//!
//! # Invariants
//! - Repository reads validate every record before handing it out.
//! - Repository writes are all-or-nothing at the file level.

pub mod atomic_write;
pub mod ledger_repo;
