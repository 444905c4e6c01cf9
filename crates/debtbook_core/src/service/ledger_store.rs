//! Ledger store: the single owner of all debt records.
//!
//! # Responsibility
//! - Apply charge/payment/settle rules to the in-memory collection.
//! - Mirror the full collection to the repository after every mutation.
//! - Answer aggregate queries from a consistent snapshot.
//!
//! # Invariants
//! - Person matching is case-insensitive and picks the first unpaid record in
//!   insertion order.
//! - A mutation is committed in memory only after the repository write
//!   succeeds; a failed write leaves the store unchanged.
//! - Writers hold the lock for the whole mutate-persist-commit cycle; readers
//!   share it and never observe a half-applied mutation.
//! - Ids are never reused.

use crate::model::amount::{validate_amount, validate_person};
use crate::model::debt::{format_delta, normalize_person, now, DebtId, DebtRecord};
use crate::repo::ledger_repo::{LedgerRepository, RepoError};
use crate::service::outcome::{LedgerSummary, Outcome, OutcomeKind, PersonBalance};
use log::{error, info, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Persistence failures surfaced by the store.
#[derive(Debug)]
pub enum LedgerError {
    /// The persisted ledger could not be read at startup. Fatal.
    Load(RepoError),
    /// A mutation could not be written; it was not committed.
    Persist(RepoError),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load ledger: {err}"),
            Self::Persist(err) => write!(f, "failed to persist ledger: {err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) | Self::Persist(err) => Some(err),
        }
    }
}

/// Which record a settle call should close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleTarget {
    /// Exact record id; never falls back to person matching.
    Id(DebtId),
    /// First unpaid record for this counterparty.
    Person(String),
}

impl SettleTarget {
    /// Builds a target from optional caller arguments.
    ///
    /// A supplied id always wins, including `0`. Returns `None` when neither
    /// an id nor a non-blank person is given.
    pub fn from_parts(person: Option<&str>, debt_id: Option<DebtId>) -> Option<Self> {
        if let Some(id) = debt_id {
            return Some(Self::Id(id));
        }
        person
            .map(str::trim)
            .filter(|person| !person.is_empty())
            .map(|person| Self::Person(person.to_string()))
    }
}

/// Ledger engine over a repository implementation.
pub struct LedgerStore<R: LedgerRepository> {
    repo: R,
    records: RwLock<Vec<DebtRecord>>,
}

impl<R: LedgerRepository> LedgerStore<R> {
    /// Loads the persisted ledger.
    ///
    /// # Errors
    /// - `LedgerError::Load` when the repository cannot read or validate the
    ///   stored collection. A missing file is not an error.
    pub fn open(repo: R) -> LedgerResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=ledger_open module=ledger status=start mode={}",
            repo.mode()
        );

        let records = match repo.load() {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=ledger_open module=ledger status=error mode={} duration_ms={} error_code=ledger_load_failed error={}",
                    repo.mode(),
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(LedgerError::Load(err));
            }
        };

        let duplicates = count_people_with_multiple_unpaid(&records);
        if duplicates > 0 {
            warn!(
                "event=ledger_open module=ledger status=warn mode={} people_with_multiple_unpaid={}",
                repo.mode(),
                duplicates
            );
        }
        info!(
            "event=ledger_open module=ledger status=ok mode={} records={} duration_ms={}",
            repo.mode(),
            records.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            repo,
            records: RwLock::new(records),
        })
    }

    /// Adds to the first unpaid record for `person`, or creates a new one.
    ///
    /// # Contract
    /// - Existing record: `amount += amount`, description gets
    ///   `" | Additional: $<amount>"`, `description` argument is not used.
    /// - No match: new unpaid record with the next id.
    /// - Blank person or non-finite amount: `Error` outcome, no mutation.
    pub fn record_charge(
        &self,
        person: &str,
        amount: f64,
        description: &str,
    ) -> LedgerResult<Outcome> {
        let (person, amount) = match validate_input(person, amount) {
            Ok(input) => input,
            Err(outcome) => return Ok(outcome),
        };

        self.mutate("debt_charge", |records| {
            let shown = format_delta(amount);
            if let Some(record) = first_unpaid_for(records, person) {
                record.apply_charge(amount);
                return Outcome::updated(
                    record.id,
                    format!("Added ${shown} to {person}'s existing debt"),
                );
            }

            let Some(id) = next_id(records) else {
                return Outcome::error("No debt ids left to assign");
            };
            records.push(DebtRecord::new(id, person, amount, description));
            Outcome::created(id, format!("Added debt: ${shown} to {person}"))
        })
    }

    /// Subtracts a repayment from the first unpaid record for `person`.
    ///
    /// # Contract
    /// - No lower bound: the balance may go negative.
    /// - No match: `NotFound`, no write.
    pub fn record_payment(&self, person: &str, amount: f64) -> LedgerResult<Outcome> {
        let (person, amount) = match validate_input(person, amount) {
            Ok(input) => input,
            Err(outcome) => return Ok(outcome),
        };

        self.mutate("debt_payment", |records| {
            match first_unpaid_for(records, person) {
                Some(record) => {
                    record.apply_payment(amount);
                    Outcome::updated(
                        record.id,
                        format!("Subtracted ${} from {person}'s debt", format_delta(amount)),
                    )
                }
                None => Outcome::not_found(format!("No unpaid debt found for {person}")),
            }
        })
    }

    /// Marks one unpaid record as paid and stamps `date_paid`.
    ///
    /// Settling an already-paid or unknown record is `NotFound`.
    pub fn settle(&self, target: &SettleTarget) -> LedgerResult<Outcome> {
        self.mutate("debt_settle", |records| {
            let paid_at = now();
            match target {
                SettleTarget::Id(id) => {
                    match records
                        .iter_mut()
                        .find(|record| record.id == *id && record.is_unpaid())
                    {
                        Some(record) => {
                            record.settle(paid_at);
                            Outcome::updated(*id, format!("Marked debt ID {id} as paid"))
                        }
                        None => Outcome::not_found("Debt not found or already paid"),
                    }
                }
                SettleTarget::Person(person) => match first_unpaid_for(records, person) {
                    Some(record) => {
                        record.settle(paid_at);
                        Outcome::updated(record.id, format!("Marked debt to {person} as paid"))
                    }
                    None => Outcome::not_found("Debt not found or already paid"),
                },
            }
        })
    }

    /// Primitive-argument form of [`settle`](Self::settle) used by adapters.
    pub fn settle_by(
        &self,
        person: Option<&str>,
        debt_id: Option<DebtId>,
    ) -> LedgerResult<Outcome> {
        match SettleTarget::from_parts(person, debt_id) {
            Some(target) => self.settle(&target),
            None => Ok(Outcome::error(
                "Specify a person or a debt id to settle",
            )),
        }
    }

    /// Sum of `amount` over unpaid records.
    pub fn total_unpaid(&self) -> f64 {
        self.records
            .read()
            .iter()
            .filter(|record| record.is_unpaid())
            .map(|record| record.amount)
            .sum()
    }

    /// Totals plus unpaid balances grouped by exact person spelling.
    pub fn summary(&self) -> LedgerSummary {
        let records = self.records.read();
        let mut total_unpaid = 0.0;
        let mut total_paid = 0.0;
        let mut unpaid_by_person: Vec<PersonBalance> = Vec::new();

        for record in records.iter() {
            if !record.is_unpaid() {
                total_paid += record.amount;
                continue;
            }
            total_unpaid += record.amount;
            match unpaid_by_person
                .iter_mut()
                .find(|entry| entry.person == record.person)
            {
                Some(entry) => entry.amount += record.amount,
                None => unpaid_by_person.push(PersonBalance {
                    person: record.person.clone(),
                    amount: record.amount,
                }),
            }
        }

        LedgerSummary {
            record_count: records.len(),
            total_unpaid,
            total_paid,
            unpaid_by_person,
        }
    }

    /// Snapshot of every record in storage order.
    pub fn list_all(&self) -> Vec<DebtRecord> {
        self.records.read().clone()
    }

    /// Sum over *all* unpaid records matching `person`, not just the first.
    pub fn balance_of(&self, person: &str) -> f64 {
        self.records
            .read()
            .iter()
            .filter(|record| record.is_unpaid() && record.matches_person(person))
            .map(|record| record.amount)
            .sum()
    }

    /// Snapshot of one record by id.
    pub fn get(&self, id: DebtId) -> Option<DebtRecord> {
        self.records
            .read()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Runs `apply` against a working copy and commits it after a successful
    /// write. `NotFound`/`Error` outcomes skip the write entirely.
    fn mutate<F>(&self, event: &'static str, apply: F) -> LedgerResult<Outcome>
    where
        F: FnOnce(&mut Vec<DebtRecord>) -> Outcome,
    {
        let started_at = Instant::now();
        let mut records = self.records.write();
        let mut next = records.clone();
        let outcome = apply(&mut next);

        if !outcome.is_success() {
            info!(
                "event={} module=ledger status=ok kind={} duration_ms={}",
                event,
                kind_label(outcome.kind),
                started_at.elapsed().as_millis()
            );
            return Ok(outcome);
        }

        if let Err(err) = self.repo.save(&next) {
            error!(
                "event={} module=ledger status=error mode={} duration_ms={} error_code=ledger_persist_failed error={}",
                event,
                self.repo.mode(),
                started_at.elapsed().as_millis(),
                err
            );
            return Err(LedgerError::Persist(err));
        }

        *records = next;
        info!(
            "event={} module=ledger status=ok kind={} debt_id={} records={} duration_ms={}",
            event,
            kind_label(outcome.kind),
            outcome.record_id.unwrap_or_default(),
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }
}

fn validate_input(person: &str, amount: f64) -> Result<(&str, f64), Outcome> {
    let person = validate_person(person).map_err(|err| Outcome::error(err.to_string()))?;
    let amount = validate_amount(amount).map_err(|err| Outcome::error(err.to_string()))?;
    Ok((person, amount))
}

fn first_unpaid_for<'a>(records: &'a mut [DebtRecord], person: &str) -> Option<&'a mut DebtRecord> {
    records
        .iter_mut()
        .find(|record| record.is_unpaid() && record.matches_person(person))
}

/// `count + 1` in normal flow; never collides with ids from edited files.
/// `None` once `DebtId::MAX` is taken.
fn next_id(records: &[DebtRecord]) -> Option<DebtId> {
    let max_id = records.iter().map(|record| record.id).max().unwrap_or(0);
    max_id.max(records.len() as DebtId).checked_add(1)
}

fn count_people_with_multiple_unpaid(records: &[DebtRecord]) -> usize {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records.iter().filter(|record| record.is_unpaid()) {
        *counts.entry(normalize_person(&record.person)).or_default() += 1;
    }
    counts.values().filter(|count| **count > 1).count()
}

fn kind_label(kind: OutcomeKind) -> &'static str {
    match kind {
        OutcomeKind::Created => "created",
        OutcomeKind::Updated => "updated",
        OutcomeKind::NotFound => "not_found",
        OutcomeKind::Error => "error",
    }
}
