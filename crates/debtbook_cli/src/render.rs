//! Text and JSON renderings of ledger results.

use debtbook_core::{DebtRecord, DebtStatus, LedgerSummary, Outcome, OutcomeKind};
use serde_json::{json, Value};

pub fn outcome_text(outcome: &Outcome) -> String {
    match outcome.kind {
        OutcomeKind::Created | OutcomeKind::Updated | OutcomeKind::NotFound => {
            format!("{}\n", outcome.message)
        }
        OutcomeKind::Error => format!("Rejected: {}\n", outcome.message),
    }
}

pub fn total_text(total: f64) -> String {
    format!("Total unpaid debt: ${total:.2}\n")
}

pub fn total_json(total: f64) -> Value {
    json!({ "total": total })
}

pub fn balance_text(person: &str, balance: f64) -> String {
    format!("{}'s current debt: ${balance:.2}\n", person.trim())
}

pub fn balance_json(person: &str, balance: f64) -> Value {
    json!({ "person": person.trim(), "balance": balance })
}

pub fn summary_text(summary: &LedgerSummary) -> String {
    if summary.is_empty() {
        return "No debts recorded\n".to_string();
    }

    let mut out = String::from("DEBT SUMMARY:\n");
    out.push_str(&format!("Total unpaid: ${:.2}\n", summary.total_unpaid));
    out.push_str(&format!("Total paid: ${:.2}\n\n", summary.total_paid));

    if !summary.unpaid_by_person.is_empty() {
        out.push_str("UNPAID DEBTS BY PERSON:\n");
        for entry in &summary.unpaid_by_person {
            out.push_str(&format!("- {}: ${:.2}\n", entry.person, entry.amount));
        }
    }
    out
}

pub fn list_text(records: &[DebtRecord]) -> String {
    if records.is_empty() {
        return "No debts recorded\n".to_string();
    }

    let mut out = String::from("ALL DEBTS:\n");
    for record in records {
        let marker = match record.status {
            DebtStatus::Paid => '✓',
            DebtStatus::Unpaid => '✗',
        };
        out.push_str(&format!(
            "{marker} ID:{} - {}: ${:.2}",
            record.id, record.person, record.amount
        ));
        if !record.description.is_empty() {
            out.push_str(&format!(" ({})", record.description));
        }
        out.push_str(&format!(" - {}\n", record.date_added.date()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{balance_text, list_text, outcome_text, summary_text, total_text};
    use debtbook_core::{DebtRecord, LedgerSummary, Outcome, PersonBalance};

    #[test]
    fn summary_text_matches_report_layout() {
        let summary = LedgerSummary {
            record_count: 3,
            total_unpaid: 530.0,
            total_paid: 50.0,
            unpaid_by_person: vec![
                PersonBalance {
                    person: "Sarah".to_string(),
                    amount: 500.0,
                },
                PersonBalance {
                    person: "Omar".to_string(),
                    amount: 30.0,
                },
            ],
        };

        assert_eq!(
            summary_text(&summary),
            "DEBT SUMMARY:\n\
             Total unpaid: $530.00\n\
             Total paid: $50.00\n\
             \n\
             UNPAID DEBTS BY PERSON:\n\
             - Sarah: $500.00\n\
             - Omar: $30.00\n"
        );
    }

    #[test]
    fn empty_reports_say_so() {
        let summary = LedgerSummary {
            record_count: 0,
            total_unpaid: 0.0,
            total_paid: 0.0,
            unpaid_by_person: Vec::new(),
        };
        assert_eq!(summary_text(&summary), "No debts recorded\n");
        assert_eq!(list_text(&[]), "No debts recorded\n");
    }

    #[test]
    fn list_text_marks_status_and_shows_date_only() {
        let mut paid = DebtRecord::new(1, "Sarah", 480.0, "lunch");
        paid.settle(paid.date_added);
        let unpaid = DebtRecord::new(2, "John", 20.0, "");

        let text = list_text(&[paid.clone(), unpaid]);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "ALL DEBTS:");
        assert_eq!(
            lines[1],
            format!("✓ ID:1 - Sarah: $480.00 (lunch) - {}", paid.date_added.date())
        );
        assert!(lines[2].starts_with("✗ ID:2 - John: $20.00 - "));
    }

    #[test]
    fn scalar_reports_use_two_decimals() {
        assert_eq!(total_text(12.5), "Total unpaid debt: $12.50\n");
        assert_eq!(balance_text(" Sarah ", 0.0), "Sarah's current debt: $0.00\n");
    }

    #[test]
    fn error_outcomes_are_prefixed() {
        assert_eq!(outcome_text(&Outcome::error("bad")), "Rejected: bad\n");
        assert_eq!(outcome_text(&Outcome::not_found("none")), "none\n");
    }
}
