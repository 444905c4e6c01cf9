//! One-shot command adapter over the ledger core.
//!
//! # Responsibility
//! - Parse arguments, validate free-text amounts, call one ledger operation.
//! - Render structured outcomes as text or JSON.
//!
//! # Invariants
//! - The ledger path comes only from `LedgerConfig` resolution.
//! - Exit code is 0 for `Created`/`Updated`/reports, 1 for `NotFound`/`Error`
//!   outcomes, 2 for persistence failures.

mod render;

use clap::{Parser, Subcommand};
use debtbook_core::{
    default_log_level, init_logging, parse_amount, DebtId, LedgerConfig, LedgerRepository,
    LedgerStore, Outcome,
};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "debtbook", version = debtbook_core::core_version(), about = "Track who owes you what")]
struct Cli {
    /// Ledger file (overrides DEBTBOOK_LEDGER_PATH, default debts.json)
    #[arg(long, global = true)]
    ledger: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record money lent; adds to an existing unpaid debt when there is one
    Charge {
        person: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Record a repayment against the person's unpaid debt
    Pay {
        person: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Mark a debt as paid, by id or by person
    Settle {
        #[arg(long)]
        person: Option<String>,
        #[arg(long)]
        id: Option<DebtId>,
    },
    /// Total unpaid across everyone
    Total,
    /// Totals plus unpaid balances per person
    Summary,
    /// Every debt, paid and unpaid
    List,
    /// Unpaid balance for one person
    Balance { person: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    }

    let config = LedgerConfig::resolve(cli.ledger.as_deref());
    let store = match config.open_store() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    match run(&store, cli.command, cli.json) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run<R: LedgerRepository>(
    store: &LedgerStore<R>,
    command: Command,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let outcome = match command {
        Command::Charge {
            person,
            amount,
            description,
        } => match parse_amount(&amount) {
            Ok(amount) => store.record_charge(&person, amount, &description)?,
            Err(err) => Outcome::error(err.to_string()),
        },
        Command::Pay { person, amount } => match parse_amount(&amount) {
            Ok(amount) => store.record_payment(&person, amount)?,
            Err(err) => Outcome::error(err.to_string()),
        },
        Command::Settle { person, id } => store.settle_by(person.as_deref(), id)?,
        Command::Total => {
            let total = store.total_unpaid();
            emit(json, render::total_json(total), render::total_text(total))?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Summary => {
            let summary = store.summary();
            emit(json, serde_json::to_value(&summary)?, render::summary_text(&summary))?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::List => {
            let records = store.list_all();
            emit(json, serde_json::to_value(&records)?, render::list_text(&records))?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Balance { person } => {
            let balance = store.balance_of(&person);
            emit(
                json,
                render::balance_json(&person, balance),
                render::balance_text(&person, balance),
            )?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    emit(json, serde_json::to_value(&outcome)?, render::outcome_text(&outcome))?;
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn emit(
    json: bool,
    value: serde_json::Value,
    text: String,
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{text}");
    }
    Ok(())
}
