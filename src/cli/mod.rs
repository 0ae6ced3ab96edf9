//! Argument-driven command line front end over [`ExpenseManager`](crate::core::ExpenseManager).

mod args;
mod handlers;
pub mod output;

use std::env;

use thiserror::Error;

use crate::{core::services::ServiceError, errors::LedgerError, split::SplitType};

use args::Args;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Runs one command from the process arguments against the persisted ledger.
pub fn run_cli() -> Result<(), CliError> {
    let mut raw = env::args().skip(1);
    let command = raw.next().unwrap_or_else(|| "help".to_string());
    let args = Args::parse(raw)?;
    handlers::dispatch(&command, &args)
}

pub(crate) fn usage() -> String {
    let mut text = String::from(
        "Usage: shared_expenses_cli <command> [args]

Commands:
  add-contact <name> [--id <id>] [--email <email>] [--phone <phone>]
  contacts
  add-expense <title> <amount> <split-type> <participants> [--split id=pct,...]
              [--category <name>] [--note <text>]
  expenses [--contact <id>]
  balances
  settle <expense-id> <participant>
  settle-all <contact-id>
  settle-up <contact-id> --wallet <balance>
  settle-expense <expense-id> <contact-id> --wallet <balance>
  delete <expense-id>
  remind <contact-id>
  version
  help

Split types:
",
    );
    for split_type in SplitType::ALL {
        text.push_str(&format!("  {:<28} {}\n", split_type.as_str(), split_type.label()));
    }
    text.push_str("Participants are comma separated contact ids; `me` stands for the current user.");
    text
}
