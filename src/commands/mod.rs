//! Console commands - parsing typed lines into ledger intents and rendering the ledger.
//!
//! This is the text counterpart of a selector, entry form and list view. Commands
//! never touch the store directly; the [`crate::session`] controller executes them.

/// Help text and other commands that need no ledger access
pub mod general;
/// Text rendering of balances and transaction lists
pub mod render;
/// Parsing of `income`, `expense` and `delete` arguments
pub mod transaction;

use crate::{
    core::{Individual, TransactionId, TransactionKind},
    errors::{Error, Result},
};
use std::str::FromStr;

pub use transaction::Draft;

/// One user intent, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch to another individual's ledger (triggers a full reload)
    Select(Individual),
    /// Load the selected individual's ledger again
    Reload,
    /// Record an income or expense for the selected individual
    Record(Draft),
    /// Delete a transaction from the selected individual's ledger
    Delete(TransactionId),
    /// Print balance and transaction list
    Show,
    /// Print the help text
    Help,
    /// Leave the session
    Quit,
}

/// Parses one line of input.
///
/// Verbs are case-insensitive. An individual's name on its own is shorthand for
/// `select <name>`.
pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(Error::Command {
            message: "Empty command. Type `help` to see what you can do.".to_string(),
        });
    };
    let rest: Vec<&str> = words.collect();

    match verb.to_ascii_lowercase().as_str() {
        "select" | "switch" => {
            let name = rest.first().ok_or_else(|| Error::Command {
                message: "Usage: select <name>".to_string(),
            })?;
            parse_individual(name).map(Command::Select)
        }
        "income" | "earn" => {
            transaction::parse_draft(TransactionKind::Income, &rest).map(Command::Record)
        }
        "expense" | "spend" => {
            transaction::parse_draft(TransactionKind::Expense, &rest).map(Command::Record)
        }
        "delete" | "rm" => transaction::parse_delete(&rest).map(Command::Delete),
        "list" | "balance" | "show" => Ok(Command::Show),
        "reload" | "refresh" => Ok(Command::Reload),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Individual::from_str(other)
            .map(Command::Select)
            .map_err(|_| Error::Command {
                message: format!("Unknown command `{other}`. Type `help` for a list."),
            }),
    }
}

fn parse_individual(name: &str) -> Result<Individual> {
    Individual::from_str(name).map_err(|e| Error::Command {
        message: format!("{e}. Choose one of: Holden, Maude"),
    })
}
