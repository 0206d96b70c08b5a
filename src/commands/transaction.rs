//! Transaction command arguments - `income`, `expense` and `delete`.
//!
//! Parsing only checks that the text is well formed. Business rules (positive amount,
//! non-empty description, owner) are enforced by the store so the same checks apply
//! no matter where a candidate comes from.

use crate::{
    core::{Individual, NewTransaction, TransactionId, TransactionKind},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Date format accepted after `@`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parsed `income`/`expense` command, not yet bound to an individual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Income or expense
    pub kind: TransactionKind,
    /// Amount as typed (may still be non-positive)
    pub amount: Decimal,
    /// Free text, possibly empty
    pub description: String,
    /// Explicit date, or `None` for today
    pub date: Option<NaiveDate>,
}

impl Draft {
    /// Binds the draft to `owner`, defaulting the date to today.
    #[must_use]
    pub fn into_candidate(self, owner: Individual) -> NewTransaction {
        match self.date {
            Some(date) => NewTransaction::new(owner, self.kind, self.amount, self.description, date),
            None => NewTransaction::dated_today(owner, self.kind, self.amount, self.description),
        }
    }
}

/// Parses `<amount> <description...> [@YYYY-MM-DD]`.
pub fn parse_draft(kind: TransactionKind, args: &[&str]) -> Result<Draft> {
    let (amount_text, rest) = args.split_first().ok_or_else(|| Error::Command {
        message: format!("Usage: {kind} <amount> <description> [@YYYY-MM-DD]"),
    })?;

    let amount = Decimal::from_str(amount_text.trim_start_matches('$')).map_err(|_| {
        Error::Command {
            message: format!("Invalid amount `{amount_text}`: must be a valid number"),
        }
    })?;

    let (date, description_words) = match rest.split_last() {
        Some((last, init)) => match last.strip_prefix('@') {
            Some(date_text) => (Some(parse_date(date_text)?), init),
            None => (None, rest),
        },
        None => (None, rest),
    };

    Ok(Draft {
        kind,
        amount,
        description: description_words.join(" "),
        date,
    })
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| Error::Command {
        message: format!("Invalid date `{text}`: use YYYY-MM-DD"),
    })
}

/// Parses `<id>` (a leading `#` is allowed).
pub fn parse_delete(args: &[&str]) -> Result<TransactionId> {
    let id_text = args.first().ok_or_else(|| Error::Command {
        message: "Usage: delete <id>".to_string(),
    })?;
    TransactionId::from_str(id_text).map_err(|_| Error::Command {
        message: format!("Invalid transaction id `{id_text}`"),
    })
}
