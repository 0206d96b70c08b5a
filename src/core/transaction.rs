//! Transaction domain types - persisted records, insert candidates, and local validation.
//!
//! A [`Transaction`] is what the remote store hands back: it carries the server-assigned
//! id and creation timestamp. A [`NewTransaction`] is what the user submits; it is
//! validated locally before any gateway call is made. Amounts are always positive and
//! the [`TransactionKind`] alone decides the sign of the contribution to a balance.

use super::individual::Individual;
use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Server-assigned transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub i64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl TransactionKind {
    /// Wire value stored in the `type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Applies this kind's sign to a (positive) amount.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("Unknown transaction type: {other}")),
        }
    }
}

/// A transaction as confirmed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Server-assigned identifier
    pub id: TransactionId,
    /// Whose ledger this entry belongs to
    #[serde(rename = "kid_name")]
    pub owner: Individual,
    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Strictly positive amount
    pub amount: Decimal,
    /// What the money was for
    pub description: String,
    /// Calendar date chosen by the user
    pub date: NaiveDate,
    /// Server-assigned insertion time, only used to order same-day entries
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Contribution of this entry to the balance.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    /// Display order: newest date first, then most recently entered, then highest id.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        other
            .date
            .cmp(&self.date)
            .then_with(|| other.created_at.cmp(&self.created_at))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Sorts a slice into display order (see [`Transaction::display_cmp`]).
pub fn sort_for_display(transactions: &mut [Transaction]) {
    transactions.sort_by(Transaction::display_cmp);
}

/// Reasons a candidate is rejected before it reaches the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Amounts must be strictly greater than zero
    #[error("Amount must be greater than zero (got {amount})")]
    NonPositiveAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Description was empty or only whitespace
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// Candidate targets a different ledger than the one being shown
    #[error("Transaction is for {candidate}, but {selected}'s ledger is selected")]
    OwnerMismatch {
        /// Owner named on the candidate
        candidate: Individual,
        /// Owner currently selected
        selected: Individual,
    },
}

/// A transaction the user wants to record. Has no id or creation time yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Whose ledger this entry belongs to
    #[serde(rename = "kid_name")]
    pub owner: Individual,
    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Must be strictly positive
    pub amount: Decimal,
    /// Must be non-empty
    pub description: String,
    /// Calendar date of the entry
    pub date: NaiveDate,
}

impl NewTransaction {
    /// Builds a candidate with an explicit date. The description is trimmed.
    #[must_use]
    pub fn new(
        owner: Individual,
        kind: TransactionKind,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            owner,
            kind,
            amount,
            description: description.into().trim().to_string(),
            date,
        }
    }

    /// Builds a candidate dated today (local time), the form's default.
    #[must_use]
    pub fn dated_today(
        owner: Individual,
        kind: TransactionKind,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self::new(owner, kind, amount, description, Local::now().date_naive())
    }

    /// Checks the invariants every stored transaction must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount {
                amount: self.amount,
            });
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }
}

impl From<&Transaction> for NewTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            owner: transaction.owner,
            kind: transaction.kind,
            amount: transaction.amount,
            description: transaction.description.clone(),
            date: transaction.date,
        }
    }
}
