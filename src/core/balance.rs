//! Balance calculation - net balance and per-entry running balance.
//!
//! Pure functions with no I/O. All arithmetic is done in [`Decimal`]; rounding to
//! two places happens only in [`format_money`], never in stored or accumulated values.

use super::transaction::{Transaction, TransactionId};
use rust_decimal::{Decimal, RoundingStrategy};

/// Balance through (and including) one transaction in chronological terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningBalance {
    /// The transaction this balance is attached to
    pub id: TransactionId,
    /// Prefix sum of signed amounts up to and including this transaction
    pub balance: Decimal,
}

/// Everything a presentation layer needs to show the balance of a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSummary {
    /// Income minus expenses over the whole collection
    pub net: Decimal,
    /// Running balances in display order (newest first)
    pub running: Vec<RunningBalance>,
}

impl BalanceSummary {
    /// Running balance attached to a given transaction, if it is part of the summary.
    #[must_use]
    pub fn running_for(&self, id: TransactionId) -> Option<Decimal> {
        self.running
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.balance)
    }
}

/// Sum of `+amount` for income and `-amount` for expenses. Order does not matter.
#[must_use]
pub fn net_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// Running balance for every transaction, returned in display order.
///
/// The input may be in any order. Entries are walked oldest first, accumulating
/// signed amounts, and the result is reversed so the newest entry comes first and
/// carries the full net balance.
#[must_use]
pub fn running_balances(transactions: &[Transaction]) -> Vec<RunningBalance> {
    let mut chronological: Vec<&Transaction> = transactions.iter().collect();
    chronological.sort_by(|a, b| b.display_cmp(a));

    let mut total = Decimal::ZERO;
    let mut running: Vec<RunningBalance> = chronological
        .into_iter()
        .map(|transaction| {
            total += transaction.signed_amount();
            RunningBalance {
                id: transaction.id,
                balance: total,
            }
        })
        .collect();
    running.reverse();
    running
}

/// Computes both the net balance and the running balances.
#[must_use]
pub fn summarize(transactions: &[Transaction]) -> BalanceSummary {
    BalanceSummary {
        net: net_balance(transactions),
        running: running_balances(transactions),
    }
}

/// Formats an amount for display: `$` prefix, two decimal places, banker's rounding.
///
/// Negative values get a leading minus (`-$4.50`).
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format_money_with_symbol(amount, "$")
}

/// Same as [`format_money`] with a configurable currency symbol.
#[must_use]
pub fn format_money_with_symbol(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{:.2}", rounded.abs())
}
