//! Text rendering of the ledger: error banner, balance line, and transaction list.

use crate::{
    core::{Individual, Transaction, TransactionKind, balance::format_money_with_symbol},
    gateway::TransactionGateway,
    store::LedgerStore,
};
use rust_decimal::Decimal;
use std::fmt::Write;

/// Shown instead of the list when a ledger has no entries
pub const EMPTY_LIST_TEXT: &str = "No transactions yet";

/// `"<Name>'s Balance: $X.XX"`
#[must_use]
pub fn render_balance(owner: Individual, balance: Decimal, symbol: &str) -> String {
    format!("{owner}'s Balance: {}", format_money_with_symbol(balance, symbol))
}

/// One list row: id, date, description, signed amount and running balance.
#[must_use]
pub fn render_entry(transaction: &Transaction, running: Decimal, symbol: &str) -> String {
    let sign = match transaction.kind {
        TransactionKind::Income => '+',
        TransactionKind::Expense => '-',
    };
    format!(
        "#{:<5} {:<13} {:<24} {}{:>10}   Balance: {}",
        transaction.id,
        transaction.date.format("%b %-d, %Y").to_string(),
        transaction.description,
        sign,
        format_money_with_symbol(transaction.amount, symbol),
        format_money_with_symbol(running, symbol),
    )
}

/// Full view of the store: banner (if any), then either a loading notice or the
/// balance and transaction list.
#[must_use]
pub fn render_ledger<G: TransactionGateway>(store: &LedgerStore<G>, symbol: &str) -> String {
    let mut out = String::new();

    if let Some(message) = store.error_message() {
        let _ = writeln!(out, "⚠️  {message}");
    }

    if store.is_loading() {
        let _ = write!(out, "Loading {}'s ledger...", store.selected());
        return out;
    }

    let owner = store.shown().unwrap_or_else(|| store.selected());
    if owner != store.selected() {
        let _ = writeln!(
            out,
            "{}'s ledger could not be loaded; showing {owner}'s. Type `reload` to try again.",
            store.selected()
        );
    }
    let _ = writeln!(out, "{}", render_balance(owner, store.balance(), symbol));

    if store.transactions().is_empty() {
        out.push_str(EMPTY_LIST_TEXT);
        return out;
    }

    out.push_str("Recent Transactions");
    for (transaction, running) in store.entries() {
        out.push('\n');
        out.push_str(&render_entry(transaction, running, symbol));
    }
    out
}
