//! Core business logic - framework-agnostic ledger types and balance math.

/// Net and running balance calculation
pub mod balance;
/// The fixed set of ledger owners
pub mod individual;
/// Transaction records, candidates and validation
pub mod transaction;

pub use balance::{BalanceSummary, RunningBalance, format_money, summarize};
pub use individual::Individual;
pub use transaction::{NewTransaction, Transaction, TransactionId, TransactionKind, ValidationError};
