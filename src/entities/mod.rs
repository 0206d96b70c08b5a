//! Entity module - Contains the SeaORM entity definitions for the remote store.
//! Each entity has a Model struct for data and an Entity struct for operations.

/// The `transactions` table
pub mod transaction;

pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
