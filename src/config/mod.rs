/// Database connection and table creation
pub mod database;

/// Ledger settings loaded from config.toml
pub mod ledger;

pub use ledger::LedgerConfig;
