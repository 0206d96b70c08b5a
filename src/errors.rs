//! Crate-wide error type for the ambient layers (configuration, database setup,
//! console commands). Store-level failures never surface through this type;
//! they land in the store's error slot as a [`crate::store::LedgerError`].

use crate::{core::transaction::ValidationError, gateway::GatewayError};
use thiserror::Error;

/// Unified error for startup, configuration and command handling.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database connection or schema setup failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A transaction candidate was rejected before reaching the gateway
    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    /// The remote persistence gateway failed
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A console command could not be understood
    #[error("Command error: {message}")]
    Command {
        /// Human-readable reason
        message: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
