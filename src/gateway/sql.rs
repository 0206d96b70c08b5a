//! SQL gateway - [`TransactionGateway`] over a SeaORM connection.
//!
//! Rows live in the `transactions` table described by [`crate::entities::transaction`].
//! The adapter plays the role of the remote store: it stamps `created_at` on insert,
//! lets the database assign the id, and decodes rows back into domain records.

use super::{DeleteOutcome, GatewayError, GatewayResult, TransactionGateway};
use crate::{
    core::{Individual, NewTransaction, Transaction, TransactionId, TransactionKind},
    entities::{self, transaction},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::str::FromStr;
use tracing::{debug, warn};

/// Gateway backed by any database SeaORM can reach through `DATABASE_URL`.
#[derive(Debug)]
pub struct SqlGateway {
    db: DatabaseConnection,
}

impl SqlGateway {
    /// Wraps an established connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TransactionGateway for SqlGateway {
    async fn query(&self, owner: Individual) -> GatewayResult<Vec<Transaction>> {
        let rows = entities::Transaction::find()
            .filter(transaction::Column::KidName.eq(owner.as_str()))
            .order_by_desc(transaction::Column::Date)
            .order_by_desc(transaction::Column::CreatedAt)
            .order_by_desc(transaction::Column::Id)
            .all(&self.db)
            .await?;
        debug!("Fetched {} rows for {}", rows.len(), owner);

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn insert(&self, candidate: NewTransaction) -> GatewayResult<Transaction> {
        let row = transaction::ActiveModel {
            kid_name: Set(candidate.owner.as_str().to_string()),
            kind: Set(candidate.kind.as_str().to_string()),
            amount: Set(candidate.amount.to_string()),
            description: Set(candidate.description),
            date: Set(candidate.date),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let inserted = row.insert(&self.db).await?;
        debug!("Inserted transaction {} for {}", inserted.id, inserted.kid_name);
        Transaction::try_from(inserted)
    }

    async fn delete_by_id(&self, id: TransactionId) -> GatewayResult<DeleteOutcome> {
        let result = entities::Transaction::delete_by_id(id.0)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            debug!("Delete of transaction {} matched no rows", id);
            Ok(DeleteOutcome::NotFound)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }
}

impl TryFrom<transaction::Model> for Transaction {
    type Error = GatewayError;

    fn try_from(row: transaction::Model) -> Result<Self, Self::Error> {
        let owner = Individual::from_str(&row.kid_name)
            .map_err(|e| GatewayError::Malformed(format!("row {}: {e}", row.id)))?;
        let kind = TransactionKind::from_str(&row.kind)
            .map_err(|e| GatewayError::Malformed(format!("row {}: {e}", row.id)))?;
        let amount = Decimal::from_str(&row.amount)
            .map_err(|e| GatewayError::Malformed(format!("row {}: bad amount: {e}", row.id)))?;

        if amount <= Decimal::ZERO {
            warn!("Row {} has non-positive amount {}", row.id, amount);
            return Err(GatewayError::Malformed(format!(
                "row {}: amount must be positive, got {amount}",
                row.id
            )));
        }

        Ok(Self {
            id: TransactionId(row.id),
            owner,
            kind,
            amount,
            description: row.description,
            date: row.date,
            created_at: row.created_at,
        })
    }
}
