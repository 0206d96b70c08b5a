//! Transaction entity - One row per ledger entry in the remote `transactions` table.
//!
//! Each row has a server-assigned `id` and `created_at`, the owning `kid_name`,
//! a `type` of `"income"` or `"expense"`, a positive `amount`, a `description`,
//! and the user-chosen `date`. The amount is kept as canonical decimal text so it
//! never round-trips through a binary float.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the individual this entry belongs to (`"Holden"` or `"Maude"`)
    pub kid_name: String,
    /// Type of transaction: `"income"` or `"expense"`
    #[sea_orm(column_name = "type")]
    pub kind: String,
    /// Positive amount as decimal text (e.g. `"4.50"`)
    pub amount: String,
    /// Human-readable description of the transaction
    pub description: String,
    /// Calendar date of the entry
    pub date: Date,
    /// When the row was inserted
    pub created_at: DateTimeUtc,
}

/// Transactions have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
