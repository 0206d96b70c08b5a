//! Ledger store - the single source of truth for what the user currently sees.
//!
//! The store owns the transaction collection of the selected individual, the derived
//! [`BalanceSummary`], a loading flag, and one error slot. Every mutation goes to the
//! gateway first and is reflected locally only after the gateway confirms it, so a
//! failure never leaves a partial artifact behind.
//!
//! Loads are split in two halves so they can run concurrently with other work:
//! [`LedgerStore::begin_load`] tags the request with a generation number and
//! [`LedgerStore::apply_load`] discards any response whose generation is no longer
//! current. A slow response for a previously selected individual therefore can
//! never overwrite the ledger of the one selected after it.

use crate::{
    core::{
        Individual, NewTransaction, Transaction, TransactionId, ValidationError,
        balance::{self, BalanceSummary},
        transaction,
    },
    gateway::{DeleteOutcome, GatewayError, GatewayResult, TransactionGateway},
};
use rust_decimal::Decimal;
use std::{cmp::Ordering, sync::Arc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Failure of a gateway call, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Reading the ledger failed; the previous collection is still shown
    #[error("load failed: {0}")]
    Load(#[source] GatewayError),

    /// Inserting failed; nothing was added locally
    #[error("add failed: {0}")]
    Add(#[source] GatewayError),

    /// Deleting failed; the record is still shown
    #[error("delete failed: {0}")]
    Delete(#[source] GatewayError),
}

impl LedgerError {
    /// Banner text for this failure.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Load(_) => "Failed to load transactions. Please check your connection.",
            Self::Add(_) => "Failed to add transaction. Please try again.",
            Self::Delete(_) => "Failed to delete transaction. Please try again.",
        }
    }
}

/// Identifies one issued load: who it was for and which generation issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    /// Individual the load was issued for
    pub owner: Individual,
    /// Store generation at the time the load was issued
    pub generation: u64,
}

/// An issued but not yet performed load. Independent of the store, so it can be
/// awaited (or spawned) while the store keeps handling other operations.
#[derive(Debug)]
pub struct LoadRequest<G> {
    ticket: LoadTicket,
    gateway: Arc<G>,
}

impl<G: TransactionGateway> LoadRequest<G> {
    /// The tag this request will carry back to the store.
    #[must_use]
    pub const fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Performs the gateway query.
    pub async fn fetch(self) -> LoadResponse {
        let result = self.gateway.query(self.ticket.owner).await;
        LoadResponse {
            ticket: self.ticket,
            result,
        }
    }
}

/// Result of a load, still tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct LoadResponse {
    /// Tag of the originating request
    pub ticket: LoadTicket,
    /// What the gateway returned
    pub result: GatewayResult<Vec<Transaction>>,
}

/// What [`LedgerStore::apply_load`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced
    Applied,
    /// The response was superseded by a newer load and ignored
    Stale,
    /// The load failed; the previous collection is kept and the error slot is set
    Failed,
}

/// What [`LedgerStore::remove`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The gateway deleted the row and the local record was dropped
    Removed,
    /// The gateway had nothing to delete; the local record was dropped anyway
    AlreadyGone,
    /// The id is not in the selected individual's ledger; nothing was sent
    NotPresent,
    /// The gateway failed; the record is still shown and the error slot is set
    Failed,
}

/// Holds the selected individual's transactions and keeps them consistent with the gateway.
#[derive(Debug)]
pub struct LedgerStore<G> {
    gateway: Arc<G>,
    selected: Individual,
    /// Owner whose rows are in `transactions`; `None` until a load succeeds.
    shown: Option<Individual>,
    transactions: Vec<Transaction>,
    summary: BalanceSummary,
    /// Records confirmed after the outstanding load was issued, merged when it lands.
    confirmed_while_loading: Vec<Transaction>,
    /// Ids confirmed deleted after the outstanding load was issued, dropped when it lands.
    deleted_while_loading: Vec<TransactionId>,
    generation: u64,
    loading: bool,
    error: Option<LedgerError>,
}

impl<G: TransactionGateway> LedgerStore<G> {
    /// Creates an empty store with `selected` as the active individual. Nothing is
    /// loaded until [`Self::load`] or [`Self::begin_load`] is called.
    #[must_use]
    pub fn new(gateway: Arc<G>, selected: Individual) -> Self {
        Self {
            gateway,
            selected,
            shown: None,
            transactions: Vec::new(),
            summary: BalanceSummary::default(),
            confirmed_while_loading: Vec::new(),
            deleted_while_loading: Vec::new(),
            generation: 0,
            loading: false,
            error: None,
        }
    }

    /// Currently selected individual.
    #[must_use]
    pub const fn selected(&self) -> Individual {
        self.selected
    }

    /// Individual whose rows are currently held, if any load has succeeded.
    #[must_use]
    pub const fn shown(&self) -> Option<Individual> {
        self.shown
    }

    /// Transactions in display order (newest first).
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Net and running balances of the held collection.
    #[must_use]
    pub const fn summary(&self) -> &BalanceSummary {
        &self.summary
    }

    /// Net balance of the held collection.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.summary.net
    }

    /// Transactions paired with their running balance, in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&Transaction, Decimal)> {
        self.transactions
            .iter()
            .zip(self.summary.running.iter().map(|entry| entry.balance))
    }

    /// Whether a load for the current generation is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The most recent failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&LedgerError> {
        self.error.as_ref()
    }

    /// Banner text for the most recent failure, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(LedgerError::user_message)
    }

    /// Dismisses the current error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Selects `owner` and issues a tagged load for it. Any load issued earlier
    /// becomes stale.
    pub fn begin_load(&mut self, owner: Individual) -> LoadRequest<G> {
        self.selected = owner;
        self.generation += 1;
        self.loading = true;
        self.error = None;
        // Mutations already confirmed are visible to the new query.
        self.confirmed_while_loading.clear();
        self.deleted_while_loading.clear();
        info!("Loading ledger for {} (generation {})", owner, self.generation);

        LoadRequest {
            ticket: LoadTicket {
                owner,
                generation: self.generation,
            },
            gateway: Arc::clone(&self.gateway),
        }
    }

    /// Applies a load response unless a newer load has been issued since.
    pub fn apply_load(&mut self, response: LoadResponse) -> LoadOutcome {
        let LoadResponse { ticket, result } = response;
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale load for {} (generation {}, current {})",
                ticket.owner, ticket.generation, self.generation
            );
            return LoadOutcome::Stale;
        }

        self.loading = false;
        let confirmed = std::mem::take(&mut self.confirmed_while_loading);
        let deleted = std::mem::take(&mut self.deleted_while_loading);
        match result {
            Ok(mut rows) => {
                for record in confirmed {
                    if record.owner == ticket.owner && !rows.iter().any(|t| t.id == record.id) {
                        rows.push(record);
                    }
                }
                rows.retain(|t| !deleted.contains(&t.id));
                transaction::sort_for_display(&mut rows);
                info!("Loaded {} transactions for {}", rows.len(), ticket.owner);

                self.transactions = rows;
                self.shown = Some(ticket.owner);
                self.error = None;
                self.recompute();
                LoadOutcome::Applied
            }
            Err(e) => {
                error!("Error fetching transactions for {}: {}", ticket.owner, e);
                self.error = Some(LedgerError::Load(e));
                LoadOutcome::Failed
            }
        }
    }

    /// Selects `owner` and loads its ledger, replacing the collection on success.
    pub async fn load(&mut self, owner: Individual) -> LoadOutcome {
        let request = self.begin_load(owner);
        let response = request.fetch().await;
        self.apply_load(response)
    }

    /// Loads the selected individual's ledger again.
    pub async fn reload(&mut self) -> LoadOutcome {
        self.load(self.selected).await
    }

    /// Records a new transaction through the gateway.
    ///
    /// Invalid candidates are rejected before any network call and leave the store
    /// untouched. `Ok(None)` means the gateway failed and the error slot holds an
    /// [`LedgerError::Add`].
    pub async fn add(
        &mut self,
        candidate: NewTransaction,
    ) -> Result<Option<Transaction>, ValidationError> {
        candidate.validate()?;
        if candidate.owner != self.selected {
            return Err(ValidationError::OwnerMismatch {
                candidate: candidate.owner,
                selected: self.selected,
            });
        }

        self.error = None;
        match self.gateway.insert(candidate).await {
            Ok(stored) => {
                info!(
                    "Added {} of {} for {} (id {})",
                    stored.kind, stored.amount, stored.owner, stored.id
                );
                if self.shown == Some(stored.owner) {
                    let position = self
                        .transactions
                        .partition_point(|t| t.display_cmp(&stored) == Ordering::Less);
                    self.transactions.insert(position, stored.clone());
                    self.recompute();
                }
                if self.loading || self.shown != Some(stored.owner) {
                    self.confirmed_while_loading.push(stored.clone());
                }
                Ok(Some(stored))
            }
            Err(e) => {
                error!("Error adding transaction: {}", e);
                self.error = Some(LedgerError::Add(e));
                Ok(None)
            }
        }
    }

    /// Deletes a transaction from the selected individual's ledger.
    ///
    /// Only ids present in the held collection of the selected individual are sent to
    /// the gateway; anything else is a no-op.
    pub async fn remove(&mut self, id: TransactionId) -> RemoveOutcome {
        let held = self.shown == Some(self.selected) && self.transactions.iter().any(|t| t.id == id);
        if !held {
            debug!("Transaction {} is not in {}'s ledger; nothing to delete", id, self.selected);
            return RemoveOutcome::NotPresent;
        }

        self.error = None;
        match self.gateway.delete_by_id(id).await {
            Ok(outcome) => {
                self.transactions.retain(|t| t.id != id);
                self.recompute();
                if self.loading {
                    self.deleted_while_loading.push(id);
                }
                match outcome {
                    DeleteOutcome::Deleted => {
                        info!("Deleted transaction {}", id);
                        RemoveOutcome::Removed
                    }
                    DeleteOutcome::NotFound => {
                        warn!("Transaction {} was already gone from the remote store", id);
                        RemoveOutcome::AlreadyGone
                    }
                }
            }
            Err(e) => {
                error!("Error deleting transaction {}: {}", id, e);
                self.error = Some(LedgerError::Delete(e));
                RemoveOutcome::Failed
            }
        }
    }

    fn recompute(&mut self) {
        self.summary = balance::summarize(&self.transactions);
    }
}
