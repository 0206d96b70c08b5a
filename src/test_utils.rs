//! Shared test utilities for the allowance ledger.
//!
//! This module provides helpers for setting up in-memory test databases, building
//! transaction records with deterministic timestamps, and a scripted in-memory
//! gateway whose calls can be made to fail or held until released.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use crate::{
    core::{Individual, NewTransaction, Transaction, TransactionId, TransactionKind, transaction},
    entities,
    errors::Result,
    gateway::{DeleteOutcome, GatewayError, GatewayResult, TransactionGateway},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

/// 2024-01-01T00:00:00Z, the base of every deterministic `created_at`.
const BASE_TIMESTAMP: i64 = 1_704_067_200;

/// Installs a test-friendly tracing subscriber (safe to call repeatedly).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A creation timestamp `offset_secs` after the fixed base time.
#[must_use]
pub fn created_at(offset_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(BASE_TIMESTAMP + offset_secs, 0).unwrap()
}

/// Builds a confirmed transaction for Holden.
///
/// # Defaults
/// * `owner`: Holden
/// * `description`: `"Test transaction"`
#[must_use]
pub fn record(
    id: i64,
    kind: TransactionKind,
    amount: Decimal,
    date: NaiveDate,
    created_offset_secs: i64,
) -> Transaction {
    Transaction {
        id: TransactionId(id),
        owner: Individual::Holden,
        kind,
        amount,
        description: "Test transaction".to_string(),
        date,
        created_at: created_at(created_offset_secs),
    }
}

/// Inserts a raw row, bypassing the gateway, with a controlled `created_at`.
/// Use this to set up ordering scenarios or rows the gateway would never write.
pub async fn direct_insert_row(
    db: &DatabaseConnection,
    owner: Individual,
    kind: &str,
    amount: &str,
    date: NaiveDate,
    created_offset_secs: i64,
) -> Result<entities::transaction::Model> {
    let row = entities::transaction::ActiveModel {
        kid_name: Set(owner.as_str().to_string()),
        kind: Set(kind.to_string()),
        amount: Set(amount.to_string()),
        description: Set("Direct insert".to_string()),
        date: Set(date),
        created_at: Set(created_at(created_offset_secs)),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<Transaction>,
    next_id: i64,
    fail_queries: bool,
    fail_inserts: bool,
    fail_deletes: bool,
    query_calls: usize,
    insert_calls: usize,
    delete_calls: usize,
    gates: HashMap<Individual, Arc<Notify>>,
}

/// In-memory gateway with failure injection and per-owner query gates.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    /// Empty gateway where every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a candidate directly, as if another client had inserted it.
    pub fn seed(&self, candidate: NewTransaction) -> Transaction {
        let mut state = self.state.lock().unwrap();
        Self::store(&mut state, candidate)
    }

    /// Makes every subsequent query fail (or succeed again).
    pub fn fail_queries(&self, fail: bool) {
        self.state.lock().unwrap().fail_queries = fail;
    }

    /// Makes every subsequent insert fail (or succeed again).
    pub fn fail_inserts(&self, fail: bool) {
        self.state.lock().unwrap().fail_inserts = fail;
    }

    /// Makes every subsequent delete fail (or succeed again).
    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    /// Holds queries for `owner` until the returned handle is notified.
    pub fn hold_queries(&self, owner: Individual) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .gates
            .insert(owner, Arc::clone(&gate));
        gate
    }

    /// Snapshot of every stored row, all owners.
    #[must_use]
    pub fn rows(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().rows.clone()
    }

    /// Number of query calls received.
    #[must_use]
    pub fn query_calls(&self) -> usize {
        self.state.lock().unwrap().query_calls
    }

    /// Number of insert calls received.
    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.state.lock().unwrap().insert_calls
    }

    /// Number of delete calls received.
    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.state.lock().unwrap().delete_calls
    }

    fn store(state: &mut MemoryState, candidate: NewTransaction) -> Transaction {
        state.next_id += 1;
        let stored = Transaction {
            id: TransactionId(state.next_id),
            owner: candidate.owner,
            kind: candidate.kind,
            amount: candidate.amount,
            description: candidate.description,
            date: candidate.date,
            created_at: created_at(state.next_id),
        };
        state.rows.push(stored.clone());
        stored
    }
}

impl TransactionGateway for MemoryGateway {
    async fn query(&self, owner: Individual) -> GatewayResult<Vec<Transaction>> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.query_calls += 1;
            state.gates.get(&owner).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let state = self.state.lock().unwrap();
        if state.fail_queries {
            return Err(GatewayError::Unavailable("scripted query failure".to_string()));
        }
        let mut rows: Vec<Transaction> = state
            .rows
            .iter()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect();
        transaction::sort_for_display(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, candidate: NewTransaction) -> GatewayResult<Transaction> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;
        if state.fail_inserts {
            return Err(GatewayError::Transport("scripted insert failure".to_string()));
        }
        Ok(Self::store(&mut state, candidate))
    }

    async fn delete_by_id(&self, id: TransactionId) -> GatewayResult<DeleteOutcome> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        if state.fail_deletes {
            return Err(GatewayError::Transport("scripted delete failure".to_string()));
        }
        let before = state.rows.len();
        state.rows.retain(|t| t.id != id);
        if state.rows.len() == before {
            Ok(DeleteOutcome::NotFound)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }
}
