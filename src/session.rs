//! Session controller - owns the selected individual and drives the ledger store.
//!
//! Commands arrive one at a time and are executed in order. Loads are spawned onto a
//! [`JoinSet`] so switching individuals never blocks input; each finished load is
//! handed back to the store, which drops it if a newer selection has been made since.
//! Adds and deletes are awaited inline, so the store is only ever mutated from here.

use crate::{
    commands::{Command, general::HELP_TEXT, render},
    config::LedgerConfig,
    core::{Individual, balance::format_money_with_symbol},
    errors::Result,
    gateway::TransactionGateway,
    store::{LedgerStore, LoadOutcome, LoadResponse, RemoveOutcome},
};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{debug, error, info};

/// Interactive ledger session over a gateway.
#[derive(Debug)]
pub struct Session<G> {
    store: LedgerStore<G>,
    loads: JoinSet<LoadResponse>,
    config: LedgerConfig,
}

impl<G: TransactionGateway + 'static> Session<G> {
    /// Creates a session showing `config.default_individual`. Call [`Self::start`]
    /// (or [`Self::run`]) to issue the first load.
    #[must_use]
    pub fn new(gateway: Arc<G>, config: LedgerConfig) -> Self {
        Self {
            store: LedgerStore::new(gateway, config.default_individual),
            loads: JoinSet::new(),
            config,
        }
    }

    /// Read access to the store for rendering and inspection.
    #[must_use]
    pub const fn store(&self) -> &LedgerStore<G> {
        &self.store
    }

    /// Currently selected individual.
    #[must_use]
    pub const fn selected(&self) -> Individual {
        self.store.selected()
    }

    /// Issues the initial load for the configured individual.
    pub fn start(&mut self) {
        self.spawn_load(self.config.default_individual);
    }

    /// Number of loads still running.
    #[must_use]
    pub fn pending_loads(&self) -> usize {
        self.loads.len()
    }

    fn spawn_load(&mut self, owner: Individual) {
        let request = self.store.begin_load(owner);
        debug!("Spawning load {:?}", request.ticket());
        self.loads.spawn(request.fetch());
    }

    /// Waits for the next finished load and applies it. `None` when no load is running.
    pub async fn next_load(&mut self) -> Option<LoadOutcome> {
        match self.loads.join_next().await? {
            Ok(response) => Some(self.store.apply_load(response)),
            Err(e) => {
                error!("Load task failed: {}", e);
                None
            }
        }
    }

    /// Executes one command and returns the text to show the user.
    pub async fn handle(&mut self, command: Command) -> String {
        match command {
            Command::Select(owner) => {
                self.spawn_load(owner);
                format!("Switched to {owner}. Loading...")
            }
            Command::Reload => {
                self.spawn_load(self.store.selected());
                format!("Reloading {}'s ledger...", self.store.selected())
            }
            Command::Record(draft) => {
                if self.store.is_loading() {
                    return format!(
                        "⏳ Still loading {}'s ledger. Try again in a moment.",
                        self.store.selected()
                    );
                }
                let candidate = draft.into_candidate(self.store.selected());
                match self.store.add(candidate).await {
                    Err(invalid) => format!("❌ {invalid}"),
                    Ok(Some(stored)) => format!(
                        "✅ Added {} {} - {} (Transaction ID: {})\n{}",
                        stored.kind,
                        format_money_with_symbol(stored.amount, &self.config.currency_symbol),
                        stored.description,
                        stored.id,
                        self.render(),
                    ),
                    Ok(None) => self.render(),
                }
            }
            Command::Delete(id) => match self.store.remove(id).await {
                RemoveOutcome::Removed | RemoveOutcome::AlreadyGone => {
                    format!("🗑️ Deleted transaction {id}\n{}", self.render())
                }
                RemoveOutcome::NotPresent => match self.store.shown() {
                    Some(shown) if shown != self.store.selected() => format!(
                        "❌ {}'s ledger is not loaded yet (still showing {shown}'s). Type `reload` and try again.",
                        self.store.selected()
                    ),
                    _ => format!(
                        "❌ Transaction {id} is not in {}'s ledger.",
                        self.store.selected()
                    ),
                },
                RemoveOutcome::Failed => self.render(),
            },
            Command::Show => self.render(),
            Command::Help => HELP_TEXT.to_string(),
            Command::Quit => "Bye!".to_string(),
        }
    }

    /// Current view of the ledger as text.
    #[must_use]
    pub fn render(&self) -> String {
        render::render_ledger(&self.store, &self.config.currency_symbol)
    }

    /// Runs until `commands` closes or a [`Command::Quit`] arrives, sending every reply
    /// (and the view after each applied load) to `output`.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        output: mpsc::Sender<String>,
    ) -> Result<()> {
        self.start();
        info!("Session started for {}", self.selected());

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    let quit = command == Command::Quit;
                    let reply = self.handle(command).await;
                    if output.send(reply).await.is_err() || quit {
                        break;
                    }
                }
                Some(outcome) = self.next_load(), if !self.loads.is_empty() => {
                    if outcome != LoadOutcome::Stale && output.send(self.render()).await.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        commands::{Draft, parse_command},
        core::{NewTransaction, TransactionKind},
        test_utils::{MemoryGateway, date},
    };
    use rust_decimal_macros::dec;

    fn session(gateway: &Arc<MemoryGateway>) -> Session<MemoryGateway> {
        Session::new(Arc::clone(gateway), LedgerConfig::default())
    }

    fn seed(gateway: &MemoryGateway, owner: Individual, amount: rust_decimal::Decimal, description: &str) {
        gateway.seed(NewTransaction::new(
            owner,
            TransactionKind::Income,
            amount,
            description,
            date(2024, 1, 1),
        ));
    }

    #[tokio::test]
    async fn test_start_loads_default_individual() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, Individual::Holden, dec!(3), "allowance");
        let mut session = session(&gateway);

        session.start();
        assert!(session.store().is_loading());
        assert_eq!(session.next_load().await, Some(LoadOutcome::Applied));
        assert_eq!(session.store().balance(), dec!(3));
        assert_eq!(session.next_load().await, None);
    }

    #[tokio::test]
    async fn test_slow_load_for_previous_owner_is_discarded() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, Individual::Holden, dec!(1), "holden");
        seed(&gateway, Individual::Maude, dec!(2), "maude");
        let holden_gate = gateway.hold_queries(Individual::Holden);
        let mut session = session(&gateway);

        session.start();
        session.handle(Command::Select(Individual::Maude)).await;
        assert_eq!(session.pending_loads(), 2);

        assert_eq!(session.next_load().await, Some(LoadOutcome::Applied));
        assert_eq!(session.store().shown(), Some(Individual::Maude));

        holden_gate.notify_one();
        assert_eq!(session.next_load().await, Some(LoadOutcome::Stale));
        assert_eq!(session.store().shown(), Some(Individual::Maude));
        assert_eq!(session.store().balance(), dec!(2));
    }

    #[tokio::test]
    async fn test_record_while_loading_is_deferred() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut session = session(&gateway);
        session.start();

        let reply = session
            .handle(parse_command("income 5 allowance").unwrap())
            .await;
        assert!(reply.contains("Still loading"));
        assert_eq!(gateway.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_record_and_delete_round_trip() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut session = session(&gateway);
        session.start();
        session.next_load().await;

        let reply = session
            .handle(Command::Record(Draft {
                kind: TransactionKind::Income,
                amount: dec!(10.00),
                description: "allowance".to_string(),
                date: Some(date(2024, 1, 1)),
            }))
            .await;
        assert!(reply.starts_with("✅ Added income $10.00 - allowance"));
        assert!(reply.contains("Holden's Balance: $10.00"));

        let id = session.store().transactions()[0].id;
        let reply = session.handle(Command::Delete(id)).await;
        assert!(reply.contains("Deleted transaction"));
        assert!(reply.contains("No transactions yet"));
    }

    #[tokio::test]
    async fn test_invalid_record_reports_validation_error() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut session = session(&gateway);
        session.start();
        session.next_load().await;

        let reply = session
            .handle(parse_command("expense 0 nothing").unwrap())
            .await;
        assert!(reply.starts_with("❌ Amount must be greater than zero"));
        assert_eq!(gateway.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_other_owners_row_is_refused() {
        let gateway = Arc::new(MemoryGateway::new());
        let holdens = gateway.seed(NewTransaction::new(
            Individual::Holden,
            TransactionKind::Income,
            dec!(5),
            "allowance",
            date(2024, 1, 1),
        ));
        let mut session = Session::new(
            Arc::clone(&gateway),
            LedgerConfig {
                default_individual: Individual::Maude,
                ..LedgerConfig::default()
            },
        );
        session.start();
        session.next_load().await;

        let reply = session.handle(Command::Delete(holdens.id)).await;
        assert!(reply.contains("is not in Maude's ledger"));
        assert_eq!(gateway.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_during_reload_stays_deleted() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, Individual::Holden, dec!(5), "allowance");
        let mut session = session(&gateway);
        session.start();
        session.next_load().await;
        let id = session.store().transactions()[0].id;

        session.handle(Command::Reload).await;
        // let the reload read the row before it is deleted
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        let reply = session.handle(Command::Delete(id)).await;
        assert!(reply.starts_with("🗑️ Deleted transaction"));

        assert_eq!(session.next_load().await, Some(LoadOutcome::Applied));
        assert!(gateway.rows().is_empty());
        assert!(session.store().transactions().is_empty());
        assert_eq!(session.store().balance(), dec!(0));
    }

    #[tokio::test]
    async fn test_delete_after_failed_switch_asks_for_reload() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, Individual::Holden, dec!(5), "allowance");
        let mut session = session(&gateway);
        session.start();
        session.next_load().await;
        let id = session.store().transactions()[0].id;

        gateway.fail_queries(true);
        session.handle(Command::Select(Individual::Maude)).await;
        assert_eq!(session.next_load().await, Some(LoadOutcome::Failed));

        let reply = session.handle(Command::Delete(id)).await;
        assert!(reply.contains("Maude's ledger is not loaded yet (still showing Holden's)"));
        assert_eq!(gateway.delete_calls(), 0);
        assert_eq!(gateway.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_add_shows_banner() {
        let gateway = Arc::new(MemoryGateway::new());
        let mut session = session(&gateway);
        session.start();
        session.next_load().await;
        gateway.fail_inserts(true);

        let reply = session
            .handle(parse_command("income 1 chores").unwrap())
            .await;
        assert!(reply.starts_with("⚠️  Failed to add transaction. Please try again."));
    }

    #[tokio::test]
    async fn test_run_loop_over_channels() {
        let gateway = Arc::new(MemoryGateway::new());
        seed(&gateway, Individual::Maude, dec!(7), "birthday");
        let (command_tx, command_rx) = mpsc::channel(8);
        let (output_tx, mut output_rx) = mpsc::channel(8);

        let handle = tokio::spawn(session(&gateway).run(command_rx, output_tx));

        // initial Holden load
        let first = output_rx.recv().await.unwrap();
        assert!(first.contains("Holden's Balance: $0.00"));

        command_tx.send(Command::Select(Individual::Maude)).await.unwrap();
        assert!(output_rx.recv().await.unwrap().contains("Switched to Maude"));
        let view = output_rx.recv().await.unwrap();
        assert!(view.contains("Maude's Balance: $7.00"));
        assert!(view.contains("birthday"));

        command_tx.send(Command::Quit).await.unwrap();
        assert_eq!(output_rx.recv().await.unwrap(), "Bye!");
        handle.await.unwrap().unwrap();
    }
}
