use allowance_ledger::{
    commands::{Command, general::HELP_TEXT, parse_command},
    config::{self, database::DEFAULT_DATABASE_URL},
    errors::Result,
    gateway::SqlGateway,
    session::Session,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load ledger configuration
    let ledger_config = config::ledger::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        "Starting with {}'s ledger",
        ledger_config.default_individual
    );

    // 4. Connect to the store and make sure the table exists
    if config::database::get_database_url() == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Run the session, fed from stdin
    let gateway = Arc::new(SqlGateway::new(db));
    let (command_tx, command_rx) = mpsc::channel::<Command>(16);
    let (output_tx, mut output_rx) = mpsc::channel::<String>(16);

    let session = tokio::spawn(Session::new(gateway, ledger_config).run(command_rx, output_tx));
    let printer = tokio::spawn(async move {
        while let Some(text) = output_rx.recv().await {
            println!("{text}\n");
        }
    });

    println!("{HELP_TEXT}\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                let quit = command == Command::Quit;
                if command_tx.send(command).await.is_err() || quit {
                    break;
                }
            }
            Err(e) => println!("❌ {e}\n"),
        }
    }
    drop(command_tx);

    match session.await {
        Ok(result) => result?,
        Err(e) => warn!("Session task ended abnormally: {}", e),
    }
    printer.await.ok();

    Ok(())
}
