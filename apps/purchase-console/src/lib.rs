//! # Stockroom Purchase Console
//!
//! Purchase-entry workflow over a JSON-lines channel: the frontend writes
//! one command per line on stdin and reads one response per line on stdout.
//!
//! ## Module Organization
//! ```text
//! stockroom_console/
//! ├── lib.rs          ◄─── You are here (startup & request loop)
//! ├── dispatch.rs     ◄─── Request/response envelope, command routing
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Basket + supplier + payment details
//! │   ├── catalog.rs  ◄─── JSON catalog file
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── basket.rs   ◄─── Basket manipulation
//! │   ├── product.rs  ◄─── Product search
//! │   ├── supplier.rs ◄─── Supplier lookup
//! │   ├── purchase.rs ◄─── Preview and submission
//! │   ├── history.rs  ◄─── Submitted purchase search
//! │   └── config.rs   ◄─── Configuration retrieval
//! ├── gateway/
//! │   ├── mod.rs      ◄─── Catalog, submission and history traits
//! │   └── outbox.rs   ◄─── JSON-lines outbox
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dispatch::App;
use error::StartupError;
use gateway::OutboxGateway;
use state::{CatalogState, ConfigState};

/// Runs the console until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,stockroom=debug, override with RUST_LOG             │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults ◄── console.toml ◄── STOCKROOM_* variables               │
/// │                                                                         │
/// │  3. Load Catalog ─────────────────────────────────────────────────────► │
/// │     • products, categories, suppliers from catalog.json                 │
/// │                                                                         │
/// │  4. Open Outbox ──────────────────────────────────────────────────────► │
/// │     • purchases.jsonl, created on first submission, read for history    │
/// │                                                                         │
/// │  5. Serve ────────────────────────────────────────────────────────────► │
/// │     • one request line in, one response line out, strictly in order     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    info!("Starting Stockroom purchase console");

    let config = ConfigState::load(std::env::var_os("STOCKROOM_CONFIG").map(PathBuf::from))?;
    info!(
        store = %config.store_name,
        tax_rate_bps = config.tax_rate_bps,
        outbox = ?config.outbox_path,
        "Configuration loaded"
    );

    let catalog = CatalogState::load(&config.catalog_path).await?;
    let outbox = Arc::new(OutboxGateway::new(config.outbox_path.clone()));
    let app = App::new(config, Arc::new(catalog), outbox.clone(), outbox);

    serve(&app).await?;

    info!("Input closed, shutting down");
    Ok(())
}

async fn serve(app: &App) -> Result<(), StartupError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = app.handle_line(&line).await;
        let mut out = serde_json::to_string(&response).map_err(std::io::Error::from)?;
        out.push('\n');

        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// stdout carries responses, so logs go to stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom=trace` - Show trace for stockroom crates only
/// - Default: INFO, DEBUG for stockroom crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
