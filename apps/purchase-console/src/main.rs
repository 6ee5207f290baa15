//! # Stockroom Console Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stockroom Purchase Console                          │
//! │                                                                         │
//! │   Frontend ── stdin (JSON lines) ──► stockroom-console                  │
//! │   Frontend ◄── stdout (JSON lines) ── stockroom-console                 │
//! │                                         │                               │
//! │                                         ├── catalog.json (read)         │
//! │                                         └── purchases.jsonl (append)    │
//! │                                                                         │
//! │   Logs: stderr                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    match stockroom_console::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Console stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
