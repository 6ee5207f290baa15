//! # State Module
//!
//! Application state for the purchase console, split by concern so each
//! command takes only what it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  SessionState    │  │  CatalogState    │  │   ConfigState        │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Arc<Mutex<      │  │  products        │  │  store_name          │  │
//! │  │   PurchaseSession│  │  categories      │  │  tax_rate_bps        │  │
//! │  │  >>              │  │  suppliers       │  │  currency            │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Arc<Mutex<T>>, never held across an .await            │
//! │  • CatalogState: read-only after loading                               │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod session;

pub use catalog::{CatalogFile, CatalogState};
pub use config::ConfigState;
pub use session::{PurchaseSession, SessionState};
