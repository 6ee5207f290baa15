//! # Collaborator Seams
//!
//! Traits for the external collaborators the purchase workflow talks to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   commands ──► ProductCatalog   (product / supplier / category lookup) │
//! │                  └── CatalogState: JSON file loaded at startup          │
//! │                                                                         │
//! │   commands ──► PurchaseGateway  (hand over a finished purchase)         │
//! │                  └── OutboxGateway: JSON lines for the uploader         │
//! │                                                                         │
//! │   commands ──► PurchaseHistory  (read back submitted purchases)         │
//! │                  └── OutboxGateway: same file, read in full             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod outbox;

use async_trait::async_trait;
use stockroom_core::{Category, NewPurchase, Product, ProductId, PurchaseReceipt, Supplier};
use thiserror::Error;

pub use outbox::{OutboxEntry, OutboxGateway};

/// Errors from a submission collaborator.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The collaborator refused the purchase.
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Read access to products, suppliers and categories.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, id: ProductId) -> Option<Product>;

    async fn products(&self) -> Vec<Product>;

    async fn categories(&self) -> Vec<Category>;

    async fn supplier(&self, id: i64) -> Option<Supplier>;

    async fn supplier_by_ruc(&self, ruc: &str) -> Option<Supplier>;

    async fn suppliers(&self) -> Vec<Supplier>;
}

/// Accepts a finished purchase for persistence.
#[async_trait]
pub trait PurchaseGateway: Send + Sync {
    async fn submit(&self, purchase: NewPurchase) -> Result<PurchaseReceipt, GatewayError>;
}

/// Read access to purchases already accepted by a [`PurchaseGateway`].
#[async_trait]
pub trait PurchaseHistory: Send + Sync {
    /// Every accepted purchase, oldest first.
    async fn purchases(&self) -> Result<Vec<PurchaseReceipt>, GatewayError>;
}
