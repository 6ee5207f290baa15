//! # stockroom-core: Pure Business Logic for Stockroom Purchasing
//!
//! This crate holds the purchase-basket engine and the rules around it as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stockroom Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (frontend)                   │   │
//! │  │   Supplier lookup ──► Product search ──► Basket ──► Submit      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON-lines commands                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-console                               │   │
//! │  │   add_to_basket, update_basket_price, submit_purchase, etc.     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ stockroom-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  basket  │ │  money   │ │ catalog  │ │ purchase │          │   │
//! │  │   │ LineItem │ │  Money   │ │ filters  │ │ payload  │          │   │
//! │  │   │  Engine  │ │ TaxSplit │ │  lookup  │ │ builder  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO SCREEN • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        Purchasing backend (external, owns persistence)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`basket`] - The purchase basket engine (aggregation + tax split)
//! - [`types`] - Domain types (Product, Supplier, PaymentMethod, etc.)
//! - [`money`] - Currency rounding at the submission boundary
//! - [`catalog`] - Product search and supplier lookup helpers
//! - [`purchase`] - Purchase payload for the backend
//! - [`history`] - Filtering and counts over submitted purchases
//! - [`validation`] - Caller-side input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::basket::BasketEngine;
//!
//! let mut basket = BasketEngine::new();
//! basket.add_line(5, 2.0, 118.0, None);
//! basket.add_line(5, 3.0, 118.0, None);
//!
//! assert_eq!(basket.len(), 1);
//! assert!((basket.total_amount() - 590.0).abs() < 1e-9);
//! assert!((basket.total_tax_base() - 500.0).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod catalog;
pub mod error;
pub mod history;
pub mod money;
pub mod purchase;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use basket::{AddOutcome, BasketEngine, BasketTotals, LineItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use history::{DateRange, PurchaseDetail, PurchaseFilter};
pub use money::Money;
pub use purchase::{NewPurchase, PurchaseLine, PurchaseReceipt};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax (IGV) applied to purchase prices: 18%.
///
/// Prices entered in the basket are tax-inclusive. The backend recomputes
/// and persists the same split, so this value must match its own rate.
pub const TAX_RATE: TaxRate = TaxRate::from_bps(1800);

/// Decimal places used when amounts leave the engine.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Maximum length of a purchase description.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Largest quantity accepted for one basket line.
pub const MAX_QUANTITY: f64 = 1_000_000.0;

/// Largest tax-inclusive unit price accepted.
pub const MAX_UNIT_PRICE: f64 = 10_000_000.0;
