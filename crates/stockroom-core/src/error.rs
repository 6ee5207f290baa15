//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Purchase workflow rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-console errors                                              │
//! │  ├── GatewayError     - Submission collaborator failures               │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The basket engine itself never returns these: invalid magnitudes and
//! missing lines are no-ops there. These errors belong to the checks that
//! run around the engine.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Purchase workflow errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Product exists but has been deactivated.
    #[error("Product {0} is not active")]
    ProductInactive(ProductId),

    /// Neither the purchase cost nor the sale price of the product is usable.
    ///
    /// ## User Workflow
    /// ```text
    /// Select product (cost 0, sale price 0)
    ///      │
    ///      ▼
    /// Add to basket without an explicit price
    ///      │
    ///      ▼
    /// MissingPurchasePrice { product_id: 7 }
    ///      │
    ///      ▼
    /// UI asks staff to contact an administrator
    /// ```
    #[error("Product {product_id} has no valid purchase price")]
    MissingPurchasePrice { product_id: ProductId },

    /// No supplier matches the given RUC or id.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// A purchase was requested before choosing a supplier.
    #[error("A supplier must be selected before submitting a purchase")]
    SupplierNotSelected,

    /// The chosen supplier has been deactivated.
    #[error("Supplier {ruc} is not active")]
    SupplierInactive { ruc: String },

    /// A purchase was requested with nothing in the basket.
    #[error("The basket is empty")]
    EmptyBasket,

    /// A purchase aggregate is not a finite, positive amount.
    #[error("Purchase {field} is not a valid amount")]
    InvalidAmount { field: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the caller-side checks in [`crate::validation`] before an
/// operation reaches the basket engine.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a RUC with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value exceeds its upper bound.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: f64 },

    /// Range whose start is after its end.
    #[error("{field} start must not be after its end")]
    InvertedRange { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
