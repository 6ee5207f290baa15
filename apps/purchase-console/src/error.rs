//! # API Error Type
//!
//! Unified error type for console commands, plus the startup error.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockroom                              │
//! │                                                                         │
//! │  Frontend                    Rust Console                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  {"command":"submit_purchase"}                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Gateway Error? ─── GatewayError::Io("...") ──────┐             │  │
//! │  │         │                                         │             │  │
//! │  │         ▼                                         ▼             │  │
//! │  │  Rule Error? ─── CoreError::EmptyBasket ─────── ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {"ok":false,"error":{"code":"BASKET_ERROR","message":"..."}}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stockroom_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::gateway::GatewayError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or supplier not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Purchase rule violated (no supplier, inactive supplier)
    BusinessLogic,

    /// Basket cannot be submitted
    BasketError,

    /// Submission collaborator failed
    SubmissionError,

    /// Command name not recognised
    UnknownCommand,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::SupplierNotFound(key) => ApiError::not_found("Supplier", key),
            CoreError::ProductInactive(_) | CoreError::MissingPurchasePrice { .. } => {
                ApiError::validation(err.to_string())
            }
            CoreError::SupplierNotSelected | CoreError::SupplierInactive { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::EmptyBasket | CoreError::InvalidAmount { .. } => {
                ApiError::new(ErrorCode::BasketError, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts gateway errors to API errors.
impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected(reason) => ApiError::new(
                ErrorCode::SubmissionError,
                format!("Purchase rejected: {}", reason),
            ),
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Purchase submission failed: {}", other);
                ApiError::new(
                    ErrorCode::SubmissionError,
                    "Could not register the purchase, please try again",
                )
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Error
// =============================================================================

/// Failures that stop the console before it accepts commands.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
