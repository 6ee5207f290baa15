//! # History Commands
//!
//! Listing and lookup of purchases that were already submitted.
//!
//! ## Search
//! ```text
//! search_purchases {from?, to?, reference?}
//!      │
//!      ├── bad date / from after to ──► VALIDATION_ERROR
//!      ▼
//! history.purchases() ──► filter ──► newest first ──► {purchases, count, total}
//! ```

use serde::{Deserialize, Serialize};
use stockroom_core::history::{filter_purchases, total_spent};
use stockroom_core::{PurchaseDetail, PurchaseFilter, PurchaseReceipt};
use tracing::{debug, error};

use crate::error::ApiError;
use crate::gateway::PurchaseHistory;

/// Matching purchases plus their count and combined total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseHistoryResponse {
    pub purchases: Vec<PurchaseReceipt>,
    pub count: usize,
    /// Sum of the submitted totals, at currency precision.
    pub total: f64,
}

/// Lists every submitted purchase, newest first.
pub async fn list_purchases(
    history: &dyn PurchaseHistory,
) -> Result<PurchaseHistoryResponse, ApiError> {
    debug!("list_purchases command");
    search(history, &PurchaseFilter::default()).await
}

/// Searches submitted purchases.
///
/// ## Arguments
/// * `from` / `to` - Inclusive bounds, `YYYY-MM-DD` or RFC 3339; either may
///   be omitted
/// * `reference` - Case-insensitive part of the receipt reference
pub async fn search_purchases(
    history: &dyn PurchaseHistory,
    from: Option<String>,
    to: Option<String>,
    reference: Option<String>,
) -> Result<PurchaseHistoryResponse, ApiError> {
    debug!(?from, ?to, ?reference, "search_purchases command");

    let filter = PurchaseFilter::new(from.as_deref(), to.as_deref(), reference.as_deref())?;
    search(history, &filter).await
}

/// Looks one purchase up by its exact reference.
pub async fn get_purchase(
    history: &dyn PurchaseHistory,
    reference: String,
) -> Result<PurchaseDetail, ApiError> {
    debug!(reference = %reference, "get_purchase command");

    let reference = reference.trim();
    read(history)
        .await?
        .into_iter()
        .find(|r| r.reference == reference)
        .map(PurchaseDetail::from)
        .ok_or_else(|| ApiError::not_found("Purchase", reference))
}

async fn search(
    history: &dyn PurchaseHistory,
    filter: &PurchaseFilter,
) -> Result<PurchaseHistoryResponse, ApiError> {
    let receipts = read(history).await?;
    let found = filter_purchases(&receipts, filter);

    Ok(PurchaseHistoryResponse {
        count: found.len(),
        total: total_spent(found.iter().copied()).amount(),
        purchases: found.into_iter().cloned().collect(),
    })
}

async fn read(history: &dyn PurchaseHistory) -> Result<Vec<PurchaseReceipt>, ApiError> {
    history.purchases().await.map_err(|e| {
        // Log the actual error but return a generic message
        error!("Purchase history unavailable: {}", e);
        ApiError::internal("Could not read the purchase history")
    })
}
