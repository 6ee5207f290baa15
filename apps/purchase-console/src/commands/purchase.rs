//! # Purchase Commands
//!
//! Payment details, preview and submission of the purchase in progress.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit_purchase                                                        │
//! │                                                                         │
//! │  lock session ──► build NewPurchase ──► unlock                          │
//! │                        │                                                │
//! │                        ├── no supplier / empty basket ──► error         │
//! │                        ▼                                                │
//! │                  gateway.submit(..).await                               │
//! │                        │                                                │
//! │            ┌───────────┴───────────┐                                    │
//! │            ▼                       ▼                                    │
//! │        Ok(receipt)             Err(e)                                   │
//! │        session.reset()         session untouched, staff can retry      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use stockroom_core::money::round_currency;
use stockroom_core::validation::validate_description;
use stockroom_core::{PaymentMethod, ProductId, PurchaseReceipt, Supplier};
use tracing::{debug, info, warn};

use super::basket::BasketResponse;
use crate::error::ApiError;
use crate::gateway::PurchaseGateway;
use crate::state::{ConfigState, PurchaseSession, SessionState};

/// Supplier and payment details of the purchase in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetails {
    pub supplier: Option<Supplier>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
}

impl From<&PurchaseSession> for PurchaseDetails {
    fn from(session: &PurchaseSession) -> Self {
        PurchaseDetails {
            supplier: session.supplier.clone(),
            payment_method: session.payment_method,
            description: Some(session.description.clone()).filter(|d| !d.is_empty()),
        }
    }
}

/// Receipt-style summary shown before submitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePreview {
    pub store_name: String,
    pub supplier: Option<Supplier>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub lines: Vec<PreviewLine>,
    pub tax_rate_percentage: f64,
    pub tax_base: f64,
    pub tax_amount: f64,
    pub total: f64,
    /// Printable text, one entry per row
    pub text: Vec<String>,
}

/// One preview row, amounts rounded to currency precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLine {
    pub product_id: ProductId,
    pub name: String,
    pub code: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Sets payment method and description. Absent arguments keep their value.
///
/// ## Arguments
/// * `payment_method` - `"cash"` / `"efectivo"` or `"yape"`
/// * `description` - Free-text note, empty clears it
pub fn set_purchase_details(
    session: &SessionState,
    payment_method: Option<String>,
    description: Option<String>,
) -> Result<PurchaseDetails, ApiError> {
    debug!(?payment_method, "set_purchase_details command");

    let payment_method = payment_method
        .map(|m| m.parse::<PaymentMethod>())
        .transpose()?;
    let description = description
        .map(|d| validate_description(&d))
        .transpose()?;

    session.with_session_mut(|s| {
        if let Some(method) = payment_method {
            s.payment_method = method;
        }
        if let Some(description) = description {
            s.description = description.unwrap_or_default();
        }
        Ok(PurchaseDetails::from(&*s))
    })
}

/// Builds the preview of the purchase in progress.
///
/// Line amounts and aggregates are each rounded from full precision, so
/// rounded lines may not add up to the rounded total by a cent.
pub fn preview_purchase(config: &ConfigState, session: &SessionState) -> PurchasePreview {
    debug!("preview_purchase command");

    let preview = session.with_session(|s| {
        let lines = s
            .basket
            .lines()
            .iter()
            .map(|line| PreviewLine {
                product_id: line.product_id,
                name: line
                    .product_ref
                    .as_ref()
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| format!("Product {}", line.product_id)),
                code: line.product_ref.as_ref().map(|r| r.code.clone()),
                quantity: line.quantity,
                unit_price: round_currency(line.unit_price),
                line_total: round_currency(line.line_total),
            })
            .collect();

        PurchasePreview {
            store_name: config.store_name.clone(),
            supplier: s.supplier.clone(),
            payment_method: s.payment_method,
            description: Some(s.description.clone()).filter(|d| !d.is_empty()),
            lines,
            tax_rate_percentage: s.basket.tax_rate().percentage(),
            tax_base: round_currency(s.basket.total_tax_base()),
            tax_amount: round_currency(s.basket.total_tax_amount()),
            total: round_currency(s.basket.total_amount()),
            text: Vec::new(),
        }
    });

    let text = preview_text(config, &preview);
    PurchasePreview { text, ..preview }
}

fn preview_text(config: &ConfigState, preview: &PurchasePreview) -> Vec<String> {
    let rule = "-".repeat(40);
    let mut text = vec![preview.store_name.clone()];

    text.push(match &preview.supplier {
        Some(s) => format!("Supplier: {} (RUC {})", s.name, s.ruc),
        None => "Supplier: not selected".to_string(),
    });
    text.push(format!("Payment: {}", preview.payment_method));
    text.push(rule.clone());

    for line in &preview.lines {
        let code = line
            .code
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        text.push(format!(
            "{} x {}{} @ {} = {}",
            line.quantity,
            line.name,
            code,
            config.format_currency(line.unit_price),
            config.format_currency(line.line_total),
        ));
    }

    text.push(rule);
    text.push(format!("Taxable base: {}", config.format_currency(preview.tax_base)));
    text.push(format!(
        "IGV ({}%): {}",
        preview.tax_rate_percentage,
        config.format_currency(preview.tax_amount)
    ));
    text.push(format!("Total: {}", config.format_currency(preview.total)));

    if let Some(description) = &preview.description {
        text.push(format!("Note: {}", description));
    }

    text
}

/// Submits the purchase in progress.
///
/// ## Behavior
/// - Success: the session is reset (empty basket, no supplier)
/// - Failure: the session is kept as it was so staff can retry
pub async fn submit_purchase(
    session: &SessionState,
    gateway: &dyn PurchaseGateway,
) -> Result<PurchaseReceipt, ApiError> {
    debug!("submit_purchase command");

    let purchase = session.with_session(|s| s.build_purchase())?;

    info!(
        supplier_id = purchase.supplier_id,
        lines = purchase.lines.len(),
        total = purchase.total,
        "Submitting purchase"
    );

    match gateway.submit(purchase).await {
        Ok(receipt) => {
            session.with_session_mut(|s| s.reset());
            info!(reference = %receipt.reference, "Purchase registered");
            Ok(receipt)
        }
        Err(e) => {
            warn!("Purchase not registered, session kept for retry");
            Err(e.into())
        }
    }
}

/// Discards the purchase in progress.
pub fn reset_purchase(session: &SessionState) -> BasketResponse {
    debug!("reset_purchase command");

    session.with_session_mut(|s| {
        s.reset();
        BasketResponse::from(&s.basket)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::basket::add_to_basket;
    use crate::commands::supplier::select_supplier;
    use crate::commands::testing::{self, FakeGateway};
    use crate::error::ErrorCode;

    async fn filled_session() -> SessionState {
        let catalog = testing::catalog();
        let session = SessionState::default();
        select_supplier(&catalog, &session, 7).await.unwrap();
        add_to_basket(&catalog, &session, 1, Some(2.0), Some(59.0)).await.unwrap();
        add_to_basket(&catalog, &session, 2, Some(1.0), None).await.unwrap();
        session
    }

    #[test]
    fn test_set_details() {
        let session = SessionState::default();

        let details =
            set_purchase_details(&session, Some("yape".into()), Some("  weekly  ".into()))
                .unwrap();
        assert_eq!(details.payment_method, PaymentMethod::Yape);
        assert_eq!(details.description.as_deref(), Some("weekly"));

        // Absent arguments keep, empty description clears
        let details = set_purchase_details(&session, None, Some(String::new())).unwrap();
        assert_eq!(details.payment_method, PaymentMethod::Yape);
        assert!(details.description.is_none());

        let err = set_purchase_details(&session, Some("card".into()), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = set_purchase_details(&session, None, Some("x".repeat(256))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_preview() {
        let session = filled_session().await;
        let config = ConfigState::default();

        let preview = preview_purchase(&config, &session);

        assert_eq!(preview.lines.len(), 2);
        assert_eq!(preview.total, 129.8);
        assert_eq!(preview.tax_base, 110.0);
        assert_eq!(preview.tax_amount, 19.8);
        assert_eq!(preview.tax_rate_percentage, 18.0);
        assert!(preview.text.contains(&"2 x Arroz 5kg [P001] @ S/ 59.00 = S/ 118.00".to_string()));
        assert!(preview.text.contains(&"IGV (18%): S/ 19.80".to_string()));
        assert!(preview.text.contains(&"Total: S/ 129.80".to_string()));
    }

    #[tokio::test]
    async fn test_submit_resets_session() {
        let session = filled_session().await;
        set_purchase_details(&session, Some("yape".into()), Some("urgent".into())).unwrap();
        let gateway = FakeGateway::default();

        let receipt = submit_purchase(&session, &gateway).await.unwrap();

        assert_eq!(receipt.reference, "C-1");
        assert_eq!(receipt.purchase.supplier_id, 7);
        assert_eq!(receipt.purchase.payment_method_id, 2);
        assert_eq!(receipt.purchase.description.as_deref(), Some("urgent"));
        assert_eq!(receipt.purchase.lines.len(), 2);
        assert_eq!(receipt.purchase.total, 129.8);

        session.with_session(|s| {
            assert!(s.basket.is_empty());
            assert!(s.supplier.is_none());
            assert_eq!(s.payment_method, PaymentMethod::Cash);
        });
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_session() {
        let session = filled_session().await;
        let gateway = FakeGateway::rejecting();

        let err = submit_purchase(&session, &gateway).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::SubmissionError);
        session.with_session(|s| {
            assert_eq!(s.basket.len(), 2);
            assert!(s.supplier.is_some());
        });
    }

    #[tokio::test]
    async fn test_submit_rules() {
        let gateway = FakeGateway::default();

        let session = SessionState::default();
        let err = submit_purchase(&session, &gateway).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let catalog = testing::catalog();
        select_supplier(&catalog, &session, 7).await.unwrap();
        let err = submit_purchase(&session, &gateway).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BasketError);

        assert_eq!(gateway.count(), 0);
    }

    #[tokio::test]
    async fn test_reset_purchase() {
        let session = filled_session().await;
        let basket = reset_purchase(&session);
        assert!(basket.items.is_empty());
        assert!(session.with_session(|s| s.supplier.is_none()));
    }
}
