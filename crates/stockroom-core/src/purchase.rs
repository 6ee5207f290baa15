//! # Purchase Payload
//!
//! Turns a finished basket into the purchase order the backend persists.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Purchase Submission                                │
//! │                                                                         │
//! │  BasketEngine ──┐                                                       │
//! │  Supplier ──────┼──► build_purchase() ──► NewPurchase ──► backend       │
//! │  PaymentMethod ─┤         │                    │                        │
//! │  Description ───┘         │                    ▼                        │
//! │                           │            PurchaseReceipt                  │
//! │                           ▼                                             │
//! │              SupplierNotSelected / SupplierInactive /                   │
//! │              EmptyBasket / Validation / InvalidAmount                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are rounded to 2 decimals here and nowhere earlier. The backend
//! recomputes the split with the same rate and is the authority on totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::basket::BasketEngine;
use crate::error::{CoreError, CoreResult};
use crate::money::{round_currency, Money};
use crate::types::{PaymentMethod, ProductId, Supplier};
use crate::validation::validate_description;

/// One submitted line.
///
/// Field names follow the purchasing backend's JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseLine {
    #[serde(rename = "productoId")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: f64,
    #[serde(rename = "precio")]
    pub unit_price: f64,
}

/// Purchase order payload.
///
/// Field names follow the purchasing backend's JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPurchase {
    #[serde(rename = "proveedorId")]
    pub supplier_id: i64,

    #[serde(rename = "detalle")]
    pub lines: Vec<PurchaseLine>,

    /// Backend payment code, see [`PaymentMethod::code`].
    #[serde(rename = "formapagoId")]
    pub payment_method_id: u8,

    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    #[serde(rename = "baseImponible")]
    pub tax_base: f64,

    #[serde(rename = "igv")]
    pub tax_amount: f64,

    pub total: f64,
}

/// What a submission collaborator hands back after accepting a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    /// Collaborator-side reference (backend id or outbox entry id).
    pub reference: String,
    #[ts(as = "String")]
    pub submitted_at: DateTime<Utc>,
    pub purchase: NewPurchase,
}

/// Builds the purchase payload from the current session state.
///
/// ## Errors
/// - [`CoreError::SupplierNotSelected`] when `supplier` is `None`
/// - [`CoreError::SupplierInactive`] for a deactivated supplier
/// - [`CoreError::EmptyBasket`] when there is nothing to buy
/// - [`CoreError::Validation`] for an over-long description
/// - [`CoreError::InvalidAmount`] when a price or aggregate cannot be
///   represented in cents, or the total rounds to zero
pub fn build_purchase(
    supplier: Option<&Supplier>,
    basket: &BasketEngine,
    payment_method: PaymentMethod,
    description: &str,
) -> CoreResult<NewPurchase> {
    let supplier = supplier.ok_or(CoreError::SupplierNotSelected)?;
    if !supplier.active {
        return Err(CoreError::SupplierInactive {
            ruc: supplier.ruc.clone(),
        });
    }

    if basket.is_empty() {
        return Err(CoreError::EmptyBasket);
    }

    let description = validate_description(description)?;

    for line in basket.lines() {
        checked_amount("unit price", line.unit_price)?;
    }

    let tax_base = checked_amount("tax base", basket.total_tax_base())?;
    let tax_amount = checked_amount("tax amount", basket.total_tax_amount())?;
    let total = checked_amount("total", basket.total_amount())?;
    if Money::from_amount(total).is_zero() {
        return Err(CoreError::InvalidAmount {
            field: "total".to_string(),
        });
    }

    Ok(NewPurchase {
        supplier_id: supplier.id,
        lines: basket.submission_lines(),
        payment_method_id: payment_method.code(),
        description,
        tax_base,
        tax_amount,
        total,
    })
}

/// Largest magnitude whose cent value fits in an `i64`.
const MAX_AMOUNT: f64 = (i64::MAX / 100) as f64;

/// Rounds an amount to currency precision, refusing values that rounding
/// would silently turn into zero or a saturated cent count.
fn checked_amount(field: &str, amount: f64) -> CoreResult<f64> {
    if !amount.is_finite() || amount.abs() >= MAX_AMOUNT {
        return Err(CoreError::InvalidAmount {
            field: field.to_string(),
        });
    }
    Ok(round_currency(amount))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier(active: bool) -> Supplier {
        Supplier {
            id: 12,
            ruc: "20123456789".to_string(),
            name: "Distribuidora Norte".to_string(),
            contact: None,
            phone: None,
            email: None,
            address: None,
            active,
        }
    }

    fn basket() -> BasketEngine {
        let mut basket = BasketEngine::new();
        basket.add_line(1, 1.0, 100.0, None);
        basket.add_line(2, 3.0, 9.99, None);
        basket
    }

    #[test]
    fn test_requires_supplier() {
        let err = build_purchase(None, &basket(), PaymentMethod::Cash, "").unwrap_err();
        assert!(matches!(err, CoreError::SupplierNotSelected));
    }

    #[test]
    fn test_rejects_inactive_supplier() {
        let err = build_purchase(Some(&supplier(false)), &basket(), PaymentMethod::Cash, "")
            .unwrap_err();
        assert!(matches!(err, CoreError::SupplierInactive { .. }));
    }

    #[test]
    fn test_rejects_empty_basket() {
        let err = build_purchase(
            Some(&supplier(true)),
            &BasketEngine::new(),
            PaymentMethod::Cash,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::EmptyBasket));
    }

    #[test]
    fn test_rejects_long_description() {
        let long = "x".repeat(crate::MAX_DESCRIPTION_LEN + 1);
        let err = build_purchase(Some(&supplier(true)), &basket(), PaymentMethod::Cash, &long)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_rejects_unrepresentable_amounts() {
        assert!(matches!(
            checked_amount("total", f64::INFINITY),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(matches!(
            checked_amount("tax amount", f64::NAN),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert_eq!(checked_amount("total", 129.974).unwrap(), 129.97);

        let mut huge = BasketEngine::new();
        huge.add_line(1, 1.0, 1e300, None);
        let err = build_purchase(Some(&supplier(true)), &huge, PaymentMethod::Cash, "")
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_rejects_total_rounding_to_zero() {
        let mut dust = BasketEngine::new();
        dust.add_line(1, 0.001, 0.01, None);

        let err = build_purchase(Some(&supplier(true)), &dust, PaymentMethod::Cash, "")
            .unwrap_err();
        match err {
            CoreError::InvalidAmount { field } => assert_eq!(field, "total"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_builds_rounded_payload() {
        let purchase = build_purchase(
            Some(&supplier(true)),
            &basket(),
            PaymentMethod::Yape,
            "  Reposicion semanal ",
        )
        .unwrap();

        assert_eq!(purchase.supplier_id, 12);
        assert_eq!(purchase.payment_method_id, 2);
        assert_eq!(purchase.description.as_deref(), Some("Reposicion semanal"));
        assert_eq!(purchase.lines.len(), 2);
        assert_eq!(purchase.lines[1].unit_price, 9.99);

        // 100.00 + 29.97 = 129.97; base 129.97 / 1.18 = 110.14...
        assert_eq!(purchase.total, 129.97);
        assert_eq!(purchase.tax_base, 110.14);
        assert_eq!(purchase.tax_amount, 19.83);
    }

    #[test]
    fn test_payload_uses_backend_field_names() {
        let purchase =
            build_purchase(Some(&supplier(true)), &basket(), PaymentMethod::Cash, "").unwrap();
        let json = serde_json::to_value(&purchase).unwrap();

        assert_eq!(json["proveedorId"], 12);
        assert_eq!(json["formapagoId"], 1);
        assert_eq!(json["detalle"][0]["productoId"], 1);
        assert_eq!(json["detalle"][0]["cantidad"], 1.0);
        assert_eq!(json["detalle"][0]["precio"], 100.0);
        assert!(json.get("descripcion").is_none());
        assert!(json.get("baseImponible").is_some());
        assert!(json.get("igv").is_some());
    }
}
