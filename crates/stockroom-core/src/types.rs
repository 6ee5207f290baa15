//! # Domain Types
//!
//! Catalog and purchasing types shared by the engine and the console.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Supplier     │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  code           │   │  ruc (11 dig.)  │   │  name           │       │
//! │  │  purchase_cost  │   │  name           │   │  active         │       │
//! │  │  sale_price     │   │  active         │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │ PaymentMethod   │   │   ProductRef    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Cash   (1)     │   │  name, code     │       │
//! │  │  1800 = 18%     │   │  Yape   (2)     │   │  display only   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identities are integers assigned by the backend; this crate never
//! generates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Backend-assigned product identity.
pub type ProductId = i64;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (IGV)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the rate as a fraction: 1800 bps → 0.18.
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::TAX_RATE
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be purchased from a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier.
    pub id: ProductId,

    /// Business code shown next to the name.
    pub code: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Units currently in stock.
    #[serde(default)]
    pub stock: f64,

    /// Unit sale price (tax-inclusive).
    #[serde(default)]
    pub sale_price: f64,

    /// Unit purchase cost (tax-inclusive).
    #[serde(default)]
    pub purchase_cost: f64,

    #[serde(default)]
    pub category: Option<Category>,

    /// Image file name on the backend.
    #[serde(default)]
    pub image: Option<String>,

    /// Soft-delete flag.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Product {
    /// Unit price proposed when this product is added to a purchase.
    ///
    /// The purchase cost wins; the sale price is the fallback. Returns
    /// `None` when neither is positive.
    pub fn purchase_price(&self) -> Option<f64> {
        [self.purchase_cost, self.sale_price]
            .into_iter()
            .find(|price| price.is_finite() && *price > 0.0)
    }

    /// Returns the category id, if the product has one.
    #[inline]
    pub fn category_id(&self) -> Option<i64> {
        self.category.as_ref().map(|c| c.id)
    }
}

/// Display data carried on a basket line. Never used in arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub name: String,
    pub code: String,
}

impl From<&Product> for ProductRef {
    fn from(product: &Product) -> Self {
        ProductRef {
            name: product.name.clone(),
            code: product.code.clone(),
        }
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier purchases are made from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: i64,

    /// Taxpayer number (RUC), 11 digits.
    pub ruc: String,

    pub name: String,

    #[serde(default)]
    pub contact: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a purchase is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    /// Yape mobile wallet transfer.
    Yape,
}

impl PaymentMethod {
    /// Numeric code the backend stores for this method.
    pub const fn code(&self) -> u8 {
        match self {
            PaymentMethod::Cash => 1,
            PaymentMethod::Yape => 2,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Yape => write!(f, "yape"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "efectivo" => Ok(PaymentMethod::Cash),
            "yape" => Ok(PaymentMethod::Yape),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["cash".to_string(), "yape".to_string()],
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
