//! # Basket Commands
//!
//! Commands that build the purchase basket.
//!
//! ## Basket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Lifecycle                                     │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Basket│────►│ Preview  │────►│ Submitted│       │
//! │  │  Basket  │     │          │     │          │     │ Purchase │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_basket                     submit_purchase    │
//! │                   update_basket_quantity            (purchase.rs)      │
//! │                   update_basket_price                     │             │
//! │                   remove_from_basket                      │             │
//! │                        │                                  │             │
//! │                        ▼                                  ▼             │
//! │                   clear_basket ────────────────────► (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use stockroom_core::validation::{validate_quantity, validate_unit_price};
use stockroom_core::{
    AddOutcome, BasketEngine, BasketTotals, CoreError, LineItem, ProductId, ProductRef,
};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::gateway::ProductCatalog;
use crate::state::SessionState;

/// Basket response including lines and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketResponse {
    pub items: Vec<LineItem>,
    pub totals: BasketTotals,
}

impl From<&BasketEngine> for BasketResponse {
    fn from(basket: &BasketEngine) -> Self {
        BasketResponse {
            items: basket.snapshot(),
            totals: basket.totals(),
        }
    }
}

/// Gets the current basket contents.
///
/// ## Returns
/// Lines in insertion order with full-precision totals
pub fn get_basket(session: &SessionState) -> BasketResponse {
    debug!("get_basket command");
    session.with_session(|s| BasketResponse::from(&s.basket))
}

/// Adds a product to the basket.
///
/// ## Behavior
/// - Product already in the basket: quantity accumulates and the line takes
///   the new unit price
/// - Product not in the basket: appended as a new line
/// - No explicit `unit_price`: the product's purchase cost, falling back to
///   its sale price
/// - The merged quantity and the resolved price stay within
///   [`MAX_QUANTITY`](stockroom_core::MAX_QUANTITY) and
///   [`MAX_UNIT_PRICE`](stockroom_core::MAX_UNIT_PRICE)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Staff pick a product from the search results                          │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  {"command":"add_to_basket","args":{"productId":5,"quantity":2}}       │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  1. Validate quantity (and price when given)                   │    │
/// │  │  2. Fetch product from the catalog, must be active             │    │
/// │  │  3. Resolve the unit price                                     │    │
/// │  │  4. Merge into / append to the basket                          │    │
/// │  │  5. Return updated basket                                      │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Arguments
/// * `product_id` - Catalog product id
/// * `quantity` - Quantity to add (default: 1)
/// * `unit_price` - Tax-inclusive unit price override
pub async fn add_to_basket(
    catalog: &dyn ProductCatalog,
    session: &SessionState,
    product_id: ProductId,
    quantity: Option<f64>,
    unit_price: Option<f64>,
) -> Result<BasketResponse, ApiError> {
    let quantity = quantity.unwrap_or(1.0);
    debug!(product_id, quantity, ?unit_price, "add_to_basket command");

    validate_quantity(quantity)?;
    if let Some(price) = unit_price {
        validate_unit_price(price)?;
    }

    let product = catalog
        .product(product_id)
        .await
        .ok_or(CoreError::ProductNotFound(product_id))?;

    if !product.active {
        return Err(CoreError::ProductInactive(product_id).into());
    }

    let unit_price = match unit_price.or_else(|| product.purchase_price()) {
        Some(price) => price,
        None => return Err(CoreError::MissingPurchasePrice { product_id }.into()),
    };
    validate_unit_price(unit_price)?;

    if let Some(current) = session.with_session(|s| s.basket.line(product_id).map(|l| l.quantity)) {
        validate_quantity(current + quantity)?;
    }

    session.with_session_mut(|s| {
        match s
            .basket
            .add_line(product_id, quantity, unit_price, Some(ProductRef::from(&product)))
        {
            AddOutcome::Inserted => debug!(product_id, "Basket line added"),
            AddOutcome::Merged => debug!(product_id, unit_price, "Basket line merged"),
            AddOutcome::Ignored => warn!(product_id, "Basket ignored out-of-range input"),
        }
        Ok(BasketResponse::from(&s.basket))
    })
}

/// Sets the quantity of a basket line.
///
/// ## Errors
/// - Validation error for a quantity that is not a positive number
/// - Not found when the product has no line in the basket
pub fn update_basket_quantity(
    session: &SessionState,
    product_id: ProductId,
    quantity: f64,
) -> Result<BasketResponse, ApiError> {
    debug!(product_id, quantity, "update_basket_quantity command");

    validate_quantity(quantity)?;

    session.with_session_mut(|s| {
        if !s.basket.set_quantity(product_id, quantity) {
            return Err(ApiError::not_found("Basket line", product_id));
        }
        Ok(BasketResponse::from(&s.basket))
    })
}

/// Sets the unit price of a basket line. Same rules as
/// [`update_basket_quantity`].
pub fn update_basket_price(
    session: &SessionState,
    product_id: ProductId,
    unit_price: f64,
) -> Result<BasketResponse, ApiError> {
    debug!(product_id, unit_price, "update_basket_price command");

    validate_unit_price(unit_price)?;

    session.with_session_mut(|s| {
        if !s.basket.set_price(product_id, unit_price) {
            return Err(ApiError::not_found("Basket line", product_id));
        }
        Ok(BasketResponse::from(&s.basket))
    })
}

/// Removes a product's line. Removing an absent product is a no-op.
pub fn remove_from_basket(session: &SessionState, product_id: ProductId) -> BasketResponse {
    debug!(product_id, "remove_from_basket command");

    session.with_session_mut(|s| {
        if !s.basket.remove_line(product_id) {
            debug!(product_id, "Nothing to remove");
        }
        BasketResponse::from(&s.basket)
    })
}

/// Empties the basket. Supplier and payment details are kept.
pub fn clear_basket(session: &SessionState) -> BasketResponse {
    debug!("clear_basket command");

    session.with_session_mut(|s| {
        s.basket.clear();
        BasketResponse::from(&s.basket)
    })
}
