//! # Purchase Basket
//!
//! The basket engine behind the purchase-entry screen: line items keyed by
//! product, tax-inclusive prices, per-line tax decomposition and totals.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Operations                                    │
//! │                                                                         │
//! │  Caller Action            Engine Call             Basket Change         │
//! │  ─────────────            ───────────             ─────────────         │
//! │                                                                         │
//! │  Add product ───────────► add_line() ───────────► insert or merge       │
//! │                                                   (qty += n, price =)  │
//! │                                                                         │
//! │  Edit quantity ─────────► set_quantity() ───────► lines[i].qty = n     │
//! │                                                   (n <= 0: ignored)    │
//! │                                                                         │
//! │  Edit price ────────────► set_price() ──────────► lines[i].price = p   │
//! │                                                   (p <= 0: ignored)    │
//! │                                                                         │
//! │  Remove ────────────────► remove_line() ────────► lines.remove(i)      │
//! │                                                                         │
//! │  Submit / Abandon ──────► clear() ──────────────► lines.clear()        │
//! │                                                                         │
//! │  Every change recomputes line_total, tax_base and tax_amount for the   │
//! │  touched line from its current quantity and unit price.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per `product_id`
//! - `quantity > 0` and `unit_price > 0` for every line reached through
//!   the setters
//! - `line_total == tax_base + tax_amount` (within floating-point tolerance)
//! - Every line value and every aggregate is finite; a change that would
//!   overflow one is ignored
//! - No rounding between operations; see [`crate::money`]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::money::{round_currency, TaxSplit};
use crate::purchase::PurchaseLine;
use crate::types::{ProductId, ProductRef, TaxRate};

// =============================================================================
// Line Item
// =============================================================================

/// One product in the basket.
///
/// Derived fields are only ever written by the engine. A `LineItem` obtained
/// from [`BasketEngine::snapshot`] is a detached copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: f64,
    /// Tax-inclusive price per unit.
    pub unit_price: f64,
    /// Tax-exclusive part of `line_total`.
    pub tax_base: f64,
    /// Tax part of `line_total`.
    pub tax_amount: f64,
    /// `quantity × unit_price`.
    pub line_total: f64,
    pub product_ref: Option<ProductRef>,
}

impl LineItem {
    fn new(
        product_id: ProductId,
        quantity: f64,
        unit_price: f64,
        product_ref: Option<ProductRef>,
        rate: TaxRate,
    ) -> Self {
        let mut line = LineItem {
            product_id,
            quantity,
            unit_price,
            tax_base: 0.0,
            tax_amount: 0.0,
            line_total: 0.0,
            product_ref,
        };
        line.recompute(rate);
        line
    }

    fn recompute(&mut self, rate: TaxRate) {
        let split = TaxSplit::from_inclusive(self.quantity * self.unit_price, rate);
        self.line_total = split.total;
        self.tax_base = split.base;
        self.tax_amount = split.tax;
    }
}

/// What [`BasketEngine::add_line`] did with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Inserted,
    /// An existing line absorbed the quantity and took the new price.
    Merged,
    /// Input was not finite, or the resulting line or basket total would
    /// overflow; the basket is unchanged.
    Ignored,
}

// =============================================================================
// Basket Engine
// =============================================================================

/// Owns one basket for one purchase-entry session.
///
/// There is no shared instance: every session constructs its own engine.
/// Lines keep insertion order; `index` maps a product id to its position so
/// each operation is a single lookup followed by insert-or-update.
#[derive(Debug, Clone)]
pub struct BasketEngine {
    lines: Vec<LineItem>,
    index: HashMap<ProductId, usize>,
    tax_rate: TaxRate,
}

impl BasketEngine {
    /// Creates an empty basket at the standard 18% rate.
    pub fn new() -> Self {
        Self::with_tax_rate(crate::TAX_RATE)
    }

    /// Creates an empty basket at a configured rate.
    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        BasketEngine {
            lines: Vec::new(),
            index: HashMap::new(),
            tax_rate,
        }
    }

    /// Rate used for every line in this basket.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Adds a product or merges it into its existing line.
    ///
    /// ## Behavior
    /// - Product already present: quantity accumulates, `unit_price` is
    ///   replaced by the new value (the previous price is lost), the
    ///   existing `product_ref` is kept
    /// - Product not present: appended as a new line
    ///
    /// Callers validate `quantity > 0` and `unit_price > 0` beforehand (see
    /// [`crate::validation`]); only non-finite input, or input whose line
    /// total would not be finite, is rejected here.
    pub fn add_line(
        &mut self,
        product_id: ProductId,
        quantity: f64,
        unit_price: f64,
        product_ref: Option<ProductRef>,
    ) -> AddOutcome {
        if !quantity.is_finite() || !unit_price.is_finite() {
            return AddOutcome::Ignored;
        }

        let rate = self.tax_rate;
        match self.index.get(&product_id).copied() {
            Some(pos) => {
                let merged = self.lines[pos].quantity + quantity;
                if !self.stays_finite(Some(pos), merged, unit_price) {
                    return AddOutcome::Ignored;
                }
                let line = &mut self.lines[pos];
                line.quantity = merged;
                line.unit_price = unit_price;
                line.recompute(rate);
                AddOutcome::Merged
            }
            None => {
                if !self.stays_finite(None, quantity, unit_price) {
                    return AddOutcome::Ignored;
                }
                self.index.insert(product_id, self.lines.len());
                self.lines
                    .push(LineItem::new(product_id, quantity, unit_price, product_ref, rate));
                AddOutcome::Inserted
            }
        }
    }

    /// Removes the line for `product_id`. Returns `false` if it was absent.
    pub fn remove_line(&mut self, product_id: ProductId) -> bool {
        let Some(pos) = self.index.remove(&product_id) else {
            return false;
        };
        self.lines.remove(pos);
        for line in &self.lines[pos..] {
            if let Some(slot) = self.index.get_mut(&line.product_id) {
                *slot -= 1;
            }
        }
        true
    }

    /// Sets the quantity of an existing line.
    ///
    /// Non-positive or non-finite quantities leave the basket unchanged, as
    /// do an unknown product and a quantity whose line total would overflow.
    /// Returns whether the change was applied.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: f64) -> bool {
        if !is_positive(quantity) {
            return false;
        }
        self.update(product_id, |line| (quantity, line.unit_price))
    }

    /// Sets the unit price of an existing line. Same gate as
    /// [`set_quantity`](Self::set_quantity).
    pub fn set_price(&mut self, product_id: ProductId, unit_price: f64) -> bool {
        if !is_positive(unit_price) {
            return false;
        }
        self.update(product_id, |line| (line.quantity, unit_price))
    }

    /// Replaces a line's `(quantity, unit_price)` with the pair `next`
    /// computes from it.
    fn update<F>(&mut self, product_id: ProductId, next: F) -> bool
    where
        F: FnOnce(&LineItem) -> (f64, f64),
    {
        let rate = self.tax_rate;
        let Some(pos) = self.index.get(&product_id).copied() else {
            return false;
        };

        let (quantity, unit_price) = next(&self.lines[pos]);
        if !self.stays_finite(Some(pos), quantity, unit_price) {
            return false;
        }

        let line = &mut self.lines[pos];
        line.quantity = quantity;
        line.unit_price = unit_price;
        line.recompute(rate);
        true
    }

    /// Whether a line at `quantity × unit_price`, standing in for the line at
    /// `replacing`, keeps the line and the basket aggregates finite.
    fn stays_finite(&self, replacing: Option<usize>, quantity: f64, unit_price: f64) -> bool {
        let line_total = quantity * unit_price;
        if !quantity.is_finite() || !line_total.is_finite() {
            return false;
        }

        let (old_total, old_quantity) = replacing
            .map(|pos| (self.lines[pos].line_total, self.lines[pos].quantity))
            .unwrap_or((0.0, 0.0));

        (self.total_amount() - old_total + line_total).is_finite()
            && (self.total_quantity() - old_quantity + quantity).is_finite()
    }

    /// Returns an independent copy of the lines in insertion order.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.lines.clone()
    }

    /// Borrowed view of the lines in insertion order.
    #[inline]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Looks up the line for a product.
    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.index.get(&product_id).map(|&pos| &self.lines[pos])
    }

    /// Empties the basket.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.index.clear();
    }

    /// Number of distinct products.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `line_total` over all lines.
    pub fn total_amount(&self) -> f64 {
        self.lines.iter().map(|l| l.line_total).sum()
    }

    /// Sum of `tax_base` over all lines.
    pub fn total_tax_base(&self) -> f64 {
        self.lines.iter().map(|l| l.tax_base).sum()
    }

    /// Sum of `tax_amount` over all lines.
    pub fn total_tax_amount(&self) -> f64 {
        self.lines.iter().map(|l| l.tax_amount).sum()
    }

    /// Sum of quantities (units, not distinct products).
    pub fn total_quantity(&self) -> f64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Summary of the aggregates at full precision.
    pub fn totals(&self) -> BasketTotals {
        BasketTotals::from(self)
    }

    /// Ordered `(product, quantity, unit price)` triples for submission,
    /// with the price rounded to currency precision.
    pub fn submission_lines(&self) -> Vec<PurchaseLine> {
        self.lines
            .iter()
            .map(|l| PurchaseLine {
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: round_currency(l.unit_price),
            })
            .collect()
    }
}

impl Default for BasketEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Basket aggregates for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BasketTotals {
    pub item_count: usize,
    pub total_quantity: f64,
    pub tax_base: f64,
    pub tax_amount: f64,
    pub total: f64,
}

impl From<&BasketEngine> for BasketTotals {
    fn from(basket: &BasketEngine) -> Self {
        BasketTotals {
            item_count: basket.len(),
            total_quantity: basket.total_quantity(),
            tax_base: basket.total_tax_base(),
            tax_amount: basket.total_tax_amount(),
            total: basket.total_amount(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
