//! # Session State
//!
//! One purchase-entry session: the basket being built, the chosen supplier
//! and the payment details. Emptied after a successful submission.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  find_supplier_by_ruc ──► supplier = Some(..)                           │
//! │  add_to_basket ─────────► basket.add_line(..)                           │
//! │  set_purchase_details ──► payment_method, description                   │
//! │  submit_purchase ───────► build payload ──► gateway ──► reset()         │
//! │                                              │                          │
//! │                                              └─ failure: nothing reset  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use stockroom_core::purchase::build_purchase;
use stockroom_core::{BasketEngine, CoreResult, NewPurchase, PaymentMethod, Supplier, TaxRate};

/// Everything staff have entered for the purchase in progress.
#[derive(Debug, Clone)]
pub struct PurchaseSession {
    pub basket: BasketEngine,
    pub supplier: Option<Supplier>,
    pub payment_method: PaymentMethod,
    /// Free-text note, stored trimmed; empty means none.
    pub description: String,
    default_payment_method: PaymentMethod,
}

impl PurchaseSession {
    pub fn new(tax_rate: TaxRate, default_payment_method: PaymentMethod) -> Self {
        PurchaseSession {
            basket: BasketEngine::with_tax_rate(tax_rate),
            supplier: None,
            payment_method: default_payment_method,
            description: String::new(),
            default_payment_method,
        }
    }

    pub fn select_supplier(&mut self, supplier: Supplier) {
        self.supplier = Some(supplier);
    }

    pub fn clear_supplier(&mut self) {
        self.supplier = None;
    }

    /// Builds the submission payload without changing the session.
    pub fn build_purchase(&self) -> CoreResult<NewPurchase> {
        build_purchase(
            self.supplier.as_ref(),
            &self.basket,
            self.payment_method,
            &self.description,
        )
    }

    /// Starts over: empty basket, no supplier, default payment, no note.
    pub fn reset(&mut self) {
        self.basket.clear();
        self.supplier = None;
        self.payment_method = self.default_payment_method;
        self.description.clear();
    }
}

impl Default for PurchaseSession {
    fn default() -> Self {
        Self::new(stockroom_core::TAX_RATE, PaymentMethod::default())
    }
}

/// Shared handle to the current purchase session.
///
/// ## Thread Safety
/// `Arc<Mutex<_>>`: commands lock briefly and never hold the guard across
/// an `.await`. A poisoned lock is recovered since every mutation leaves
/// the basket consistent.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<PurchaseSession>>,
}

impl SessionState {
    pub fn new(tax_rate: TaxRate, default_payment_method: PaymentMethod) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(PurchaseSession::new(
                tax_rate,
                default_payment_method,
            ))),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = session.with_session(|s| s.basket.totals());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PurchaseSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PurchaseSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(stockroom_core::TAX_RATE, PaymentMethod::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::CoreError;

    fn supplier() -> Supplier {
        Supplier {
            id: 3,
            ruc: "20100070970".to_string(),
            name: "Molinos del Sur".to_string(),
            contact: None,
            phone: None,
            email: None,
            address: None,
            active: true,
        }
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = PurchaseSession::new(stockroom_core::TAX_RATE, PaymentMethod::Yape);
        session.select_supplier(supplier());
        session.basket.add_line(1, 2.0, 10.0, None);
        session.payment_method = PaymentMethod::Cash;
        session.description = "weekly order".to_string();

        session.reset();

        assert!(session.basket.is_empty());
        assert!(session.supplier.is_none());
        assert_eq!(session.payment_method, PaymentMethod::Yape);
        assert!(session.description.is_empty());
    }

    #[test]
    fn test_build_purchase_needs_supplier() {
        let mut session = PurchaseSession::default();
        session.basket.add_line(1, 1.0, 11.8, None);
        assert!(matches!(
            session.build_purchase(),
            Err(CoreError::SupplierNotSelected)
        ));

        session.select_supplier(supplier());
        let purchase = session.build_purchase().unwrap();
        assert_eq!(purchase.supplier_id, 3);
        assert_eq!(purchase.total, 11.8);
        // Building never mutates
        assert_eq!(session.basket.len(), 1);
    }

    #[test]
    fn test_state_shares_one_session() {
        let state = SessionState::default();
        let other = state.clone();

        state.with_session_mut(|s| {
            s.basket.add_line(9, 1.0, 5.0, None);
        });

        assert_eq!(other.with_session(|s| s.basket.len()), 1);
    }
}
