//! Basket invariants over random operation sequences.

use proptest::prelude::*;
use stockroom_core::basket::BasketEngine;
use stockroom_core::purchase::build_purchase;
use stockroom_core::{CoreError, PaymentMethod, Supplier, MAX_QUANTITY, MAX_UNIT_PRICE};

#[derive(Debug, Clone)]
enum Op {
    Add { id: i64, qty: f64, price: f64 },
    Remove { id: i64 },
    SetQuantity { id: i64, qty: f64 },
    SetPrice { id: i64, price: f64 },
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    // A small id space so merges, removals and updates hit existing lines
    let id = 1i64..8;
    let qty = 0.001f64..500.0;
    let price = 0.01f64..5_000.0;

    prop_oneof![
        4 => (id.clone(), qty.clone(), price.clone())
            .prop_map(|(id, qty, price)| Op::Add { id, qty, price }),
        1 => id.clone().prop_map(|id| Op::Remove { id }),
        2 => (id.clone(), -10.0f64..500.0).prop_map(|(id, qty)| Op::SetQuantity { id, qty }),
        2 => (id, -10.0f64..5_000.0).prop_map(|(id, price)| Op::SetPrice { id, price }),
        1 => Just(Op::Clear),
    ]
}

/// Values at and past the accepted bounds, up to the edge of `f64`.
fn large_op() -> impl Strategy<Value = Op> {
    let id = 1i64..8;
    let qty = prop_oneof![
        3 => 1.0f64..=MAX_QUANTITY,
        1 => 1e150f64..1e300,
    ];
    let price = prop_oneof![
        3 => 1.0f64..=MAX_UNIT_PRICE,
        1 => 1e250f64..f64::MAX,
    ];

    prop_oneof![
        4 => (id.clone(), qty.clone(), price.clone())
            .prop_map(|(id, qty, price)| Op::Add { id, qty, price }),
        1 => id.clone().prop_map(|id| Op::Remove { id }),
        2 => (id.clone(), qty).prop_map(|(id, qty)| Op::SetQuantity { id, qty }),
        2 => (id, price).prop_map(|(id, price)| Op::SetPrice { id, price }),
    ]
}

fn supplier() -> Supplier {
    Supplier {
        id: 1,
        ruc: "20100070970".to_string(),
        name: "Molinos del Sur".to_string(),
        contact: None,
        phone: None,
        email: None,
        address: None,
        active: true,
    }
}

fn apply(basket: &mut BasketEngine, op: &Op) {
    match *op {
        Op::Add { id, qty, price } => {
            basket.add_line(id, qty, price, None);
        }
        Op::Remove { id } => {
            basket.remove_line(id);
        }
        Op::SetQuantity { id, qty } => {
            basket.set_quantity(id, qty);
        }
        Op::SetPrice { id, price } => {
            basket.set_price(id, price);
        }
        Op::Clear => basket.clear(),
    }
}

proptest! {
    #[test]
    fn totals_always_balance(ops in prop::collection::vec(op(), 1..60)) {
        let mut basket = BasketEngine::new();
        for op in &ops {
            apply(&mut basket, op);

            let total = basket.total_amount();
            let split = basket.total_tax_base() + basket.total_tax_amount();
            // Relative tolerance: totals reach millions with these ranges
            prop_assert!((total - split).abs() <= 1e-9 * total.abs().max(1.0));

            for line in basket.lines() {
                prop_assert!(line.quantity > 0.0);
                prop_assert!(line.unit_price > 0.0);
                prop_assert!((line.line_total - line.quantity * line.unit_price).abs()
                    <= 1e-9 * line.line_total.abs().max(1.0));
            }
        }
    }

    #[test]
    fn product_ids_stay_unique(ops in prop::collection::vec(op(), 1..60)) {
        let mut basket = BasketEngine::new();
        for op in &ops {
            apply(&mut basket, op);
        }

        let mut ids: Vec<_> = basket.lines().iter().map(|l| l.product_id).collect();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), len);

        for id in ids {
            prop_assert_eq!(basket.line(id).map(|l| l.product_id), Some(id));
        }
    }

    #[test]
    fn snapshot_does_not_alias(ops in prop::collection::vec(op(), 1..30)) {
        let mut basket = BasketEngine::new();
        for op in &ops {
            apply(&mut basket, op);
        }

        let before = basket.snapshot();
        let mut copy = basket.snapshot();
        for line in copy.iter_mut() {
            line.quantity *= 2.0;
        }
        copy.clear();

        prop_assert_eq!(basket.snapshot(), before);
    }

    #[test]
    fn bounded_magnitudes_balance(ops in prop::collection::vec(large_op(), 1..40)) {
        let mut basket = BasketEngine::new();
        for op in ops.iter().filter(|op| within_bounds(op)) {
            apply(&mut basket, op);

            let total = basket.total_amount();
            let split = basket.total_tax_base() + basket.total_tax_amount();
            prop_assert!(total.is_finite());
            prop_assert!((total - split).abs() <= 1e-9 * total.abs().max(1.0));
        }
    }

    #[test]
    fn huge_values_never_overflow(ops in prop::collection::vec(large_op(), 1..40)) {
        let mut basket = BasketEngine::new();
        for op in &ops {
            apply(&mut basket, op);

            prop_assert!(basket.total_amount().is_finite());
            prop_assert!(basket.total_tax_base().is_finite());
            prop_assert!(basket.total_tax_amount().is_finite());
            prop_assert!(basket.total_quantity().is_finite());
            for line in basket.lines() {
                prop_assert!(line.line_total.is_finite());
                prop_assert!(line.tax_base.is_finite());
                prop_assert!(line.tax_amount.is_finite());
            }
        }
    }

    #[test]
    fn non_empty_purchase_never_totals_zero(
        small in prop::collection::vec(op(), 0..20),
        large in prop::collection::vec(large_op(), 0..20),
    ) {
        let mut basket = BasketEngine::new();
        for op in small.iter().chain(&large) {
            apply(&mut basket, op);
        }
        prop_assume!(!basket.is_empty());

        match build_purchase(Some(&supplier()), &basket, PaymentMethod::Cash, "") {
            Ok(purchase) => {
                prop_assert!(purchase.total.is_finite());
                prop_assert!(purchase.total > 0.0);
                prop_assert!(purchase.tax_base.is_finite());
                prop_assert!(purchase.tax_amount.is_finite());
            }
            Err(CoreError::InvalidAmount { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

fn within_bounds(op: &Op) -> bool {
    match *op {
        Op::Add { qty, price, .. } => qty <= MAX_QUANTITY && price <= MAX_UNIT_PRICE,
        Op::SetQuantity { qty, .. } => qty <= MAX_QUANTITY,
        Op::SetPrice { price, .. } => price <= MAX_UNIT_PRICE,
        Op::Remove { .. } | Op::Clear => true,
    }
}
