//! # Supplier Commands
//!
//! Supplier lookup and selection for the current purchase.
//!
//! ## User Workflow
//! ```text
//! Staff type the supplier RUC ──► find_supplier_by_ruc
//!      │
//!      ├── 11 digits, known, active ──► selected on the session
//!      ├── wrong format ──────────────► VALIDATION_ERROR
//!      ├── unknown ───────────────────► NOT_FOUND
//!      └── deactivated ───────────────► BUSINESS_LOGIC
//! ```

use stockroom_core::catalog::active_suppliers;
use stockroom_core::validation::validate_ruc;
use stockroom_core::{CoreError, Supplier};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::gateway::ProductCatalog;
use crate::state::SessionState;

/// Looks a supplier up by RUC and selects it for the purchase.
pub async fn find_supplier_by_ruc(
    catalog: &dyn ProductCatalog,
    session: &SessionState,
    ruc: String,
) -> Result<Supplier, ApiError> {
    debug!(ruc = %ruc, "find_supplier_by_ruc command");

    let ruc = validate_ruc(&ruc)?;
    let supplier = catalog
        .supplier_by_ruc(&ruc)
        .await
        .ok_or(CoreError::SupplierNotFound(ruc))?;

    select(session, supplier)
}

/// Lists suppliers that can be purchased from.
pub async fn list_suppliers(catalog: &dyn ProductCatalog) -> Vec<Supplier> {
    debug!("list_suppliers command");

    let suppliers = catalog.suppliers().await;
    active_suppliers(&suppliers).into_iter().cloned().collect()
}

/// Selects a supplier by id.
pub async fn select_supplier(
    catalog: &dyn ProductCatalog,
    session: &SessionState,
    supplier_id: i64,
) -> Result<Supplier, ApiError> {
    debug!(supplier_id, "select_supplier command");

    let supplier = catalog
        .supplier(supplier_id)
        .await
        .ok_or_else(|| CoreError::SupplierNotFound(supplier_id.to_string()))?;

    select(session, supplier)
}

/// Drops the selected supplier. The basket is kept.
pub fn clear_supplier(session: &SessionState) {
    debug!("clear_supplier command");
    session.with_session_mut(|s| s.clear_supplier());
}

fn select(session: &SessionState, supplier: Supplier) -> Result<Supplier, ApiError> {
    if !supplier.active {
        return Err(CoreError::SupplierInactive { ruc: supplier.ruc }.into());
    }

    info!(supplier_id = supplier.id, ruc = %supplier.ruc, "Supplier selected");
    session.with_session_mut(|s| s.select_supplier(supplier.clone()));
    Ok(supplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_find_by_ruc_selects() {
        let catalog = testing::catalog();
        let session = SessionState::default();

        let supplier = find_supplier_by_ruc(&catalog, &session, " 20100070970 ".into())
            .await
            .unwrap();
        assert_eq!(supplier.id, 7);
        assert_eq!(session.with_session(|s| s.supplier.as_ref().map(|s| s.id)), Some(7));

        clear_supplier(&session);
        assert!(session.with_session(|s| s.supplier.is_none()));
    }

    #[tokio::test]
    async fn test_find_by_ruc_errors() {
        let catalog = testing::catalog();
        let session = SessionState::default();

        let err = find_supplier_by_ruc(&catalog, &session, "2010007097".into())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = find_supplier_by_ruc(&catalog, &session, "20999999999".into())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = find_supplier_by_ruc(&catalog, &session, "20555555551".into())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        assert!(session.with_session(|s| s.supplier.is_none()));
    }

    #[tokio::test]
    async fn test_select_and_list() {
        let catalog = testing::catalog();
        let session = SessionState::default();

        assert_eq!(list_suppliers(&catalog).await.len(), 1);

        select_supplier(&catalog, &session, 7).await.unwrap();
        let err = select_supplier(&catalog, &session, 70).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        // A failed selection keeps the previous supplier
        assert_eq!(session.with_session(|s| s.supplier.as_ref().map(|s| s.id)), Some(7));
    }
}
