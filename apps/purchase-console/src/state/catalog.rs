//! # Catalog State
//!
//! Products, categories and suppliers loaded from a JSON file at startup.
//!
//! ## Catalog File Format
//! ```json
//! {
//!   "categories": [{ "id": 1, "name": "Abarrotes" }],
//!   "products": [{ "id": 5, "code": "P005", "name": "Arroz 5kg",
//!                  "salePrice": 25.0, "purchaseCost": 21.5 }],
//!   "suppliers": [{ "id": 3, "ruc": "20100070970", "name": "Molinos del Sur" }]
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stockroom_core::catalog::find_supplier_by_ruc;
use stockroom_core::{Category, Product, ProductId, Supplier};
use tracing::{info, warn};

use crate::error::StartupError;
use crate::gateway::ProductCatalog;

/// On-disk shape of the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
}

/// In-memory catalog. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    categories: Vec<Category>,
    products: Vec<Product>,
    suppliers: Vec<Supplier>,
}

impl CatalogState {
    pub fn new(file: CatalogFile) -> Self {
        CatalogState {
            categories: file.categories,
            products: file.products,
            suppliers: file.suppliers,
        }
    }

    /// Loads the catalog file.
    ///
    /// A missing file yields an empty catalog; a malformed one is an error.
    pub async fn load(path: &Path) -> Result<Self, StartupError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(?path, "Catalog file not found, starting with an empty catalog");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let file: CatalogFile = serde_json::from_str(&contents)
            .map_err(|e| StartupError::Catalog(format!("{}: {}", path.display(), e)))?;

        info!(
            ?path,
            products = file.products.len(),
            suppliers = file.suppliers.len(),
            categories = file.categories.len(),
            "Catalog loaded"
        );

        Ok(Self::new(file))
    }
}

#[async_trait]
impl ProductCatalog for CatalogState {
    async fn product(&self, id: ProductId) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    async fn products(&self) -> Vec<Product> {
        self.products.clone()
    }

    async fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    async fn supplier(&self, id: i64) -> Option<Supplier> {
        self.suppliers.iter().find(|s| s.id == id).cloned()
    }

    async fn supplier_by_ruc(&self, ruc: &str) -> Option<Supplier> {
        find_supplier_by_ruc(&self.suppliers, ruc).cloned()
    }

    async fn suppliers(&self) -> Vec<Supplier> {
        self.suppliers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "categories": [{ "id": 1, "name": "Abarrotes" }],
        "products": [
            { "id": 5, "code": "P005", "name": "Arroz 5kg", "salePrice": 25.0,
              "purchaseCost": 21.5, "category": { "id": 1, "name": "Abarrotes" } }
        ],
        "suppliers": [{ "id": 3, "ruc": "20100070970", "name": "Molinos del Sur" }]
    }"#;

    #[tokio::test]
    async fn test_load_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, CATALOG).unwrap();

        let catalog = CatalogState::load(&path).await.unwrap();

        let product = catalog.product(5).await.unwrap();
        assert_eq!(product.purchase_price(), Some(21.5));
        assert!(product.active);
        assert!(catalog.product(6).await.is_none());

        let supplier = catalog.supplier_by_ruc(" 20100070970 ").await.unwrap();
        assert_eq!(supplier.id, 3);
        assert_eq!(catalog.supplier(3).await.map(|s| s.name), Some(supplier.name));
        assert_eq!(catalog.categories().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = CatalogState::load(&dir.path().join("missing.json"))
            .await
            .unwrap();
        assert!(catalog.products().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{ \"products\": 7 }").unwrap();

        let err = CatalogState::load(&path).await.unwrap_err();
        assert!(matches!(err, StartupError::Catalog(_)));
    }
}
