//! # Catalog Helpers
//!
//! Product search and supplier lookup over catalog records already in
//! memory. Fetching those records is the console's job.
//!
//! ## Product Search
//! ```text
//! products ──► active only ──► term matches name/code/description ──►
//!              category matches (when given) ──► results (catalog order)
//! ```

use crate::types::{Product, Supplier};

/// Criteria for [`filter_products`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of name, code or description.
    pub term: Option<String>,
    pub category_id: Option<i64>,
}

impl ProductFilter {
    /// Filter by search term only. Blank terms match everything.
    pub fn term(term: impl Into<String>) -> Self {
        ProductFilter {
            term: Some(term.into()),
            category_id: None,
        }
    }

    /// Restricts the filter to one category.
    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Checks a single product against the filter. Inactive products never match.
    pub fn matches(&self, product: &Product) -> bool {
        if !product.active {
            return false;
        }

        if let Some(category_id) = self.category_id {
            if product.category_id() != Some(category_id) {
                return false;
            }
        }

        let term = match self.term.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };

        product.name.to_lowercase().contains(&term)
            || product.code.to_lowercase().contains(&term)
            || product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}

/// Returns the products matching `filter`, in catalog order.
pub fn filter_products<'a>(products: &'a [Product], filter: &ProductFilter) -> Vec<&'a Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}

/// Returns suppliers that have not been deactivated.
pub fn active_suppliers(suppliers: &[Supplier]) -> Vec<&Supplier> {
    suppliers.iter().filter(|s| s.active).collect()
}

/// Finds a supplier by RUC (exact match after trimming).
pub fn find_supplier_by_ruc<'a>(suppliers: &'a [Supplier], ruc: &str) -> Option<&'a Supplier> {
    let ruc = ruc.trim();
    suppliers.iter().find(|s| s.ruc == ruc)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn category(id: i64) -> Option<Category> {
        Some(Category {
            id,
            name: format!("Category {}", id),
            description: None,
            active: true,
        })
    }

    fn product(id: i64, code: &str, name: &str, category_id: i64, active: bool) -> Product {
        Product {
            id,
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            stock: 0.0,
            sale_price: 5.0,
            purchase_cost: 4.0,
            category: category(category_id),
            image: None,
            active,
        }
    }

    fn catalog() -> Vec<Product> {
        let mut with_description = product(3, "ACE-01", "Aceite vegetal", 2, true);
        with_description.description = Some("Botella de 1L, marca Primor".to_string());

        vec![
            product(1, "ARZ-05", "Arroz extra 5kg", 1, true),
            product(2, "AZU-01", "Azucar rubia", 1, true),
            with_description,
            product(4, "ARZ-01", "Arroz superior 1kg", 1, false),
        ]
    }

    fn ids(products: Vec<&Product>) -> Vec<i64> {
        products.into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_empty_filter_returns_active_products() {
        let catalog = catalog();
        assert_eq!(ids(filter_products(&catalog, &ProductFilter::default())), vec![1, 2, 3]);
        assert_eq!(ids(filter_products(&catalog, &ProductFilter::term("  "))), vec![1, 2, 3]);
    }

    #[test]
    fn test_term_matches_name_code_and_description() {
        let catalog = catalog();
        assert_eq!(ids(filter_products(&catalog, &ProductFilter::term("ARROZ"))), vec![1]);
        assert_eq!(ids(filter_products(&catalog, &ProductFilter::term("azu-"))), vec![2]);
        assert_eq!(ids(filter_products(&catalog, &ProductFilter::term("primor"))), vec![3]);
    }

    #[test]
    fn test_category_filter() {
        let catalog = catalog();
        let filter = ProductFilter::default().in_category(2);
        assert_eq!(ids(filter_products(&catalog, &filter)), vec![3]);

        let filter = ProductFilter::term("a").in_category(1);
        assert_eq!(ids(filter_products(&catalog, &filter)), vec![1, 2]);
    }

    #[test]
    fn test_supplier_lookup() {
        let suppliers = vec![
            Supplier {
                id: 1,
                ruc: "20123456789".to_string(),
                name: "Norte SAC".to_string(),
                contact: None,
                phone: None,
                email: None,
                address: None,
                active: true,
            },
            Supplier {
                id: 2,
                ruc: "20987654321".to_string(),
                name: "Sur EIRL".to_string(),
                contact: None,
                phone: None,
                email: None,
                address: None,
                active: false,
            },
        ];

        assert_eq!(find_supplier_by_ruc(&suppliers, " 20987654321").map(|s| s.id), Some(2));
        assert!(find_supplier_by_ruc(&suppliers, "11111111111").is_none());
        assert_eq!(active_suppliers(&suppliers).len(), 1);
    }
}
