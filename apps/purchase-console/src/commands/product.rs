//! # Product Commands
//!
//! Product search and category listing for the purchase screen.

use stockroom_core::catalog::{filter_products, ProductFilter};
use stockroom_core::validation::validate_search_query;
use stockroom_core::{Category, Product};
use tracing::debug;

use crate::error::ApiError;
use crate::gateway::ProductCatalog;

/// Searches active products by name, code or description.
///
/// ## Arguments
/// * `query` - Search term, blank or absent lists everything
/// * `category_id` - Restrict to one category
///
/// ## Returns
/// Matching products in catalog order
pub async fn search_products(
    catalog: &dyn ProductCatalog,
    query: Option<String>,
    category_id: Option<i64>,
) -> Result<Vec<Product>, ApiError> {
    debug!(?query, ?category_id, "search_products command");

    let mut filter = match query.as_deref() {
        Some(query) => ProductFilter::term(validate_search_query(query)?),
        None => ProductFilter::default(),
    };
    if let Some(category_id) = category_id {
        filter = filter.in_category(category_id);
    }

    let products = catalog.products().await;
    Ok(filter_products(&products, &filter)
        .into_iter()
        .cloned()
        .collect())
}

/// Lists active categories for the search filter.
pub async fn list_categories(catalog: &dyn ProductCatalog) -> Vec<Category> {
    debug!("list_categories command");

    catalog
        .categories()
        .await
        .into_iter()
        .filter(|c| c.active)
        .collect()
}
