//! # Console Commands
//!
//! Every command the frontend can send over the JSON-lines channel.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── basket.rs    ◄─── Basket manipulation
//! ├── product.rs   ◄─── Product search, categories
//! ├── supplier.rs  ◄─── Supplier lookup and selection
//! ├── purchase.rs  ◄─── Details, preview, submission
//! ├── history.rs   ◄─── Submitted purchase listing and search
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs, the same way
//! [`crate::dispatch`] hands it over:
//! ```rust,ignore
//! // Only needs the session
//! fn get_basket(session: &SessionState) -> BasketResponse
//!
//! // Needs the catalog and the session
//! async fn add_to_basket(catalog: &dyn ProductCatalog, session: &SessionState, ...)
//! ```

pub mod basket;
pub mod config;
pub mod history;
pub mod product;
pub mod purchase;
pub mod supplier;
