//! # Command Dispatch
//!
//! Routes one JSON request line to its command and wraps the outcome in a
//! JSON response line.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin                                                                  │
//! │  {"id":1,"command":"add_to_basket","args":{"productId":5,"quantity":2}} │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  App::handle_line ──► parse ──► route by name ──► command fn           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stdout                                                                 │
//! │  {"id":1,"ok":true,"data":{"items":[...],"totals":{...}}}               │
//! │  {"id":2,"ok":false,"error":{"code":"NOT_FOUND","message":"..."}}       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Argument names are camelCase, as the frontend sends them.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stockroom_core::ProductId;
use tracing::debug;

use crate::commands::{basket, config, history, product, purchase, supplier};
use crate::error::{ApiError, ErrorCode};
use crate::gateway::{ProductCatalog, PurchaseGateway, PurchaseHistory};
use crate::state::{ConfigState, SessionState};

/// One command request.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Echoed back untouched so the frontend can correlate replies.
    #[serde(default)]
    pub id: Option<Value>,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// One command response.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    fn from_result(id: Option<Value>, result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Response {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Response {
                id,
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

// =============================================================================
// Command Arguments
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToBasketArgs {
    product_id: ProductId,
    quantity: Option<f64>,
    unit_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantityArgs {
    product_id: ProductId,
    quantity: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceArgs {
    product_id: ProductId,
    unit_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductArgs {
    product_id: ProductId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchArgs {
    query: Option<String>,
    category_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RucArgs {
    ruc: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SupplierArgs {
    supplier_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DetailsArgs {
    payment_method: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HistorySearchArgs {
    from: Option<String>,
    to: Option<String>,
    reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReferenceArgs {
    reference: String,
}

/// Decodes command arguments. Missing `args` reads as an empty object.
fn args<T: DeserializeOwned>(command: &str, value: Value) -> Result<T, ApiError> {
    let value = match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|e| ApiError::validation(format!("Invalid arguments for {}: {}", command, e)))
}

fn data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("Failed to serialize response: {}", e)))
}

// =============================================================================
// App
// =============================================================================

/// Everything a command can be handed.
#[derive(Clone)]
pub struct App {
    pub config: ConfigState,
    pub session: SessionState,
    pub catalog: Arc<dyn ProductCatalog>,
    pub gateway: Arc<dyn PurchaseGateway>,
    pub history: Arc<dyn PurchaseHistory>,
}

impl App {
    pub fn new(
        config: ConfigState,
        catalog: Arc<dyn ProductCatalog>,
        gateway: Arc<dyn PurchaseGateway>,
        history: Arc<dyn PurchaseHistory>,
    ) -> Self {
        let session = SessionState::new(config.tax_rate(), config.default_payment_method);
        App {
            config,
            session,
            catalog,
            gateway,
            history,
        }
    }

    /// Handles one raw input line. Malformed JSON yields an error response
    /// without an id.
    pub async fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => Response::from_result(
                None,
                Err(ApiError::validation(format!("Malformed request: {}", e))),
            ),
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        let Request { id, command, args } = request;
        debug!(command = %command, "Dispatching command");
        let result = self.route(&command, args).await;
        Response::from_result(id, result)
    }

    async fn route(&self, command: &str, raw: Value) -> Result<Value, ApiError> {
        let catalog = self.catalog.as_ref();
        let session = &self.session;

        match command {
            // Basket commands
            "get_basket" => data(basket::get_basket(session)),
            "add_to_basket" => {
                let a: AddToBasketArgs = args(command, raw)?;
                let response =
                    basket::add_to_basket(catalog, session, a.product_id, a.quantity, a.unit_price)
                        .await?;
                data(response)
            }
            "update_basket_quantity" => {
                let a: QuantityArgs = args(command, raw)?;
                data(basket::update_basket_quantity(session, a.product_id, a.quantity)?)
            }
            "update_basket_price" => {
                let a: PriceArgs = args(command, raw)?;
                data(basket::update_basket_price(session, a.product_id, a.unit_price)?)
            }
            "remove_from_basket" => {
                let a: ProductArgs = args(command, raw)?;
                data(basket::remove_from_basket(session, a.product_id))
            }
            "clear_basket" => data(basket::clear_basket(session)),

            // Product commands
            "search_products" => {
                let a: SearchArgs = args(command, raw)?;
                data(product::search_products(catalog, a.query, a.category_id).await?)
            }
            "list_categories" => data(product::list_categories(catalog).await),

            // Supplier commands
            "find_supplier_by_ruc" => {
                let a: RucArgs = args(command, raw)?;
                data(supplier::find_supplier_by_ruc(catalog, session, a.ruc).await?)
            }
            "list_suppliers" => data(supplier::list_suppliers(catalog).await),
            "select_supplier" => {
                let a: SupplierArgs = args(command, raw)?;
                data(supplier::select_supplier(catalog, session, a.supplier_id).await?)
            }
            "clear_supplier" => {
                supplier::clear_supplier(session);
                Ok(Value::Null)
            }

            // Purchase commands
            "set_purchase_details" => {
                let a: DetailsArgs = args(command, raw)?;
                data(purchase::set_purchase_details(session, a.payment_method, a.description)?)
            }
            "preview_purchase" => data(purchase::preview_purchase(&self.config, session)),
            "submit_purchase" => {
                data(purchase::submit_purchase(session, self.gateway.as_ref()).await?)
            }
            "reset_purchase" => data(purchase::reset_purchase(session)),

            // History commands
            "list_purchases" => data(history::list_purchases(self.history.as_ref()).await?),
            "search_purchases" => {
                let a: HistorySearchArgs = args(command, raw)?;
                let response =
                    history::search_purchases(self.history.as_ref(), a.from, a.to, a.reference)
                        .await?;
                data(response)
            }
            "get_purchase" => {
                let a: ReferenceArgs = args(command, raw)?;
                data(history::get_purchase(self.history.as_ref(), a.reference).await?)
            }

            // Config commands
            "get_config" => data(config::get_config(&self.config)),

            other => Err(ApiError::new(
                ErrorCode::UnknownCommand,
                format!("Unknown command: {}", other),
            )),
        }
    }
}
