//! # Configuration State
//!
//! Console configuration loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_STORE_NAME, STOCKROOM_TAX_RATE, STOCKROOM_CATALOG_PATH,  │
//! │     STOCKROOM_OUTBOX_PATH, STOCKROOM_PAYMENT_METHOD                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $STOCKROOM_CONFIG, or                                              │
//! │     ~/.config/stockroom/console.toml (Linux)                           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     18% IGV, soles (S/), cash payment                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # console.toml
//! store_name = "Bodega Central"
//! tax_rate_bps = 1800          # must match the purchasing backend
//! default_payment_method = "cash"  # cash | yape
//! catalog_path = "/srv/stockroom/catalog.json"
//! outbox_path = "/srv/stockroom/outbox/purchases.jsonl"
//! ```
//!
//! ## Thread Safety
//! Read-only after initialization, so no mutex.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stockroom_core::{Money, PaymentMethod, TaxRate, CURRENCY_DECIMALS, TAX_RATE};
use tracing::{debug, info, warn};

use crate::error::StartupError;

/// Console configuration.
///
/// Read from TOML with snake_case keys, returned to the frontend in
/// camelCase by `get_config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), default)]
pub struct ConfigState {
    /// Store name (printed on purchase previews)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Decimal places of every amount leaving the engine
    #[serde(skip_deserializing)]
    pub currency_decimals: u32,

    /// IGV rate in basis points, e.g. 1800 = 18%
    pub tax_rate_bps: u32,

    /// Payment method a fresh session starts with
    pub default_payment_method: PaymentMethod,

    /// JSON catalog of categories, products and suppliers
    pub catalog_path: PathBuf,

    /// JSON-lines file that receives submitted purchases
    pub outbox_path: PathBuf,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Stockroom"
    /// - Currency: PEN (S/)
    /// - Tax: 18% IGV, prices tax-inclusive
    /// - Payment: cash
    /// - Files: under the platform data directory
    fn default() -> Self {
        let data_dir = Self::default_data_dir();
        ConfigState {
            store_name: "Stockroom".to_string(),
            currency_code: "PEN".to_string(),
            currency_symbol: "S/".to_string(),
            currency_decimals: CURRENCY_DECIMALS,
            tax_rate_bps: TAX_RATE.bps(),
            default_payment_method: PaymentMethod::Cash,
            catalog_path: data_dir.join("catalog.json"),
            outbox_path: data_dir.join("outbox").join("purchases.jsonl"),
        }
    }
}

impl ConfigState {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, StartupError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading console config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file. Absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, StartupError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, StartupError> {
        toml::from_str(contents).map_err(|e| StartupError::Config(e.to_string()))
    }

    /// Rejects settings the engine cannot work with.
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.tax_rate_bps >= 10_000 {
            return Err(StartupError::Config(format!(
                "tax rate must be below 100%, got {} bps",
                self.tax_rate_bps
            )));
        }

        if self.currency_symbol.trim().is_empty() {
            return Err(StartupError::Config("currency symbol is required".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `STOCKROOM_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("STOCKROOM_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(rate) = lookup("STOCKROOM_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) if pct.is_finite() && pct >= 0.0 => {
                    debug!(rate = %rate, "Overriding tax rate from environment");
                    self.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(rate = %rate, "Ignoring invalid STOCKROOM_TAX_RATE"),
            }
        }

        if let Some(path) = lookup("STOCKROOM_CATALOG_PATH") {
            self.catalog_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("STOCKROOM_OUTBOX_PATH") {
            self.outbox_path = PathBuf::from(path);
        }

        if let Some(method) = lookup("STOCKROOM_PAYMENT_METHOD") {
            match method.parse() {
                Ok(parsed) => self.default_payment_method = parsed,
                Err(e) => warn!(method = %method, "Ignoring STOCKROOM_PAYMENT_METHOD: {}", e),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "stockroom", "console")
            .map(|dirs| dirs.config_dir().join("console.toml"))
    }

    fn default_data_dir() -> PathBuf {
        ProjectDirs::from("com", "stockroom", "console")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Configured IGV rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Formats an amount for display, rounded to currency precision.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(12.345), "S/ 12.35");
    /// ```
    pub fn format_currency(&self, amount: f64) -> String {
        let money = Money::from_amount(amount);
        if money.cents() < 0 {
            format!(
                "-{} {}",
                self.currency_symbol,
                Money::from_cents(-money.cents())
            )
        } else {
            format!("{} {}", self.currency_symbol, money)
        }
    }
}
