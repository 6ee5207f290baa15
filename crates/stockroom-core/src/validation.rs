//! # Validation Module
//!
//! Caller-side checks that run before a request reaches the basket engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Console commands                                             │
//! │  └── THIS MODULE: reject bad magnitudes with a clear message           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: BasketEngine                                                 │
//! │  └── Positivity gate on setters (silent no-op)                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Backend                                                      │
//! │  └── Re-validates totals and references on submission                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_quantity, validate_ruc};
//!
//! assert!(validate_quantity(2.0).is_ok());
//! assert!(validate_ruc("20123456789").is_ok());
//! ```

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::ValidationError;
use crate::history::DateRange;
use crate::{MAX_DESCRIPTION_LEN, MAX_QUANTITY, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Digits in a RUC (taxpayer number).
pub const RUC_LEN: usize = 11;

/// Maximum length of a product search query.
pub const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase quantity.
///
/// ## Rules
/// - Must be a finite number
/// - Must be positive (> 0); fractional quantities are allowed (e.g. 2.5 kg)
/// - At most [`MAX_QUANTITY`](crate::MAX_QUANTITY)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Basket: Add Item                                                       │
/// │                                                                         │
/// │  User enters quantity: 0                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       └── OK → Proceed with add_to_basket                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: f64) -> ValidationResult<()> {
    bounded("quantity", qty, MAX_QUANTITY)
}

/// Validates a tax-inclusive unit price.
///
/// ## Rules
/// - Must be a finite number
/// - Must be positive: a purchase line at price zero is never legal
/// - At most [`MAX_UNIT_PRICE`](crate::MAX_UNIT_PRICE)
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(10.99).is_ok());
/// assert!(validate_unit_price(0.0).is_err());
/// ```
pub fn validate_unit_price(price: f64) -> ValidationResult<()> {
    bounded("unit price", price, MAX_UNIT_PRICE)
}

fn bounded(field: &str, value: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if value > max {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a supplier RUC and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - Exactly 11 ASCII digits
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_ruc;
///
/// assert_eq!(validate_ruc(" 20123456789 ").unwrap(), "20123456789");
/// assert!(validate_ruc("2012345678").is_err());
/// assert!(validate_ruc("2012345678A").is_err());
/// ```
pub fn validate_ruc(ruc: &str) -> ValidationResult<String> {
    let ruc = ruc.trim();

    if ruc.is_empty() {
        return Err(ValidationError::Required {
            field: "ruc".to_string(),
        });
    }

    if ruc.len() != RUC_LEN || !ruc.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "ruc".to_string(),
            reason: format!("must be exactly {} digits", RUC_LEN),
        });
    }

    Ok(ruc.to_string())
}

/// Validates a product search query.
///
/// ## Rules
/// - Can be empty (no filtering)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a free-text purchase description.
///
/// Returns `None` for a blank description.
pub fn validate_description(description: &str) -> ValidationResult<Option<String>> {
    let description = description.trim();

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    if description.is_empty() {
        Ok(None)
    } else {
        Ok(Some(description.to_string()))
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// Validates the bounds of a purchase history search.
///
/// ## Rules
/// - Each bound is optional; blank counts as absent
/// - RFC 3339 timestamps (`2025-03-01T10:00:00Z`) or plain dates
///   (`2025-03-01`); a plain `from` starts at 00:00 UTC, a plain `to`
///   ends at the last instant of that day
/// - `from` must not be after `to`
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_date_range;
///
/// assert!(validate_date_range(Some("2025-03-01"), Some("2025-03-31")).is_ok());
/// assert!(validate_date_range(Some("2025-04-01"), Some("2025-03-31")).is_err());
/// ```
pub fn validate_date_range(from: Option<&str>, to: Option<&str>) -> ValidationResult<DateRange> {
    let from = non_blank(from)
        .map(|s| parse_date_bound("from", s, false))
        .transpose()?;
    let to = non_blank(to)
        .map(|s| parse_date_bound("to", s, true))
        .transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ValidationError::InvertedRange {
                field: "date range".to_string(),
            });
        }
    }

    Ok(DateRange { from, to })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date_bound(field: &str, value: &str, end_of_day: bool) -> ValidationResult<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD or an RFC 3339 timestamp".to_string(),
    };

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    let naive = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    }
    .ok_or_else(invalid)?;

    Ok(Utc.from_utc_datetime(&naive))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1.0).is_ok());
        assert!(validate_quantity(0.25).is_ok());
        assert!(validate_quantity(1000.0).is_ok());

        assert!(matches!(
            validate_quantity(0.0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_quantity(-1.0).is_err());
        assert!(matches!(
            validate_quantity(f64::NAN),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_magnitudes_are_bounded() {
        assert!(validate_quantity(crate::MAX_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity(1e307),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(validate_unit_price(crate::MAX_UNIT_PRICE).is_ok());
        assert!(matches!(
            validate_unit_price(crate::MAX_UNIT_PRICE * 2.0),
            Err(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(0.01).is_ok());
        assert!(validate_unit_price(0.0).is_err());
        assert!(validate_unit_price(-5.0).is_err());
        assert!(validate_unit_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_ruc() {
        assert!(validate_ruc("20123456789").is_ok());
        assert!(validate_ruc("10456789012").is_ok());

        assert!(matches!(
            validate_ruc("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_ruc("201234567").is_err());
        assert!(validate_ruc("201234567890").is_err());
        assert!(validate_ruc("20-23456789").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  arroz ").unwrap(), "arroz");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert_eq!(validate_description("   ").unwrap(), None);
        assert_eq!(
            validate_description(" Pedido mensual ").unwrap().as_deref(),
            Some("Pedido mensual")
        );
        assert!(validate_description(&"d".repeat(256)).is_err());
        assert!(validate_description(&"d".repeat(255)).is_ok());
    }

    #[test]
    fn test_validate_date_range() {
        let range = validate_date_range(Some("2025-03-01"), Some("2025-03-01")).unwrap();
        let from = range.from.unwrap();
        let to = range.to.unwrap();
        assert_eq!(from.to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert!(to > from);
        assert_eq!(to.date_naive(), from.date_naive());

        let range = validate_date_range(Some("2025-03-01T10:30:00-05:00"), None).unwrap();
        assert_eq!(range.from.unwrap().to_rfc3339(), "2025-03-01T15:30:00+00:00");
        assert!(range.to.is_none());

        let open = validate_date_range(Some("  "), None).unwrap();
        assert_eq!(open, DateRange::default());

        assert!(matches!(
            validate_date_range(Some("2025-04-01"), Some("2025-03-31")),
            Err(ValidationError::InvertedRange { .. })
        ));
        assert!(matches!(
            validate_date_range(Some("01/03/2025"), None),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
