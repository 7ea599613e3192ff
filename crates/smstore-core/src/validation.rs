//! # Validation Module
//!
//! Input validation utilities for SMStore.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum)                                        │
//! │  ├── Body must be JSON of the right shape                              │
//! │  └── Path ids must parse as UUIDs                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Fields the schema cannot live without (names, prices ≥ 0)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key on sale_items.sale_id                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything else is accepted as given. A checkout with negative
//! quantities or unknown products is still recorded.
//!
//! ## Usage
//! ```rust
//! use smstore_core::validation::{validate_id, parse_reference};
//!
//! // Path parameters must be well-formed
//! assert!(validate_id("product id", "not-a-uuid").is_err());
//!
//! // Cart references quietly become None
//! assert_eq!(parse_reference(Some("not-a-uuid")), None);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CustomerPatch, NewCustomer, NewProduct, ProductPatch};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Identifiers
// =============================================================================

/// Validates an identifier taken from a URL path.
///
/// Returns the canonical lowercase hyphenated form so lookups match what
/// the repositories store.
///
/// ## Example
/// ```rust
/// use smstore_core::validation::validate_id;
///
/// let id = validate_id("sale id", "550E8400-E29B-41D4-A716-446655440000").unwrap();
/// assert_eq!(id, "550e8400-e29b-41d4-a716-446655440000");
/// assert!(validate_id("sale id", "").is_err());
/// ```
pub fn validate_id(field: &str, raw: &str) -> ValidationResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(raw)
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a valid UUID".to_string(),
        })
}

/// Interprets an optional reference carried inside a request body.
///
/// Unlike path ids, a bad reference here is not an error: the sale line
/// or customer link is simply recorded without it.
pub fn parse_reference(raw: Option<&str>) -> Option<String> {
    raw.and_then(|r| uuid::Uuid::parse_str(r.trim()).ok())
        .map(|id| id.hyphenated().to_string())
}

/// Generates a fresh identifier for a new row.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free items, "price on request").
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_name("name_en", &product.name_en)?;
    validate_price("base_price", product.base_price)
}

pub fn validate_product_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name_en {
        validate_name("name_en", name)?;
    }
    if let Some(price) = patch.base_price {
        validate_price("base_price", price)?;
    }
    Ok(())
}

pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_name("name", &customer.name)
}

pub fn validate_customer_patch(patch: &CustomerPatch) -> ValidationResult<()> {
    match &patch.name {
        Some(name) => validate_name("name", name),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("id", "").is_err());
        assert!(validate_id("id", "not-a-uuid").is_err());
        // 24-hex document ids from the old store are not accepted
        assert!(validate_id("id", "507f1f77bcf86cd799439011").is_err());
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference(None), None);
        assert_eq!(parse_reference(Some("")), None);
        assert_eq!(
            parse_reference(Some(" 550e8400-e29b-41d4-a716-446655440000 ")),
            Some("550e8400-e29b-41d4-a716-446655440000".to_string())
        );
    }

    #[test]
    fn test_new_id_is_valid() {
        let id = new_id();
        assert_eq!(validate_id("id", &id).unwrap(), id);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Mr. Rahim").is_ok());
        assert!(validate_name("name", "পেঁয়াজ").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let mut product = NewProduct {
            name_en: "Garlic".to_string(),
            base_price: Money::from_taka(120),
            ..Default::default()
        };
        assert!(validate_new_product(&product).is_ok());

        product.base_price = Money::from_taka(-1);
        assert!(matches!(
            validate_new_product(&product),
            Err(ValidationError::MustNotBeNegative { .. })
        ));

        product.name_en.clear();
        assert!(matches!(
            validate_new_product(&product),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_patches_only_check_present_fields() {
        assert!(validate_product_patch(&ProductPatch::default()).is_ok());
        assert!(validate_customer_patch(&CustomerPatch::default()).is_ok());

        let patch = CustomerPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_customer_patch(&patch).is_err());
    }
}
