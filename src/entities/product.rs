use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Catalog product as the cart snapshots it.
///
/// Identifiers are canonically strings (UUIDs or slugs); call sites that
/// carry numeric ids must render them before reaching the cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    /// Stable product identifier
    #[validate(length(
        min = 1,
        max = 100,
        message = "Product id must be between 1 and 100 characters"
    ))]
    pub id: String,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Product brand
    pub brand: Option<String>,

    /// Base price, used when no variant is selected
    pub price: Decimal,

    /// Original (pre-discount) price, for strike-through display
    pub original_price: Option<Decimal>,

    /// Package metadata (e.g. "30 capsules")
    pub package: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            price,
            original_price: None,
            package: None,
        }
    }
}

/// Product variant; its price overrides the product base price when selected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant identifier, unique within its product
    pub id: String,

    /// Display label (e.g. "500mg / 60 tablets")
    pub label: String,

    pub price: Decimal,

    /// Free-form attributes: dosage, package quantity, flavor
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl ProductVariant {
    pub fn new(id: impl Into<String>, label: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            price,
            options: HashMap::new(),
        }
    }
}
