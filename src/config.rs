use config::{Config, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::errors::ConfigLoadError;

/// Default values for configuration
const DEFAULT_CURRENCY: &str = "USD";
const CONFIG_FILE: &str = "config/cart";
const ENV_PREFIX: &str = "CART";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_tax_rate() -> Decimal {
    dec!(0.19)
}

fn default_free_shipping_threshold() -> Decimal {
    dec!(50)
}

fn default_flat_shipping_rate() -> Decimal {
    dec!(10)
}

fn default_open_panel_on_add() -> bool {
    true
}

/// Pricing and UI policy for the cart engine.
///
/// Loaded from an optional `config/cart.{toml,yaml,json}` file overlaid with
/// `CART_`-prefixed environment variables; every field has a default so an
/// embedding can also construct it directly or rely on `Default`.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CartConfig {
    /// ISO 4217 currency code carried on totals for display
    #[serde(default = "default_currency")]
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    /// VAT-style tax rate applied to the subtotal (fraction, e.g. 0.19)
    #[serde(default = "default_tax_rate")]
    #[validate(custom = "validate_rate")]
    pub default_tax_rate: Decimal,

    /// Subtotal at or above which shipping is free
    #[serde(default = "default_free_shipping_threshold")]
    #[validate(custom = "validate_amount")]
    pub free_shipping_threshold: Decimal,

    /// Flat shipping rate charged below the free-shipping threshold
    #[serde(default = "default_flat_shipping_rate")]
    #[validate(custom = "validate_amount")]
    pub flat_shipping_rate: Decimal,

    /// Whether an add opens the notification panel when the caller does not say
    #[serde(default = "default_open_panel_on_add")]
    pub open_panel_on_add: bool,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            default_tax_rate: default_tax_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            flat_shipping_rate: default_flat_shipping_rate(),
            open_panel_on_add: default_open_panel_on_add(),
        }
    }
}

impl CartConfig {
    /// Loads configuration from the optional config file and the environment,
    /// then validates it.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: CartConfig = settings.try_deserialize()?;
        config.validate()?;

        info!(
            currency = %config.currency,
            tax_rate = %config.default_tax_rate,
            "cart configuration loaded"
        );
        Ok(config)
    }
}

fn validate_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if *rate < Decimal::ZERO || *rate > Decimal::ONE {
        return Err(ValidationError::new("rate_out_of_range"));
    }
    Ok(())
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < Decimal::ZERO {
        return Err(ValidationError::new("amount_negative"));
    }
    Ok(())
}
