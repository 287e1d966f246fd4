//! Theme configuration.
//!
//! Shop settings are an explicit value handed to every surface and to the
//! storefront client, never read from ambient globals. The struct
//! deserializes directly from the JSON blob themes embed in the page.

use crate::money::{Currency, MoneyFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Origin of the shop (e.g. "https://shop.example.com"). Endpoint paths
    /// are appended to this.
    pub base_url: String,
    /// Shop currency for catalog prices.
    #[serde(default)]
    pub currency: Currency,
    /// Money display template (e.g. "${{amount}}").
    #[serde(default)]
    pub money_format: MoneyFormat,
    /// User-facing copy.
    #[serde(default)]
    pub strings: CartStrings,
    /// How long an inline error stays visible before auto-dismissing.
    #[serde(default = "default_error_dwell_ms")]
    pub error_dwell_ms: u64,
    /// Timeout for each storefront request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// User agent sent with storefront requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ThemeConfig {
    /// Create a configuration with defaults for everything but the shop origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            currency: Currency::default(),
            money_format: MoneyFormat::default(),
            strings: CartStrings::default(),
            error_dwell_ms: default_error_dwell_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Set the shop currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the money display template.
    pub fn with_money_format(mut self, template: impl Into<String>) -> Self {
        self.money_format = MoneyFormat::new(template);
        self
    }

    /// Error display dwell as a `Duration`.
    pub fn error_dwell(&self) -> Duration {
        Duration::from_millis(self.error_dwell_ms)
    }
}

fn default_error_dwell_ms() -> u64 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("vitrine/{}", env!("CARGO_PKG_VERSION"))
}

/// User-facing copy for cart surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartStrings {
    /// Buy-control label when a purchasable variant is resolved.
    pub add_to_cart: String,
    /// Buy-control label while a mutation is in flight.
    pub adding: String,
    /// Label when the resolved variant exists but is not available.
    pub sold_out: String,
    /// Label when no variant resolves from the current selection.
    pub unavailable: String,
    /// Generic inline message for failed cart mutations.
    pub cart_error: String,
    /// Inline message when a requested quantity cannot be fulfilled.
    pub quantity_error: String,
}

impl Default for CartStrings {
    fn default() -> Self {
        Self {
            add_to_cart: "Add to cart".to_string(),
            adding: "Adding...".to_string(),
            sold_out: "Sold out".to_string(),
            unavailable: "Unavailable".to_string(),
            cart_error: "Something went wrong. Please try again.".to_string(),
            quantity_error: "Not enough items available".to_string(),
        }
    }
}
