//! Money type for representing monetary values.
//!
//! Prices arrive from the platform as integer minor units (cents), so the
//! representation here is integer-only with checked arithmetic. Display goes
//! through [`MoneyFormat`], the platform's money-format template convention
//! (e.g. `"${{amount}}"`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value in minor units of its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units (cents for USD).
    pub minor_units: i64,
    /// Currency of the amount.
    pub currency: Currency,
}

impl Money {
    /// Create a new monetary value.
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    /// Add another amount. Returns `None` on currency mismatch or overflow.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.minor_units
            .checked_add(other.minor_units)
            .map(|m| Money::new(m, self.currency))
    }

    /// Multiply by a quantity. Returns `None` on overflow.
    pub fn checked_mul(&self, quantity: i64) -> Option<Money> {
        self.minor_units
            .checked_mul(quantity)
            .map(|m| Money::new(m, self.currency))
    }

    /// Decimal string for the amount, without a currency marker
    /// (e.g. 1299 USD -> "12.99", 500 JPY -> "500").
    pub fn amount_str(&self) -> String {
        let places = self.currency.decimal_places();
        if places == 0 {
            return self.minor_units.to_string();
        }
        let divisor = 10i64.pow(places);
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let abs = self.minor_units.unsigned_abs();
        let whole = abs / divisor as u64;
        let frac = abs % divisor as u64;
        format!("{sign}{whole}.{frac:0width$}", width = places as usize)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount_str(), self.currency.code())
    }
}

/// A money display template in the platform's format convention.
///
/// Supported placeholders: `{{amount}}` (decimal string) and
/// `{{amount_no_decimals}}` (whole units, rounded down).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyFormat(String);

impl MoneyFormat {
    /// Create a format from a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Render a monetary value through the template.
    pub fn render(&self, money: &Money) -> String {
        let divisor = 10i64.pow(money.currency.decimal_places());
        let whole = money.minor_units / divisor;
        self.0
            .replace("{{amount}}", &money.amount_str())
            .replace("{{amount_no_decimals}}", &whole.to_string())
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::new("${{amount}}")
    }
}
