//! # Money Types
//!
//! Currency and price types for the cart screen.
//! Amounts live in the smallest currency unit so totals stay exact;
//! decimal strings only appear at the provider boundary.

use crate::error::{CheckoutError, CheckoutResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
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
    /// Returns the ISO 4217 currency code as the provider expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, the others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse an ISO code, case-insensitively
    pub fn from_code(code: &str) -> CheckoutResult<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            _ => Err(CheckoutError::UnsupportedCurrency {
                currency: code.to_string(),
            }),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for USD)
    pub amount: i64,
    /// Currency
    #[serde(default)]
    pub currency: Currency,
}

impl Price {
    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self::from_cents(0, currency)
    }

    /// Parse a provider decimal string ("12.50", "12.5", "12") into minor
    /// units. More fractional digits than the currency has is an error.
    pub fn parse_decimal(value: &str, currency: Currency) -> CheckoutResult<Self> {
        let invalid = || CheckoutError::InvalidPrice {
            message: format!("'{}' is not a valid {} amount", value, currency),
        };

        let mut decimal = Decimal::from_str(value.trim()).map_err(|_| invalid())?;
        let places = u32::from(currency.decimal_places());
        if decimal.is_sign_negative() || decimal.scale() > places {
            return Err(invalid());
        }

        // Scale only grows here, so the mantissa is the minor-unit count
        decimal.rescale(places);
        let amount = i64::try_from(decimal.mantissa()).map_err(|_| invalid())?;

        Ok(Self { amount, currency })
    }

    /// Decimal string for the provider (e.g., "25.00")
    pub fn to_decimal_string(&self) -> String {
        self.to_decimal().to_string()
    }

    /// Amount in major units
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount, u32::from(self.currency.decimal_places()))
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.to_decimal_string())
    }

    /// Multiply by a quantity, failing on overflow
    pub fn checked_mul(&self, quantity: u32) -> CheckoutResult<Self> {
        self.amount
            .checked_mul(i64::from(quantity))
            .map(|amount| Self::from_cents(amount, self.currency))
            .ok_or_else(|| CheckoutError::InvalidPrice {
                message: format!("{} x {} overflows", self.display(), quantity),
            })
    }

    /// Add two prices of the same currency
    pub fn checked_add(&self, other: &Price) -> CheckoutResult<Self> {
        if self.currency != other.currency {
            return Err(CheckoutError::InvalidPrice {
                message: format!(
                    "cannot add {} to {}",
                    other.currency, self.currency
                ),
            });
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::from_cents(amount, self.currency))
            .ok_or_else(|| CheckoutError::InvalidPrice {
                message: "sum overflows".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(
            Price::parse_decimal("10.99", Currency::USD).unwrap().amount,
            1099
        );
        assert_eq!(Price::parse_decimal("12.5", Currency::USD).unwrap().amount, 1250);
        assert_eq!(Price::parse_decimal("7", Currency::USD).unwrap().amount, 700);
        assert_eq!(Price::parse_decimal("1000", Currency::JPY).unwrap().amount, 1000);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Price::parse_decimal("", Currency::USD).is_err());
        assert!(Price::parse_decimal("1.234", Currency::USD).is_err());
        assert!(Price::parse_decimal("-3.00", Currency::USD).is_err());
        assert!(Price::parse_decimal("abc", Currency::USD).is_err());
        assert!(Price::parse_decimal("10.5", Currency::JPY).is_err());
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Price::from_cents(2500, Currency::USD).to_decimal_string(), "25.00");
        assert_eq!(Price::from_cents(5, Currency::USD).to_decimal_string(), "0.05");
        assert_eq!(Price::from_cents(1000, Currency::JPY).to_decimal_string(), "1000");
        assert_eq!(Price::from_cents(1099, Currency::USD).to_decimal(), Decimal::new(1099, 2));
    }

    #[test]
    fn test_parse_decimal_keeps_trailing_zeros_exact() {
        assert_eq!(Price::parse_decimal("0.10", Currency::USD).unwrap().amount, 10);
        assert_eq!(Price::parse_decimal(" 3.0 ", Currency::USD).unwrap().amount, 300);
        assert!(Price::parse_decimal("99999999999999999999999", Currency::USD).is_err());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(2999, Currency::USD).display(), "$29.99");
        assert_eq!(Price::from_cents(1999, Currency::EUR).display(), "€19.99");
    }

    #[test]
    fn test_checked_arithmetic() {
        let ten = Price::from_cents(1000, Currency::USD);
        assert_eq!(ten.checked_mul(3).unwrap().amount, 3000);
        assert!(Price::from_cents(i64::MAX, Currency::USD).checked_mul(2).is_err());
        assert!(ten.checked_add(&Price::from_cents(1, Currency::EUR)).is_err());
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::from_code("usd").unwrap(), Currency::USD);
        assert!(Currency::from_code("XYZ").is_err());
        assert_eq!(serde_json::to_string(&Currency::USD).unwrap(), "\"USD\"");
    }
}
