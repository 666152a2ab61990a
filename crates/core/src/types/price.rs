//! Course pricing with decimal arithmetic.
//!
//! Checkout requests arrive with the price as a decimal string (`"49.99"`),
//! and the payment gateway wants exactly two decimal places back. `Price`
//! owns both conversions so float arithmetic never enters the picture.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number, received: {0}")]
    NotANumber(String),
    /// The amount is zero or negative.
    #[error("price must be a positive number, received: {0}")]
    NotPositive(Decimal),
}

/// A positive course price in USD.
///
/// Serialises as a decimal string, matching the wire format of checkout
/// requests and order records.
///
/// ## Examples
///
/// ```
/// use chalkboard_core::Price;
///
/// let price = Price::parse("49.99").unwrap();
/// assert_eq!(price.gateway_total(), "49.99");
///
/// // The gateway always gets two decimal places
/// let whole = Price::parse("120").unwrap();
/// assert_eq!(whole.gateway_total(), "120.00");
///
/// assert!(Price::parse("0").is_err());
/// assert!(Price::parse("-5").is_err());
/// assert!(Price::parse("free").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a `Price` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if the amount is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }
        Ok(Self(amount))
    }

    /// Parse a `Price` from a decimal string such as `"49.99"`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] if the input is not a decimal,
    /// or [`PriceError::NotPositive`] if it is zero or negative.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format the amount with exactly two decimal places, the shape the
    /// payment gateway expects for totals (`"49.99"`, `"120.00"`).
    #[must_use]
    pub fn gateway_total(&self) -> String {
        let mut rounded = self.0.round_dp(2);
        rounded.rescale(2);
        rounded.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// SQLx support (with postgres feature): stored as NUMERIC
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let price = Price::parse("49.99").unwrap();
        assert_eq!(price.amount(), Decimal::new(4999, 2));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(Price::parse(" 19.99 ").is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Price::parse("free"),
            Err(PriceError::NotANumber(_))
        ));
        assert!(matches!(Price::parse(""), Err(PriceError::NotANumber(_))));
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert!(matches!(
            Price::parse("0"),
            Err(PriceError::NotPositive(_))
        ));
        assert!(matches!(
            Price::parse("-5.00"),
            Err(PriceError::NotPositive(_))
        ));
    }

    #[test]
    fn test_gateway_total_pads_to_two_places() {
        assert_eq!(Price::parse("120").unwrap().gateway_total(), "120.00");
        assert_eq!(Price::parse("49.9").unwrap().gateway_total(), "49.90");
        assert_eq!(Price::parse("49.99").unwrap().gateway_total(), "49.99");
    }

    #[test]
    fn test_gateway_total_rounds_excess_precision() {
        assert_eq!(Price::parse("10.005").unwrap().gateway_total(), "10.01");
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let price = Price::parse("49.99").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"49.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
