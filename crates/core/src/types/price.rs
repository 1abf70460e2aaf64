//! Type-safe price representation using decimal arithmetic.
//!
//! All catalog prices are in USD. Amounts are stored as [`Decimal`] to avoid
//! float rounding in subtotals, but travel over JSON as plain numbers so
//! existing clients keep reading `"price": 129.5`.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More fraction digits than a stored price keeps.
    #[error("price cannot have more than {max} decimal places")]
    TooPrecise { max: u32 },
    /// At or above the largest stored price.
    #[error("price must be less than {max}")]
    TooLarge { max: i64 },
}

/// A non-negative USD amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Fraction digits kept when formatting (matches en-US locale output).
    const DISPLAY_FRACTION_DIGITS: u32 = 3;

    /// Fraction digits of the `NUMERIC(12, 2)` price column.
    pub const STORED_FRACTION_DIGITS: u32 = 2;

    /// Exclusive upper bound of the `NUMERIC(12, 2)` price column.
    pub const STORED_LIMIT: i64 = 10_000_000_000;

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from whole cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for negative cent values.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Check that the column stores this amount without rounding or overflow.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooPrecise`] for sub-cent amounts and
    /// [`PriceError::TooLarge`] for amounts at or above [`Self::STORED_LIMIT`].
    pub fn check_storable(self) -> Result<Self, PriceError> {
        if self.0.normalize().scale() > Self::STORED_FRACTION_DIGITS {
            return Err(PriceError::TooPrecise {
                max: Self::STORED_FRACTION_DIGITS,
            });
        }
        if self.0 >= Decimal::from(Self::STORED_LIMIT) {
            return Err(PriceError::TooLarge {
                max: Self::STORED_LIMIT,
            });
        }
        Ok(self)
    }

    /// The zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity (line totals).
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display, e.g. `$1,234.5` or `$20`.
    ///
    /// Uses thousands grouping and at most three fraction digits with trailing
    /// zeros dropped.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(
                Self::DISPLAY_FRACTION_DIGITS,
                RoundingStrategy::MidpointAwayFromZero,
            )
            .normalize();
        let text = rounded.to_string();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((&text, ""));

        let mut out = String::with_capacity(text.len() + 4);
        out.push('$');
        out.push_str(&group_thousands(int_part));
        if !frac_part.is_empty() {
            out.push('.');
            out.push_str(frac_part);
        }
        out
    }
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

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
        Ok(Self::new(amount)?)
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

    fn price(s: &str) -> Price {
        Price::new(s.parse::<Decimal>().unwrap()).unwrap()
    }

    #[test]
    fn test_rejects_negative() {
        assert_eq!(Price::new(Decimal::new(-1, 2)), Err(PriceError::Negative));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_check_storable() {
        assert!(price("19.99").check_storable().is_ok());
        // Trailing zeros are not extra precision
        assert!(price("19.9900").check_storable().is_ok());
        assert!(price("9999999999.99").check_storable().is_ok());

        assert_eq!(
            price("19.999").check_storable(),
            Err(PriceError::TooPrecise { max: 2 })
        );
        assert_eq!(
            price("10000000000").check_storable(),
            Err(PriceError::TooLarge {
                max: 10_000_000_000
            })
        );
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(price("1234.5").display(), "$1,234.5");
        assert_eq!(price("1234567").display(), "$1,234,567");
        assert_eq!(price("999").display(), "$999");
    }

    #[test]
    fn test_display_drops_trailing_zeros() {
        assert_eq!(price("20.00").display(), "$20");
        assert_eq!(price("19.90").display(), "$19.9");
        assert_eq!(price("0").display(), "$0");
    }

    #[test]
    fn test_display_rounds_to_three_digits() {
        assert_eq!(price("1.23456").display(), "$1.235");
        assert_eq!(price("0.0005").display(), "$0.001");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [price("10.50").times(2), price("3").times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, price("24"));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&price("129.5")).unwrap();
        assert_eq!(json, "129.5");

        let parsed: Price = serde_json::from_str("42.25").unwrap();
        assert_eq!(parsed, price("42.25"));

        assert!(serde_json::from_str::<Price>("-3").is_err());
    }
}
