//! Stock count type.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when building a [`StockCount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    /// The count is below zero.
    #[error("stock count cannot be negative (got {0})")]
    Negative(i32),
}

/// Units on hand for a product. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct StockCount(i32);

impl StockCount {
    /// Create a stock count.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Negative`] for values below zero.
    pub const fn new(count: i32) -> Result<Self, StockError> {
        if count < 0 {
            return Err(StockError::Negative(count));
        }
        Ok(Self(count))
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn is_available(self) -> bool {
        self.0 > 0
    }

    /// Whether `quantity` units can be supplied.
    #[must_use]
    pub fn covers(self, quantity: u32) -> bool {
        u32::try_from(self.0).is_ok_and(|on_hand| on_hand >= quantity)
    }
}

impl fmt::Display for StockCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for StockCount {
    type Error = StockError;

    fn try_from(count: i32) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl<'de> Deserialize<'de> for StockCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let count = i32::deserialize(deserializer)?;
        Self::new(count).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for StockCount {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for StockCount {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let count = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(count)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for StockCount {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert_eq!(StockCount::new(-1), Err(StockError::Negative(-1)));
        assert!(serde_json::from_str::<StockCount>("-5").is_err());
    }

    #[test]
    fn test_covers() {
        let stock = StockCount::new(3).unwrap();
        assert!(stock.covers(3));
        assert!(!stock.covers(4));
        assert!(StockCount::new(0).unwrap().covers(0));
    }

    #[test]
    fn test_is_available() {
        assert!(!StockCount::default().is_available());
        assert!(StockCount::new(1).unwrap().is_available());
    }
}
