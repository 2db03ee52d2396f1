//! Defines the type used for balances, credit limits and expense amounts.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// The number of fractional digits kept for every amount.
const SCALE: u32 = 2;

/// The smallest magnitude that no longer fits in ten digits with two of them
/// after the decimal point.
const MAX_WHOLE_UNITS: i64 = 100_000_000;

/// An amount of money with exactly two fractional digits.
///
/// Amounts are rounded half away from zero when they are created, are
/// stored in the database as text, and are serialized as JSON strings so
/// that they never pass through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create an amount, rounding `amount` to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns [Error::AmountOutOfRange] if the magnitude of `amount` is
    /// 100,000,000 or more after rounding.
    pub fn new(amount: Decimal) -> Result<Self, Error> {
        let mut rounded =
            amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);

        if rounded.abs() >= Decimal::from(MAX_WHOLE_UNITS) {
            return Err(Error::AmountOutOfRange(amount));
        }

        rounded.rescale(SCALE);

        Ok(Self(rounded))
    }

    /// The amount as a decimal number.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accepts both JSON strings and JSON numbers.
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;

        Money::new(amount).map_err(serde::de::Error::custom)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        let amount =
            Decimal::from_str(text).map_err(|error| FromSqlError::Other(Box::new(error)))?;

        Money::new(amount).map_err(|_| FromSqlError::InvalidType)
    }
}

#[cfg(test)]
mod money_tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use crate::{Error, Money};

    fn money(amount: &str) -> Money {
        Money::new(Decimal::from_str(amount).unwrap()).unwrap()
    }

    #[test]
    fn pads_to_two_decimal_places() {
        let money = Money::new(Decimal::from(100)).unwrap();

        assert_eq!(money.to_string(), "100.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(money("0.125").to_string(), "0.13");
        assert_eq!(money("-0.125").to_string(), "-0.13");
        assert_eq!(money("0.124").to_string(), "0.12");
    }

    #[test]
    fn rejects_amounts_that_are_too_large() {
        let amount = Decimal::from(100_000_000);

        assert_eq!(Money::new(amount), Err(Error::AmountOutOfRange(amount)));
        assert!(Money::new(Decimal::from_str("99999999.99").unwrap()).is_ok());
    }

    #[test]
    fn serializes_as_string() {
        let money = money("1234.5");

        let json = serde_json::to_string(&money).unwrap();

        assert_eq!(json, "\"1234.50\"");
    }

    #[test]
    fn deserializes_from_string_and_number() {
        let from_string: Money = serde_json::from_str("\"100.00\"").unwrap();
        let from_number: Money = serde_json::from_str("50.0").unwrap();

        assert_eq!(from_string.to_string(), "100.00");
        assert_eq!(from_number.to_string(), "50.00");
    }

    #[test]
    fn survives_a_trip_through_sqlite() {
        let connection = rusqlite::Connection::open_in_memory().unwrap();
        let money = money("0.10");

        let got: Money = connection
            .query_row("SELECT ?1", (money,), |row| row.get(0))
            .unwrap();

        assert_eq!(got, money);
        assert_eq!(got.to_string(), "0.10");
    }
}
