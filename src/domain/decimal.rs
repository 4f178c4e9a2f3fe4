//! Arbitrary-precision decimal numeric type backed by bigdecimal.
//!
//! Provides canonical parsing from strings and formatting without exponent notation.

use bigdecimal::{BigDecimal, One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

pub use bigdecimal::ParseBigDecimalError;

/// Arbitrary-precision decimal for point calculations.
///
/// Addition, subtraction and multiplication are exact at any magnitude and
/// scale, so cumulative subgraph quantities never overflow or round.
/// Serializes to a JSON string so totals survive any JSON consumer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Decimal(#[serde(with = "canonical_str")] BigDecimal);

impl Decimal {
    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, ParseBigDecimalError> {
        BigDecimal::from_str(s.trim()).map(Decimal)
    }

    /// Format the Decimal as a canonical string (no exponent notation).
    pub fn to_canonical_string(&self) -> String {
        // normalized() strips trailing zeros so "1.50" and "1.5" format identically
        self.0.normalized().to_plain_string()
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Decimal(BigDecimal::zero())
    }

    /// The multiplicative identity (1).
    pub fn one() -> Self {
        Decimal(BigDecimal::one())
    }

    /// Exact conversion from an integer (e.g. a duration in seconds).
    pub fn from_i64(value: i64) -> Self {
        Decimal(BigDecimal::from(value))
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        self.0 > BigDecimal::zero()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        self.0 < BigDecimal::zero()
    }

    /// Negative values become zero; everything else is unchanged.
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Decimal::zero()
        } else {
            self
        }
    }

    /// Apply an optional hard ceiling.
    pub fn cap(self, limit: Option<&Decimal>) -> Self {
        match limit {
            Some(limit) if self > *limit => limit.clone(),
            _ => self,
        }
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Decimal::zero()
    }
}

/// String serde that always emits the normalized plain form.
mod canonical_str {
    use bigdecimal::BigDecimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.normalized().to_plain_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let text = String::deserialize(deserializer)?;
        BigDecimal::from_str(text.trim()).map_err(D::Error::custom)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

// Arithmetic operations, owned and borrowed
impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl Add<&Decimal> for Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal(self.0 + &rhs.0)
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 + &rhs.0)
    }
}

impl AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs.0;
    }
}

impl AddAssign<&Decimal> for Decimal {
    fn add_assign(&mut self, rhs: &Decimal) {
        self.0 += &rhs.0;
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 - &rhs.0)
    }
}

impl SubAssign for Decimal {
    fn sub_assign(&mut self, rhs: Decimal) {
        self.0 -= rhs.0;
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl Mul<&Decimal> for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal(self.0 * &rhs.0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl std::iter::Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}

impl<'a> std::iter::Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}
