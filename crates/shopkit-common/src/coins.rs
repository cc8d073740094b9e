//! Loyalty coin amounts.
//!
//! Coins are whole units; fractional coins do not exist. Conversion to
//! currency goes through the wallet policy ratio.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coin amount error
#[derive(Debug, Error)]
pub enum Error {
    /// Coin amount overflow
    #[error("Coin amount overflow")]
    CoinOverflow,
    /// Invalid coin amount
    #[error("Invalid coin amount: {0}")]
    InvalidAmount(String),
}

/// A wallet coin amount
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Coins(u64);

impl Coins {
    /// Zero coins
    pub const ZERO: Coins = Coins(0);

    /// Checked addition, `None` on overflow
    pub fn checked_add(self, other: Coins) -> Option<Coins> {
        self.0.checked_add(other.0).map(Coins)
    }

    /// Checked subtraction, `None` on underflow
    pub fn checked_sub(self, other: Coins) -> Option<Coins> {
        self.0.checked_sub(other.0).map(Coins)
    }

    /// Whether the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Sum amounts, erroring on overflow
    pub fn try_sum<I>(iter: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Self>,
    {
        iter.into_iter().try_fold(Coins::ZERO, |acc, x| {
            acc.checked_add(x).ok_or(Error::CoinOverflow)
        })
    }
}

impl From<u64> for Coins {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Coins> for u64 {
    fn from(value: Coins) -> Self {
        value.0
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Coins {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<u64>()
            .map_err(|_| Error::InvalidAmount(s.to_owned()))?;
        Ok(Coins(value))
    }
}
