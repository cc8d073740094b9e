//! Utilities for serde

/// Serde for [`crate::Coins`] fields the API carries as decimal-bearing
/// strings (e.g. `"300"` or `"300.00"`). Fractional parts are truncated.
pub mod coins_decimal_string {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::Deserialize;

    use crate::coins::Coins;

    /// Serialize coins as a plain integer string
    pub fn serialize<S>(coins: &Coins, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&coins.to_string())
    }

    /// Deserialize coins from a decimal-bearing string or a bare number
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Coins, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let decimal = <Decimal as Deserialize>::deserialize(deserializer)?;
        let whole = decimal
            .trunc()
            .to_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid coin amount: {decimal}")))?;
        Ok(Coins::from(whole))
    }
}
