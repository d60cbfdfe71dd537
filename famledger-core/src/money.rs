//! Currencies and two-decimal money arithmetic

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Balances within this distance of zero count as settled.
pub const BALANCE_EPSILON: f64 = 0.01;

/// Round to 2 decimal places (half away from zero).
///
/// Idempotent: `round2(round2(x)) == round2(x)`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid printing "-0.00"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Currencies the detector can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "AED")]
    Aed,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Aed => "AED",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Word used in Arabic-language reports
    pub fn arabic_name(&self) -> &'static str {
        match self {
            Currency::Aed => "درهم",
            Currency::Usd => "دولار",
            Currency::Eur => "يورو",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AED" => Ok(Currency::Aed),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => bail!("unsupported currency code: {other:?} (expected AED, USD or EUR)"),
        }
    }
}

/// Currency of a whole analysis: one code, or "mixed" when lines disagree.
///
/// Mixed amounts are flagged, never converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedCurrency {
    Single(Currency),
    Mixed,
}

impl ResolvedCurrency {
    /// Resolve from every currency seen, falling back to `default` when none were.
    pub fn from_detected<I>(detected: I, default: Currency) -> Self
    where
        I: IntoIterator<Item = Currency>,
    {
        let mut iter = detected.into_iter();
        let Some(first) = iter.next() else {
            return ResolvedCurrency::Single(default);
        };
        if iter.all(|c| c == first) {
            ResolvedCurrency::Single(first)
        } else {
            ResolvedCurrency::Mixed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedCurrency::Single(c) => c.code(),
            ResolvedCurrency::Mixed => "mixed",
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, ResolvedCurrency::Mixed)
    }
}

impl fmt::Display for ResolvedCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for ResolvedCurrency {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for ResolvedCurrency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResolvedCurrency {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("mixed") {
            return Ok(ResolvedCurrency::Mixed);
        }
        raw.parse::<Currency>()
            .map(ResolvedCurrency::Single)
            .map_err(serde::de::Error::custom)
    }
}
