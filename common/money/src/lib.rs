use bigdecimal::BigDecimal;
use bigdecimal::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Normalize a monetary value to 2 decimal places (with_scale truncates or
/// extends with zeros; inputs are expected to already carry cent precision).
pub fn normalize_scale(value: &BigDecimal) -> BigDecimal {
    value.with_scale(2)
}

/// Compare two monetary values allowing a tolerance (in cents) after normalization.
pub fn nearly_equal(a: &BigDecimal, b: &BigDecimal, cents_tolerance: i64) -> bool {
    let na = normalize_scale(a);
    let nb = normalize_scale(b);
    // Convert difference to cents integer to avoid floating comparison.
    let diff = (na - nb).with_scale(2);
    let cents = diff.to_f64().unwrap_or(0.0) * 100.0;
    cents.abs() <= cents_tolerance as f64
}

/// Convert a major-unit amount to minor units (cents/paise), exact after
/// normalization to 2 decimal places. Returns None if the value does not fit i64.
pub fn to_minor_units(value: &BigDecimal) -> Option<i64> {
    let minor = (normalize_scale(value) * BigDecimal::from(100)).with_scale(0);
    minor.to_i64()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money(BigDecimal);

impl Money {
    pub fn new(raw: BigDecimal) -> Self {
        Self(normalize_scale(&raw))
    }
    pub fn inner(&self) -> &BigDecimal { &self.0 }
}

impl From<BigDecimal> for Money {
    fn from(value: BigDecimal) -> Self { Self::new(value) }
}
