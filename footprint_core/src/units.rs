//! # Unit Types
//!
//! Type-safe wrapper for emissions figures. Every calculator reports
//! kilograms of CO2-equivalent; wrapping the value keeps it from being
//! mixed up with the quantities it was derived from (distance, bill amount,
//! calories).
//!
//! The wrapper serializes as a bare number, so JSON output is unchanged.
//!
//! ## Example
//!
//! ```rust
//! use footprint_core::units::KgCo2e;
//!
//! let air = KgCo2e::from_factor(1000.0, 0.440);
//! let train = KgCo2e::from_factor(0.0, 0.072);
//! assert_eq!((air + train).value(), 440.0);
//! ```

use std::iter::Sum;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Mass of CO2-equivalent gas in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgCo2e(pub f64);

impl KgCo2e {
    /// Zero emissions
    pub const ZERO: KgCo2e = KgCo2e(0.0);

    /// Convert a quantity to emissions with a conversion factor.
    ///
    /// No rounding is applied; presentation code rounds.
    pub fn from_factor(quantity: f64, factor: f64) -> Self {
        KgCo2e(quantity * factor)
    }

    /// Get the raw f64 value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Create from raw f64 value
    pub fn new(value: f64) -> Self {
        Self(value)
    }
}

impl Add for KgCo2e {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<f64> for KgCo2e {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for KgCo2e {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(KgCo2e::ZERO, Add::add)
    }
}

impl From<KgCo2e> for f64 {
    fn from(kg: KgCo2e) -> Self {
        kg.0
    }
}
