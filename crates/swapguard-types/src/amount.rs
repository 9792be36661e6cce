//! Amount type in minor currency units
//!
//! SwapGuard holds amounts as unsigned integers of minor units (paise,
//! cents) to keep arithmetic exact. The amount of an escrow is fixed at
//! creation and never changes; the engine rejects zero amounts at the
//! boundary, so a held [`Amount`] is always positive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minor units per major unit (e.g. paise per rupee)
pub const MINOR_PER_MAJOR: u64 = 100;

/// A monetary amount in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl Amount {
    /// Create an amount from minor units
    pub fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Create an amount from whole major units
    pub fn from_major(major: u64) -> Self {
        Self(major * MINOR_PER_MAJOR)
    }

    /// Raw minor units
    pub fn minor(&self) -> u64 {
        self.0
    }

    /// Whether the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / MINOR_PER_MAJOR, self.0 % MINOR_PER_MAJOR)
    }
}
