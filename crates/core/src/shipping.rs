//! Shipping

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cost of regular shipping, in minor units.
pub const REGULAR_SHIPPING_COST: u64 = 15_000;

/// Shipping service level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingKind {
    /// Regular delivery
    #[default]
    Regular,

    /// Express delivery
    Express,

    /// Same-day delivery
    SameDay,
}

impl ShippingKind {
    /// Wire name of the shipping kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Express => "express",
            Self::SameDay => "same-day",
        }
    }
}

impl fmt::Display for ShippingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown shipping kind name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown shipping type \"{0}\"")]
pub struct UnknownShippingKind(pub String);

impl FromStr for ShippingKind {
    type Err = UnknownShippingKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "regular" => Ok(Self::Regular),
            "express" => Ok(Self::Express),
            "same-day" => Ok(Self::SameDay),
            other => Err(UnknownShippingKind(other.to_string())),
        }
    }
}

/// Chosen shipping kind and its cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSelection {
    /// Shipping kind
    #[serde(rename = "type")]
    pub kind: ShippingKind,

    /// Shipping cost in minor units
    pub cost: u64,
}

impl ShippingSelection {
    /// Create a shipping selection.
    pub const fn new(kind: ShippingKind, cost: u64) -> Self {
        Self { kind, cost }
    }

    /// Regular shipping at the standard cost.
    pub const fn regular() -> Self {
        Self::new(ShippingKind::Regular, REGULAR_SHIPPING_COST)
    }
}

impl Default for ShippingSelection {
    fn default() -> Self {
        Self::regular()
    }
}
