//! Measurement units and diameter keys
//!
//! Drill diameters are used as map keys. Floats make fragile keys, so each
//! diameter is rounded to the display precision of its unit system and stored
//! as a scaled integer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system of the edited object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters
    #[default]
    Metric,
    /// Inches
    Imperial,
}

impl Units {
    /// Number of decimals diameters are rounded to
    pub fn decimals(self) -> u32 {
        match self {
            Self::Metric => 2,
            Self::Imperial => 3,
        }
    }

    /// Short unit label used in messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// A diameter rounded to fixed precision, usable as an ordered map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiameterKey {
    /// Diameter in units of 10^-decimals
    scaled: i64,
    decimals: u32,
}

impl DiameterKey {
    pub fn new(diameter: f64, units: Units) -> Self {
        let decimals = units.decimals();
        let factor = 10f64.powi(decimals as i32);
        Self {
            scaled: (diameter * factor).round() as i64,
            decimals,
        }
    }

    /// Key for a diameter from user or host input. `None` when the value is
    /// not finite or rounds to zero or below at the unit precision.
    pub fn checked(diameter: f64, units: Units) -> Option<Self> {
        if !diameter.is_finite() {
            return None;
        }
        let key = Self::new(diameter, units);
        (key.scaled > 0).then_some(key)
    }

    /// Rounded diameter value
    pub fn value(&self) -> f64 {
        self.scaled as f64 / 10f64.powi(self.decimals as i32)
    }
}

impl fmt::Display for DiameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.decimals as usize, self.value())
    }
}
