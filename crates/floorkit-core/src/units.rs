//! Real-world units and scale presets.
//!
//! A layout is drawn in pixel space and mapped to real-world units
//! through a single scalar scale (pixels per unit). Presets express
//! common architectural drawing ratios ("1:100" etc.).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Real-world length unit used by the measurement system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Meters (system default)
    Meters,
    /// Centimeters
    Centimeters,
    /// Feet
    Feet,
    /// Inches
    Inches,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Meters
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meters => write!(f, "m"),
            Self::Centimeters => write!(f, "cm"),
            Self::Feet => write!(f, "ft"),
            Self::Inches => write!(f, "in"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(Self::Meters),
            "cm" | "centimeter" | "centimeters" => Ok(Self::Centimeters),
            "ft" | "foot" | "feet" => Ok(Self::Feet),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

/// Named drawing-scale preset.
///
/// The ratio is the unitless denominator of the preset: a "1:100"
/// drawing shows 100 real units per drawn unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePreset {
    OneToTwentyFive,
    OneToFifty,
    OneToHundred,
    OneToTwoHundred,
    OneToFiveHundred,
    Custom,
}

impl ScalePreset {
    /// The unitless ratio denominator. `Custom` maps to 1.
    pub fn ratio(&self) -> f64 {
        match self {
            Self::OneToTwentyFive => 25.0,
            Self::OneToFifty => 50.0,
            Self::OneToHundred => 100.0,
            Self::OneToTwoHundred => 200.0,
            Self::OneToFiveHundred => 500.0,
            Self::Custom => 1.0,
        }
    }

    /// All presets in display order.
    pub fn all() -> &'static [ScalePreset] {
        &[
            Self::OneToTwentyFive,
            Self::OneToFifty,
            Self::OneToHundred,
            Self::OneToTwoHundred,
            Self::OneToFiveHundred,
            Self::Custom,
        ]
    }
}

impl fmt::Display for ScalePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneToTwentyFive => write!(f, "1:25"),
            Self::OneToFifty => write!(f, "1:50"),
            Self::OneToHundred => write!(f, "1:100"),
            Self::OneToTwoHundred => write!(f, "1:200"),
            Self::OneToFiveHundred => write!(f, "1:500"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for ScalePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1:25" => Ok(Self::OneToTwentyFive),
            "1:50" => Ok(Self::OneToFifty),
            "1:100" => Ok(Self::OneToHundred),
            "1:200" => Ok(Self::OneToTwoHundred),
            "1:500" => Ok(Self::OneToFiveHundred),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("Unknown scale preset: {}", s)),
        }
    }
}

/// Format a real-world length for display with a trailing unit label.
///
/// * `value` - Length in real-world units
/// * `unit` - Unit label to append
/// * `precision` - Number of decimal places
pub fn format_length(value: f64, unit: Unit, precision: usize) -> String {
    format!("{:.*} {}", precision, value, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_ratios() {
        assert_eq!(ScalePreset::OneToHundred.ratio(), 100.0);
        assert_eq!(ScalePreset::OneToTwentyFive.ratio(), 25.0);
        assert_eq!(ScalePreset::Custom.ratio(), 1.0);
    }

    #[test]
    fn test_preset_parse_roundtrip() {
        for preset in ScalePreset::all() {
            let parsed: ScalePreset = preset.to_string().parse().unwrap();
            assert_eq!(parsed, *preset);
        }
        assert!("1:42".parse::<ScalePreset>().is_err());
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(Unit::Meters.to_string(), "m");
        assert_eq!(Unit::Feet.to_string(), "ft");
        assert_eq!("meters".parse::<Unit>().unwrap(), Unit::Meters);
        assert!("furlong".parse::<Unit>().is_err());
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(12.345, Unit::Meters, 2), "12.35 m");
        assert_eq!(format_length(3.0, Unit::Feet, 0), "3 ft");
    }
}
