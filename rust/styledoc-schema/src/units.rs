//! Small validated wrapper types used throughout the data model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnitError {
    #[error("heading level must be in 1..=8, got {0}")]
    HeadingLevel(u8),
    #[error("value must be >= 0, got {0}")]
    NonNegative(f64),
    #[error("value must be > 0, got {0}")]
    Positive(f64),
    #[error("outline level must be in 0..=8, got {0}")]
    OutlineLevel(u8),
}

/// A heading level, 1 (title) through 8 (deepest allowed nesting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn clamp_new(level: u8) -> Self {
        Self(level.clamp(1, 8))
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = UnitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=8).contains(&value) {
            Ok(Self(value))
        } else {
            Err(UnitError::HeadingLevel(value))
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(value: HeadingLevel) -> Self {
        value.0
    }
}

/// An outline level as used by OOXML numbering, 0 (top) through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OutlineLevel(u8);

impl OutlineLevel {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for OutlineLevel {
    type Error = UnitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 8 {
            Ok(Self(value))
        } else {
            Err(UnitError::OutlineLevel(value))
        }
    }
}

impl From<OutlineLevel> for u8 {
    fn from(value: OutlineLevel) -> Self {
        value.0
    }
}

/// A length in millimetres, constrained to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Millimetres(f64);

impl Millimetres {
    pub fn get(self) -> f64 {
        self.0
    }

    /// Convert to OOXML twips (1/1440 inch), rounding to the nearest twip.
    pub fn to_twips(self) -> i64 {
        (self.0 / 25.4 * 1440.0).round() as i64
    }

    pub fn from_twips(twips: i64) -> Self {
        Self((twips as f64) / 1440.0 * 25.4)
    }
}

impl TryFrom<f64> for Millimetres {
    type Error = UnitError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(UnitError::NonNegative(value))
        }
    }
}

impl From<Millimetres> for f64 {
    fn from(value: Millimetres) -> Self {
        value.0
    }
}

/// A font size or spacing length in points, constrained to be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Points(f64);

impl Points {
    pub fn get(self) -> f64 {
        self.0
    }

    /// Convert to OOXML half-points, as used by `w:sz`/`w:szCs`.
    pub fn to_half_points(self) -> i64 {
        (self.0 * 2.0).round() as i64
    }
}

impl TryFrom<f64> for Points {
    type Error = UnitError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value > 0.0 {
            Ok(Self(value))
        } else {
            Err(UnitError::Positive(value))
        }
    }
}

impl From<Points> for f64 {
    fn from(value: Points) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_level_rejects_out_of_range() {
        assert!(HeadingLevel::try_from(0).is_err());
        assert!(HeadingLevel::try_from(9).is_err());
        assert!(HeadingLevel::try_from(1).is_ok());
        assert!(HeadingLevel::try_from(8).is_ok());
    }

    #[test]
    fn millimetres_round_trip_twips() {
        let mm = Millimetres::try_from(25.0).unwrap();
        assert_eq!(mm.to_twips(), 1417);
        let back = Millimetres::from_twips(1417);
        assert!((back.get() - 25.0).abs() < 0.01);
    }

    #[test]
    fn points_to_half_points() {
        let pt = Points::try_from(10.5).unwrap();
        assert_eq!(pt.to_half_points(), 21);
    }
}
