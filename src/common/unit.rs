//! Unit conversion utilities.
//!
//! DrawingML positions and sizes are English Metric Units (EMU): 914 400 per
//! inch, 12 700 per point. This module converts between EMU and the units
//! used in deck layouts and configuration files.

use crate::Result;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A length in English Metric Units.
pub type Emu = i64;

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;

/// Convert inches to EMU, truncating toward zero.
///
/// ```
/// use chartdeck::common::unit::inches;
/// assert_eq!(inches(10.0), 9_144_000);
/// assert_eq!(inches(5.625), 5_143_500);
/// ```
#[inline]
pub fn inches(value: f64) -> Emu {
    (value * EMUS_PER_INCH as f64) as i64
}

/// Convert points to EMU, truncating toward zero.
#[inline]
pub fn pt(value: f64) -> Emu {
    (value * EMUS_PER_PT as f64) as i64
}

#[inline]
pub fn emu_to_inches(emu: Emu) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

#[inline]
pub fn emu_to_pt_f64(emu: Emu) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

#[inline]
pub fn px_to_emu(px: u32, dpi: u32) -> Emu {
    ((px as f64) * EMUS_PER_INCH as f64 / dpi as f64) as i64
}

/// Font size in hundredths of a point, the unit of the DrawingML `sz` attribute.
#[inline]
pub fn font_size_centipoints(size_pt: f64) -> u32 {
    (size_pt * 100.0).round() as u32
}

/// Supported length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Inch
    Inch,
    /// Centimeter
    Centimeter,
    /// Millimeter
    Millimeter,
    /// Point (1/72 inch)
    Point,
    /// English Metric Unit
    Emu,
}

impl LengthUnit {
    /// Get the unit abbreviation
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inch => "in",
            Self::Centimeter => "cm",
            Self::Millimeter => "mm",
            Self::Point => "pt",
            Self::Emu => "emu",
        }
    }

    /// Parse unit from string
    fn from_str_internal(s: &str) -> Option<Self> {
        match s {
            "in" | "inch" => Some(Self::Inch),
            "cm" => Some(Self::Centimeter),
            "mm" => Some(Self::Millimeter),
            "pt" => Some(Self::Point),
            "emu" => Some(Self::Emu),
            _ => None,
        }
    }

    #[inline]
    fn emus_per_unit(&self) -> f64 {
        match self {
            Self::Inch => EMUS_PER_INCH as f64,
            Self::Centimeter => EMUS_PER_CM as f64,
            Self::Millimeter => EMUS_PER_MM as f64,
            Self::Point => EMUS_PER_PT as f64,
            Self::Emu => 1.0,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_internal(s)
            .ok_or_else(|| crate::Error::Config(format!("Unknown length unit '{}'", s)))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Length value with unit
///
/// Layout parameters in configuration files are written as lengths such as
/// `"0.8in"`, `"28pt"` or `"2cm"`.
///
/// # Examples
///
/// ```
/// use chartdeck::common::unit::{Length, LengthUnit};
///
/// let band = "0.8in".parse::<Length>().unwrap();
/// assert_eq!(band.unit(), LengthUnit::Inch);
/// assert_eq!(band.to_emu(), 731_520);
///
/// let length = Length::new(10.0, LengthUnit::Point);
/// assert_eq!(length.to_string(), "10pt");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    /// Create a new length measurement
    #[inline]
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub const fn inches(value: f64) -> Self {
        Self::new(value, LengthUnit::Inch)
    }

    #[inline]
    pub const fn points(value: f64) -> Self {
        Self::new(value, LengthUnit::Point)
    }

    /// Get the numeric value
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the unit
    #[inline]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Convert to EMU, truncating toward zero.
    #[inline]
    pub fn to_emu(&self) -> Emu {
        (self.value * self.unit.emus_per_unit()) as i64
    }
}

impl FromStr for Length {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| crate::Error::Config(format!("Length '{}' has no unit", s)))?;
        let (number, unit) = s.split_at(split);

        let value = number
            .trim()
            .parse::<f64>()
            .map_err(|_| crate::Error::Config(format!("Invalid length value in '{}'", s)))?;
        if !value.is_finite() {
            return Err(crate::Error::Config(format!("Invalid length value in '{}'", s)));
        }

        Ok(Self::new(value, unit.parse()?))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
