//! Units of measure and conversions between them
//!
//! Every unit belongs to a category with a reference unit (metre, radian or
//! unity). Most units are a plain factor of that reference; the EPSG packed
//! sexagesimal degree encoding (`DDD.MMSSsss`) is the one non-scalar unit.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The measurement dimension a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Length,
    Angle,
    Scale,
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitCategory::Length => write!(f, "length"),
            UnitCategory::Angle => write!(f, "angle"),
            UnitCategory::Scale => write!(f, "scale"),
        }
    }
}

/// How a unit relates to its category reference unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitScale {
    /// Multiply by this factor to obtain the reference unit
    Factor(f64),
    /// Packed sexagesimal degrees, angles only
    Sexagesimal,
}

/// A named unit of measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub category: UnitCategory,
    pub scale: UnitScale,
}

impl Unit {
    pub fn new(name: impl Into<String>, category: UnitCategory, factor: f64) -> Self {
        Self {
            name: name.into(),
            category,
            scale: UnitScale::Factor(factor),
        }
    }

    pub fn metre() -> Self {
        Self::new("metre", UnitCategory::Length, 1.0)
    }

    pub fn kilometre() -> Self {
        Self::new("kilometre", UnitCategory::Length, 1000.0)
    }

    pub fn foot() -> Self {
        Self::new("foot", UnitCategory::Length, 0.3048)
    }

    pub fn us_survey_foot() -> Self {
        Self::new("US survey foot", UnitCategory::Length, 1200.0 / 3937.0)
    }

    pub fn radian() -> Self {
        Self::new("radian", UnitCategory::Angle, 1.0)
    }

    pub fn degree() -> Self {
        Self::new("degree", UnitCategory::Angle, PI / 180.0)
    }

    pub fn arc_second() -> Self {
        Self::new("arc-second", UnitCategory::Angle, PI / 648_000.0)
    }

    pub fn grad() -> Self {
        Self::new("grad", UnitCategory::Angle, PI / 200.0)
    }

    pub fn sexagesimal_dms() -> Self {
        Self {
            name: "sexagesimal DMS".to_string(),
            category: UnitCategory::Angle,
            scale: UnitScale::Sexagesimal,
        }
    }

    pub fn unity() -> Self {
        Self::new("unity", UnitCategory::Scale, 1.0)
    }

    pub fn parts_per_million() -> Self {
        Self::new("parts per million", UnitCategory::Scale, 1e-6)
    }

    /// True when values in both units are numerically identical
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.category == other.category && self.scale == other.scale
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A resolved conversion between two units of the same category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitConversion {
    Unity,
    Scalar(f64),
    /// Packed sexagesimal input; degrees are multiplied by `factor`
    FromSexagesimal { factor: f64 },
    /// Packed sexagesimal output; input is multiplied by `factor` to get degrees
    ToSexagesimal { factor: f64 },
}

impl UnitConversion {
    pub fn convert(&self, value: f64) -> f64 {
        match *self {
            UnitConversion::Unity => value,
            UnitConversion::Scalar(factor) => value * factor,
            UnitConversion::FromSexagesimal { factor } => sexagesimal_to_degrees(value) * factor,
            UnitConversion::ToSexagesimal { factor } => degrees_to_sexagesimal(value * factor),
        }
    }

    pub fn is_unity(&self) -> bool {
        matches!(self, UnitConversion::Unity)
    }

    /// Unity and plain factors are scalar; sexagesimal packing is not
    pub fn is_scalar(&self) -> bool {
        matches!(self, UnitConversion::Unity | UnitConversion::Scalar(_))
    }

    pub fn inverse(&self) -> UnitConversion {
        match *self {
            UnitConversion::Unity => UnitConversion::Unity,
            UnitConversion::Scalar(factor) => UnitConversion::Scalar(1.0 / factor),
            UnitConversion::FromSexagesimal { factor } => {
                UnitConversion::ToSexagesimal { factor: 1.0 / factor }
            }
            UnitConversion::ToSexagesimal { factor } => {
                UnitConversion::FromSexagesimal { factor: 1.0 / factor }
            }
        }
    }
}

/// Find the conversion from one unit to another, if they share a category
pub fn find_conversion(from: &Unit, to: &Unit) -> Option<UnitConversion> {
    if from.category != to.category {
        return None;
    }

    let degree = PI / 180.0;
    let conversion = match (from.scale, to.scale) {
        (UnitScale::Sexagesimal, UnitScale::Sexagesimal) => UnitConversion::Unity,
        (UnitScale::Factor(a), UnitScale::Factor(b)) => {
            if a == b {
                UnitConversion::Unity
            } else {
                UnitConversion::Scalar(a / b)
            }
        }
        (UnitScale::Sexagesimal, UnitScale::Factor(b)) => {
            UnitConversion::FromSexagesimal { factor: degree / b }
        }
        (UnitScale::Factor(a), UnitScale::Sexagesimal) => {
            UnitConversion::ToSexagesimal { factor: a / degree }
        }
    };
    Some(conversion)
}

/// Convert a value between units, returning `None` across categories
pub fn convert_value(value: f64, from: &Unit, to: &Unit) -> Option<f64> {
    find_conversion(from, to).map(|conversion| conversion.convert(value))
}

fn sexagesimal_to_degrees(value: f64) -> f64 {
    let magnitude = value.abs();
    let degrees = magnitude.trunc();
    let packed = (magnitude - degrees) * 100.0;
    let minutes = (packed + 1e-9).trunc();
    let seconds = (packed - minutes) * 100.0;
    let result = degrees + minutes / 60.0 + seconds / 3600.0;
    result.copysign(value)
}

fn degrees_to_sexagesimal(value: f64) -> f64 {
    let magnitude = value.abs();
    let mut degrees = magnitude.trunc();
    let total_minutes = (magnitude - degrees) * 60.0;
    let mut minutes = total_minutes.trunc();
    let mut seconds = (total_minutes - minutes) * 60.0;
    if seconds >= 60.0 - 1e-9 {
        seconds = 0.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }
    let result = degrees + minutes / 100.0 + seconds / 10_000.0;
    result.copysign(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversion() {
        let conversion = find_conversion(&Unit::degree(), &Unit::radian()).unwrap();
        assert!(conversion.is_scalar());
        assert!((conversion.convert(180.0) - PI).abs() < 1e-15);
        assert!((conversion.inverse().convert(PI) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_factor_is_unity() {
        let metre = Unit::new("meter", UnitCategory::Length, 1.0);
        let conversion = find_conversion(&metre, &Unit::metre()).unwrap();
        assert!(conversion.is_unity());
        assert!(metre.is_equivalent(&Unit::metre()));
    }

    #[test]
    fn test_cross_category_has_no_conversion() {
        assert!(find_conversion(&Unit::metre(), &Unit::radian()).is_none());
        assert!(convert_value(1.0, &Unit::unity(), &Unit::degree()).is_none());
    }

    #[test]
    fn test_sexagesimal_is_not_scalar() {
        let conversion = find_conversion(&Unit::sexagesimal_dms(), &Unit::degree()).unwrap();
        assert!(!conversion.is_scalar());
        // 49°30'00" -> 49.5 degrees
        assert!((conversion.convert(49.3) - 49.5).abs() < 1e-12);
        // -16°50'59.179"
        let expected = -(16.0 + 50.0 / 60.0 + 59.179 / 3600.0);
        assert!((conversion.convert(-16.5059179) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sexagesimal_packing_round_trip() {
        let to_dms = find_conversion(&Unit::degree(), &Unit::sexagesimal_dms()).unwrap();
        let packed = to_dms.convert(49.5);
        assert!((packed - 49.3).abs() < 1e-12);
        assert!((to_dms.inverse().convert(packed) - 49.5).abs() < 1e-12);
    }

    #[test]
    fn test_us_survey_foot() {
        let feet = convert_value(1200.0, &Unit::metre(), &Unit::us_survey_foot()).unwrap();
        assert!((feet - 3937.0).abs() < 1e-9);
    }
}
