//! Reference ellipsoids
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

use crate::units::{find_conversion, Unit};

/// An oblate ellipsoid of revolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spheroid {
    /// Semi-major axis
    pub a: f64,
    /// Semi-minor axis
    pub b: f64,
    /// Unit of both axes
    pub axis_unit: Unit,
}

impl Spheroid {
    pub fn from_axes(a: f64, b: f64, axis_unit: Unit) -> Self {
        Self { a, b, axis_unit }
    }

    /// Build from the semi-major axis and inverse flattening; an inverse
    /// flattening of zero denotes a sphere.
    pub fn from_inverse_flattening(a: f64, inverse_flattening: f64, axis_unit: Unit) -> Self {
        let b = if inverse_flattening == 0.0 {
            a
        } else {
            a * (1.0 - 1.0 / inverse_flattening)
        };
        Self { a, b, axis_unit }
    }

    pub fn wgs84() -> Self {
        Self::from_inverse_flattening(6_378_137.0, 298.257_223_563, Unit::metre())
    }

    pub fn grs80() -> Self {
        Self::from_inverse_flattening(6_378_137.0, 298.257_222_101, Unit::metre())
    }

    pub fn bessel_1841() -> Self {
        Self::from_inverse_flattening(6_377_397.155, 299.152_812_8, Unit::metre())
    }

    pub fn international_1924() -> Self {
        Self::from_inverse_flattening(6_378_388.0, 297.0, Unit::metre())
    }

    pub fn flattening(&self) -> f64 {
        (self.a - self.b) / self.a
    }

    /// First eccentricity squared
    pub fn e_squared(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.a * self.a)
    }

    /// First eccentricity
    pub fn e(&self) -> f64 {
        self.e_squared().sqrt()
    }

    /// Second eccentricity squared
    pub fn e_prime_squared(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.b * self.b)
    }

    pub fn is_sphere(&self) -> bool {
        self.a == self.b
    }

    /// Same shape and size, ignoring the unit name
    pub fn same_axes(&self, other: &Spheroid) -> bool {
        self.a == other.a && self.b == other.b
    }

    /// Express the axes in another length unit
    pub fn converted_to(&self, unit: &Unit) -> Option<Spheroid> {
        let conversion = find_conversion(&self.axis_unit, unit)?;
        Some(Spheroid {
            a: conversion.convert(self.a),
            b: conversion.convert(self.b),
            axis_unit: unit.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_constants() {
        let wgs84 = Spheroid::wgs84();
        assert!((wgs84.b - 6_356_752.314_245).abs() < 1e-3);
        assert!((wgs84.e_squared() - 0.006_694_379_990_14).abs() < 1e-12);
        assert!(!wgs84.is_sphere());
    }

    #[test]
    fn test_zero_inverse_flattening_is_sphere() {
        let sphere = Spheroid::from_inverse_flattening(6_371_000.0, 0.0, Unit::metre());
        assert!(sphere.is_sphere());
        assert_eq!(sphere.e(), 0.0);
    }

    #[test]
    fn test_converted_to_feet() {
        let feet = Spheroid::wgs84().converted_to(&Unit::foot()).unwrap();
        assert!((feet.a - 6_378_137.0 / 0.3048).abs() < 1e-6);
        assert_eq!(feet.axis_unit, Unit::foot());
        assert!(Spheroid::wgs84().converted_to(&Unit::degree()).is_none());
    }
}
