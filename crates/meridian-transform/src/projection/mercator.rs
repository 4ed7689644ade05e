//! Mercator variants

use std::f64::consts::FRAC_PI_4;

use super::{conformal_t, latitude_from_conformal_t};
use crate::coordinate::{GeographicCoordinate, Point2, Vector2};
use crate::spheroid::Spheroid;
use crate::transformation::CoordinateMapping;

/// Ellipsoidal normal Mercator
#[derive(Debug, Clone, PartialEq)]
pub struct Mercator {
    name: &'static str,
    central_meridian: f64,
    scale_factor: f64,
    false_offset: Vector2,
    e: f64,
    ak: f64,
}

impl Mercator {
    /// Mercator (1SP) with an explicit scale factor at the equator
    pub fn new(
        central_meridian: f64,
        scale_factor: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
    ) -> Self {
        Self {
            name: "Mercator (1SP)",
            central_meridian,
            scale_factor,
            false_offset,
            e: spheroid.e(),
            ak: spheroid.a * scale_factor,
        }
    }

    /// Mercator (2SP), where the scale is true along a standard parallel
    pub fn from_standard_parallel(
        standard_parallel: f64,
        central_meridian: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
    ) -> Self {
        let sin_parallel = standard_parallel.sin();
        let scale_factor = standard_parallel.cos()
            / (1.0 - spheroid.e_squared() * sin_parallel * sin_parallel).sqrt();
        Self {
            name: "Mercator (2SP)",
            ..Self::new(central_meridian, scale_factor, false_offset, spheroid)
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

impl CoordinateMapping for Mercator {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        self.name
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        Point2::new(
            self.false_offset.x + self.ak * (value.longitude - self.central_meridian),
            self.false_offset.y - self.ak * conformal_t(value.latitude, self.e).ln(),
        )
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        let t = ((self.false_offset.y - value.y) / self.ak).exp();
        GeographicCoordinate::new(
            latitude_from_conformal_t(t, self.e),
            (value.x - self.false_offset.x) / self.ak + self.central_meridian,
        )
    }
}

/// Spherical Mercator evaluated on the semi-major axis of an ellipsoid
#[derive(Debug, Clone, PartialEq)]
pub struct PopularVisualisationPseudoMercator {
    central_meridian: f64,
    false_offset: Vector2,
    radius: f64,
}

impl PopularVisualisationPseudoMercator {
    pub fn new(central_meridian: f64, false_offset: Vector2, spheroid: &Spheroid) -> Self {
        Self {
            central_meridian,
            false_offset,
            radius: spheroid.a,
        }
    }
}

impl CoordinateMapping for PopularVisualisationPseudoMercator {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        "Popular Visualisation Pseudo Mercator"
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        Point2::new(
            self.false_offset.x + self.radius * (value.longitude - self.central_meridian),
            self.false_offset.y + self.radius * (FRAC_PI_4 + value.latitude / 2.0).tan().ln(),
        )
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        let d = (self.false_offset.y - value.y) / self.radius;
        GeographicCoordinate::new(
            std::f64::consts::FRAC_PI_2 - 2.0 * d.exp().atan(),
            (value.x - self.false_offset.x) / self.radius + self.central_meridian,
        )
    }
}
