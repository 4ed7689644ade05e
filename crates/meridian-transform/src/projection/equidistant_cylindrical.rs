//! Equidistant Cylindrical (plate carrée family)

use crate::coordinate::{GeographicCoordinate, Point2, Vector2};
use crate::spheroid::Spheroid;
use crate::transformation::CoordinateMapping;

/// Ellipsoidal Equidistant Cylindrical
#[derive(Debug, Clone, PartialEq)]
pub struct EquidistantCylindrical {
    longitude_of_origin: f64,
    false_offset: Vector2,
    a: f64,
    e_squared: f64,
    parallel_radius: f64,
    coefficients: [f64; 5],
}

impl EquidistantCylindrical {
    pub fn new(
        standard_parallel: f64,
        longitude_of_origin: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
    ) -> Self {
        let e2 = spheroid.e_squared();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e6 * e2;
        let sin_parallel = standard_parallel.sin();
        let nu1 = spheroid.a / (1.0 - e2 * sin_parallel * sin_parallel).sqrt();
        Self {
            longitude_of_origin,
            false_offset,
            a: spheroid.a,
            e_squared: e2,
            parallel_radius: nu1 * standard_parallel.cos(),
            coefficients: [
                1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0 - 175.0 * e8 / 16384.0,
                -3.0 * e2 / 8.0 - 3.0 * e4 / 32.0 - 45.0 * e6 / 1024.0 - 105.0 * e8 / 4096.0,
                15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0 + 525.0 * e8 / 16384.0,
                -35.0 * e6 / 3072.0 - 175.0 * e8 / 12288.0,
                315.0 * e8 / 131_072.0,
            ],
        }
    }

    fn meridional_arc(&self, latitude: f64) -> f64 {
        let [c0, c2, c4, c6, c8] = self.coefficients;
        self.a
            * (c0 * latitude
                + c2 * (2.0 * latitude).sin()
                + c4 * (4.0 * latitude).sin()
                + c6 * (6.0 * latitude).sin()
                + c8 * (8.0 * latitude).sin())
    }
}

impl CoordinateMapping for EquidistantCylindrical {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        "Equidistant Cylindrical"
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        Point2::new(
            self.false_offset.x
                + self.parallel_radius * (value.longitude - self.longitude_of_origin),
            self.false_offset.y + self.meridional_arc(value.latitude),
        )
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        let target = value.y - self.false_offset.y;
        let mut latitude = target / (self.a * self.coefficients[0]);
        for _ in 0..32 {
            let sin_lat = latitude.sin();
            let slope = self.a * (1.0 - self.e_squared)
                / (1.0 - self.e_squared * sin_lat * sin_lat).powf(1.5);
            let step = (self.meridional_arc(latitude) - target) / slope;
            latitude -= step;
            if step.abs() < 1e-15 {
                break;
            }
        }
        GeographicCoordinate::new(
            latitude,
            self.longitude_of_origin
                + (value.x - self.false_offset.x) / self.parallel_radius,
        )
    }
}

/// Equidistant Cylindrical on a sphere of the semi-major radius
#[derive(Debug, Clone, PartialEq)]
pub struct EquidistantCylindricalSpherical {
    longitude_of_origin: f64,
    false_offset: Vector2,
    radius: f64,
    cos_parallel: f64,
}

impl EquidistantCylindricalSpherical {
    pub fn new(
        standard_parallel: f64,
        longitude_of_origin: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
    ) -> Self {
        Self {
            longitude_of_origin,
            false_offset,
            radius: spheroid.a,
            cos_parallel: standard_parallel.cos(),
        }
    }
}

impl CoordinateMapping for EquidistantCylindricalSpherical {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        "Equidistant Cylindrical (Spherical)"
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        Point2::new(
            self.false_offset.x
                + self.radius * self.cos_parallel * (value.longitude - self.longitude_of_origin),
            self.false_offset.y + self.radius * value.latitude,
        )
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        GeographicCoordinate::new(
            (value.y - self.false_offset.y) / self.radius,
            self.longitude_of_origin
                + (value.x - self.false_offset.x) / (self.radius * self.cos_parallel),
        )
    }
}
