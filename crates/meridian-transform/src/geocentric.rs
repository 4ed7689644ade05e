//! Datum-level transformations
//!
//! Geographic/geocentric conversion, the seven parameter Helmert similarity
//! transform, three parameter geocentric translations, geographic offsets and
//! a wrapper that applies any geocentric transform to geographic coordinates.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::coordinate::{Coordinate, CoordinateKindName, GeographicCoordinate, Point3, Vector3};
use crate::error::TransformError;
use crate::spheroid::Spheroid;
use crate::transformation::{CoordinateMapping, Transformation};

const ARC_SECONDS_TO_RADIANS: f64 = std::f64::consts::PI / 648_000.0;

/// Geographic coordinates on a spheroid surface to earth-centred cartesian
#[derive(Debug, Clone, PartialEq)]
pub struct GeographicGeocentric {
    spheroid: Spheroid,
    e_squared: f64,
}

impl GeographicGeocentric {
    pub fn new(spheroid: Spheroid) -> Self {
        let e_squared = spheroid.e_squared();
        Self {
            spheroid,
            e_squared,
        }
    }

    pub fn spheroid(&self) -> &Spheroid {
        &self.spheroid
    }

    fn prime_vertical_radius(&self, sin_lat: f64) -> f64 {
        self.spheroid.a / (1.0 - self.e_squared * sin_lat * sin_lat).sqrt()
    }
}

impl CoordinateMapping for GeographicGeocentric {
    type Source = GeographicCoordinate;
    type Target = Point3;

    fn name(&self) -> &str {
        "Geographic To Geocentric"
    }

    fn inverse_name(&self) -> String {
        "Geocentric To Geographic".to_string()
    }

    fn forward(&self, value: GeographicCoordinate) -> Point3 {
        let (sin_lat, cos_lat) = value.latitude.sin_cos();
        let (sin_lon, cos_lon) = value.longitude.sin_cos();
        let nu = self.prime_vertical_radius(sin_lat);
        let h = value.height;
        Point3::new(
            (nu + h) * cos_lat * cos_lon,
            (nu + h) * cos_lat * sin_lon,
            ((1.0 - self.e_squared) * nu + h) * sin_lat,
        )
    }

    fn reverse(&self, value: Point3) -> GeographicCoordinate {
        let a = self.spheroid.a;
        let b = self.spheroid.b;
        let e2 = self.e_squared;
        let epsilon = e2 / (1.0 - e2);
        let p = value.x.hypot(value.y);

        // Bowring's parametric estimate, then fixed point refinement with height
        let q = (value.z * a).atan2(p * b);
        let (sin_q, cos_q) = q.sin_cos();
        let mut latitude = (value.z + epsilon * b * sin_q.powi(3))
            .atan2(p - e2 * a * cos_q.powi(3));
        let mut height = 0.0;
        for _ in 0..3 {
            let (sin_lat, cos_lat) = latitude.sin_cos();
            let nu = self.prime_vertical_radius(sin_lat);
            height = if cos_lat.abs() > 1e-10 {
                p / cos_lat - nu
            } else {
                value.z / sin_lat - (1.0 - e2) * nu
            };
            latitude = value.z.atan2(p * (1.0 - e2 * nu / (nu + height)));
        }

        GeographicCoordinate::with_height(latitude, value.y.atan2(value.x), height)
    }
}

/// Seven parameter similarity transform in the position vector convention
#[derive(Debug, Clone, PartialEq)]
pub struct Helmert7 {
    delta: Vector3,
    rotation_arc_seconds: Vector3,
    scale_ppm: f64,
    matrix: [[f64; 3]; 3],
    inverse_matrix: Option<[[f64; 3]; 3]>,
}

impl Helmert7 {
    /// Rotations are in arc-seconds, the scale difference in parts per million
    pub fn position_vector(delta: Vector3, rotation_arc_seconds: Vector3, scale_ppm: f64) -> Self {
        let rx = rotation_arc_seconds.x * ARC_SECONDS_TO_RADIANS;
        let ry = rotation_arc_seconds.y * ARC_SECONDS_TO_RADIANS;
        let rz = rotation_arc_seconds.z * ARC_SECONDS_TO_RADIANS;
        let m = 1.0 + scale_ppm * 1e-6;
        let matrix = [
            [m, -rz * m, ry * m],
            [rz * m, m, -rx * m],
            [-ry * m, rx * m, m],
        ];
        Self {
            delta,
            rotation_arc_seconds,
            scale_ppm,
            inverse_matrix: invert_matrix(&matrix),
            matrix,
        }
    }

    /// The coordinate frame convention differs only in the rotation sign
    pub fn coordinate_frame(delta: Vector3, rotation_arc_seconds: Vector3, scale_ppm: f64) -> Self {
        let negated = Vector3::new(
            -rotation_arc_seconds.x,
            -rotation_arc_seconds.y,
            -rotation_arc_seconds.z,
        );
        Self::position_vector(delta, negated, scale_ppm)
    }

    pub fn delta(&self) -> Vector3 {
        self.delta
    }

    pub fn rotation_arc_seconds(&self) -> Vector3 {
        self.rotation_arc_seconds
    }

    pub fn scale_ppm(&self) -> f64 {
        self.scale_ppm
    }
}

fn invert_matrix(m: &[[f64; 3]; 3]) -> Option<[[f64; 3]; 3]> {
    let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
    };
    let c00 = cofactor(1, 2, 1, 2);
    let c01 = -cofactor(1, 2, 0, 2);
    let c02 = cofactor(1, 2, 0, 1);
    let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02;
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let c10 = -cofactor(0, 2, 1, 2);
    let c11 = cofactor(0, 2, 0, 2);
    let c12 = -cofactor(0, 2, 0, 1);
    let c20 = cofactor(0, 1, 1, 2);
    let c21 = -cofactor(0, 1, 0, 2);
    let c22 = cofactor(0, 1, 0, 1);
    // transpose of the cofactor matrix over the determinant
    Some([
        [c00 / det, c10 / det, c20 / det],
        [c01 / det, c11 / det, c21 / det],
        [c02 / det, c12 / det, c22 / det],
    ])
}

fn multiply(m: &[[f64; 3]; 3], p: Point3) -> Point3 {
    Point3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z,
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z,
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z,
    )
}

impl CoordinateMapping for Helmert7 {
    type Source = Point3;
    type Target = Point3;

    fn name(&self) -> &str {
        "Helmert 7 Parameter"
    }

    fn forward(&self, value: Point3) -> Point3 {
        multiply(&self.matrix, value).add(self.delta)
    }

    fn reverse(&self, value: Point3) -> Point3 {
        match &self.inverse_matrix {
            Some(inverse) => multiply(inverse, value.difference(self.delta)),
            None => Point3::new(f64::NAN, f64::NAN, f64::NAN),
        }
    }

    fn is_invertible(&self) -> bool {
        self.inverse_matrix.is_some()
    }
}

/// Three parameter shift of geocentric coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocentricTranslation {
    delta: Vector3,
}

impl GeocentricTranslation {
    pub fn new(delta: Vector3) -> Self {
        Self { delta }
    }

    pub fn delta(&self) -> Vector3 {
        self.delta
    }
}

impl CoordinateMapping for GeocentricTranslation {
    type Source = Point3;
    type Target = Point3;

    fn name(&self) -> &str {
        "Geocentric Translation"
    }

    fn forward(&self, value: Point3) -> Point3 {
        value.add(self.delta)
    }

    fn reverse(&self, value: Point3) -> Point3 {
        value.difference(self.delta)
    }
}

/// Adds fixed latitude and longitude offsets, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicOffset {
    latitude: f64,
    longitude: f64,
}

impl GeographicOffset {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl CoordinateMapping for GeographicOffset {
    type Source = GeographicCoordinate;
    type Target = GeographicCoordinate;

    fn name(&self) -> &str {
        "Geographic Offset"
    }

    fn forward(&self, value: GeographicCoordinate) -> GeographicCoordinate {
        GeographicCoordinate::with_height(
            value.latitude + self.latitude,
            value.longitude + self.longitude,
            value.height,
        )
    }

    fn reverse(&self, value: GeographicCoordinate) -> GeographicCoordinate {
        GeographicCoordinate::with_height(
            value.latitude - self.latitude,
            value.longitude - self.longitude,
            value.height,
        )
    }
}

/// Applies a geocentric transform to geographic coordinates by converting
/// through the source and target spheroids
#[derive(Debug)]
pub struct GeocentricTransformationGeographicWrapper {
    source: GeographicGeocentric,
    target: GeographicGeocentric,
    core: Box<dyn Transformation>,
    name: String,
}

impl GeocentricTransformationGeographicWrapper {
    pub fn new(source: Spheroid, target: Spheroid, core: Box<dyn Transformation>) -> Self {
        let name = format!("{} (geographic)", core.name());
        Self {
            source: GeographicGeocentric::new(source),
            target: GeographicGeocentric::new(target),
            core,
            name,
        }
    }

    pub fn core(&self) -> &dyn Transformation {
        self.core.as_ref()
    }
}

impl Transformation for GeocentricTransformationGeographicWrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: Coordinate) -> Result<Coordinate, TransformError> {
        let geographic = match value {
            Coordinate::Geographic(g) => g,
            other => {
                return Err(TransformError::CoordinateMismatch {
                    operation: self.name.clone(),
                    expected: CoordinateKindName::Geographic,
                    found: other.kind(),
                })
            }
        };
        let geocentric = self.source.forward(geographic).into();
        match self.core.transform(geocentric)? {
            Coordinate::Geocentric(shifted) => Ok(self.target.reverse(shifted).into()),
            other => Err(TransformError::CoordinateMismatch {
                operation: self.name.clone(),
                expected: CoordinateKindName::Geocentric,
                found: other.kind(),
            }),
        }
    }

    fn has_inverse(&self) -> bool {
        self.core.has_inverse()
    }

    fn inverse(&self) -> Result<Box<dyn Transformation>, TransformError> {
        let core = self.core.inverse()?;
        Ok(Box::new(Self::new(
            self.target.spheroid().clone(),
            self.source.spheroid().clone(),
            core,
        )))
    }
}
