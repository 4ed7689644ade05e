//! Krovak oblique conformal conic and its modified and north orientated forms
//!
//! Planar output follows the Krovak convention: `x` holds the southing and
//! `y` the westing. North orientated variants negate both and swap them so
//! `x` is easting and `y` northing.

use std::f64::consts::FRAC_PI_4;

use crate::coordinate::{GeographicCoordinate, Point2, Vector2};
use crate::spheroid::Spheroid;
use crate::transformation::CoordinateMapping;

const MAX_ITERATIONS: usize = 32;

/// Axis orientation of the planar output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KrovakOrientation {
    /// Southing and westing
    SouthWest,
    /// Easting and northing
    North,
}

impl KrovakOrientation {
    fn apply(self, south_west: Point2) -> Point2 {
        match self {
            KrovakOrientation::SouthWest => south_west,
            KrovakOrientation::North => Point2::new(-south_west.y, -south_west.x),
        }
    }

    fn remove(self, oriented: Point2) -> Point2 {
        match self {
            KrovakOrientation::SouthWest => oriented,
            KrovakOrientation::North => Point2::new(-oriented.y, -oriented.x),
        }
    }
}

/// Krovak oblique conic conformal
#[derive(Debug, Clone, PartialEq)]
pub struct Krovak {
    orientation: KrovakOrientation,
    longitude_of_origin: f64,
    latitude_of_pseudo_standard_parallel: f64,
    azimuth_of_initial_line: f64,
    false_offset: Vector2,
    e: f64,
    b: f64,
    t0: f64,
    n: f64,
    r0: f64,
    pseudo_parallel_term: f64,
}

impl Krovak {
    /// `origin` holds the latitude of the projection centre and the
    /// longitude of origin. `false_offset.x` is applied to the westing and
    /// `false_offset.y` to the southing.
    pub fn new(
        origin: GeographicCoordinate,
        latitude_of_pseudo_standard_parallel: f64,
        azimuth_of_initial_line: f64,
        scale_factor: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
    ) -> Self {
        let e2 = spheroid.e_squared();
        let e = spheroid.e();
        let latitude_of_centre = origin.latitude;
        let (sin_centre, cos_centre) = latitude_of_centre.sin_cos();

        let a = spheroid.a * (1.0 - e2).sqrt() / (1.0 - e2 * sin_centre * sin_centre);
        let b = (1.0 + e2 * cos_centre.powi(4) / (1.0 - e2)).sqrt();
        let gamma0 = (sin_centre / b).asin();
        let t0 = (FRAC_PI_4 + gamma0 / 2.0).tan()
            * ((1.0 + e * sin_centre) / (1.0 - e * sin_centre)).powf(e * b / 2.0)
            / (FRAC_PI_4 + latitude_of_centre / 2.0).tan().powf(b);
        let n = latitude_of_pseudo_standard_parallel.sin();
        let r0 = scale_factor * a / latitude_of_pseudo_standard_parallel.tan();
        let pseudo_parallel_term =
            (FRAC_PI_4 + latitude_of_pseudo_standard_parallel / 2.0).tan();

        Self {
            orientation: KrovakOrientation::SouthWest,
            longitude_of_origin: origin.longitude,
            latitude_of_pseudo_standard_parallel,
            azimuth_of_initial_line,
            false_offset,
            e,
            b,
            t0,
            n,
            r0,
            pseudo_parallel_term,
        }
    }

    /// The same projection with easting/northing output
    pub fn north_orientated(self) -> Self {
        Self {
            orientation: KrovakOrientation::North,
            ..self
        }
    }

    pub fn orientation(&self) -> KrovakOrientation {
        self.orientation
    }

    fn without_offset(&self) -> Self {
        Self {
            orientation: KrovakOrientation::SouthWest,
            false_offset: Vector2::ZERO,
            ..self.clone()
        }
    }

    fn project_south_west(&self, value: GeographicCoordinate) -> Point2 {
        let e_sin = self.e * value.latitude.sin();
        let u = 2.0
            * ((self.t0 * (value.latitude / 2.0 + FRAC_PI_4).tan().powf(self.b)
                / ((1.0 + e_sin) / (1.0 - e_sin)).powf(self.e * self.b / 2.0))
            .atan()
                - FRAC_PI_4);
        let v = self.b * (self.longitude_of_origin - value.longitude);
        let (sin_alpha, cos_alpha) = self.azimuth_of_initial_line.sin_cos();
        let t = (cos_alpha * u.sin() + sin_alpha * u.cos() * v.cos()).asin();
        let d = (u.cos() * v.sin() / t.cos()).asin();
        let theta = self.n * d;
        let r = self.r0 * self.pseudo_parallel_term.powf(self.n)
            / (t / 2.0 + FRAC_PI_4).tan().powf(self.n);
        Point2::new(
            r * theta.cos() + self.false_offset.y,
            r * theta.sin() + self.false_offset.x,
        )
    }

    fn unproject_south_west(&self, value: Point2) -> GeographicCoordinate {
        let xp = value.x - self.false_offset.y;
        let yp = value.y - self.false_offset.x;
        let r = xp.hypot(yp);
        let theta = yp.atan2(xp);
        let d = theta / self.latitude_of_pseudo_standard_parallel.sin();
        let t = 2.0
            * (((self.r0 / r).powf(1.0 / self.n) * self.pseudo_parallel_term).atan() - FRAC_PI_4);
        let (sin_alpha, cos_alpha) = self.azimuth_of_initial_line.sin_cos();
        let u = (cos_alpha * t.sin() - sin_alpha * t.cos() * d.cos()).asin();
        let v = (t.cos() * d.sin() / u.cos()).asin();
        let longitude = self.longitude_of_origin - v / self.b;

        let base = self.t0.powf(-1.0 / self.b) * (u / 2.0 + FRAC_PI_4).tan().powf(1.0 / self.b);
        let mut latitude = u;
        for _ in 0..MAX_ITERATIONS {
            let e_sin = self.e * latitude.sin();
            let next = 2.0
                * ((base * ((1.0 + e_sin) / (1.0 - e_sin)).powf(self.e / 2.0)).atan() - FRAC_PI_4);
            let done = (next - latitude).abs() < 1e-15;
            latitude = next;
            if done {
                break;
            }
        }
        GeographicCoordinate::new(latitude, longitude)
    }
}

impl CoordinateMapping for Krovak {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        match self.orientation {
            KrovakOrientation::SouthWest => "Krovak",
            KrovakOrientation::North => "Krovak (North Orientated)",
        }
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        self.orientation.apply(self.project_south_west(value))
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        self.unproject_south_west(self.orientation.remove(value))
    }
}

/// Krovak with the polynomial correction fitted for S-JTSK/05
#[derive(Debug, Clone, PartialEq)]
pub struct KrovakModified {
    core: Krovak,
    orientation: KrovakOrientation,
    false_offset: Vector2,
    evaluation_point: Point2,
    constants: [f64; 10],
}

impl KrovakModified {
    /// `evaluation_point` is expressed in southing/westing; `constants`
    /// holds C1 through C10 in order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin: GeographicCoordinate,
        latitude_of_pseudo_standard_parallel: f64,
        azimuth_of_initial_line: f64,
        scale_factor: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
        evaluation_point: Point2,
        constants: [f64; 10],
    ) -> Self {
        let core = Krovak::new(
            origin,
            latitude_of_pseudo_standard_parallel,
            azimuth_of_initial_line,
            scale_factor,
            false_offset,
            spheroid,
        )
        .without_offset();
        Self {
            core,
            orientation: KrovakOrientation::SouthWest,
            false_offset,
            evaluation_point,
            constants,
        }
    }

    pub fn north_orientated(self) -> Self {
        Self {
            orientation: KrovakOrientation::North,
            ..self
        }
    }

    fn correction(&self, p: Point2) -> Vector2 {
        let [c1, c2, c3, c4, c5, c6, c7, c8, c9, c10] = self.constants;
        let xr = p.x - self.evaluation_point.x;
        let yr = p.y - self.evaluation_point.y;
        let x2 = xr * xr;
        let y2 = yr * yr;
        let k3 = 2.0 * xr * yr;
        let k4 = x2 - y2;
        let k5 = (x2 - 3.0 * y2) * xr;
        let k6 = (3.0 * x2 - y2) * yr;
        let k7 = 2.0 * k3 * k4;
        let k8 = x2 * x2 + y2 * y2 - 6.0 * x2 * y2;
        Vector2::new(
            c1 + c3 * xr - c4 * yr - c6 * k3 + c5 * k4 + c7 * k5 - c8 * k6 + c9 * k7 + c10 * k8,
            c2 + c3 * yr + c4 * xr + c5 * k3 + c6 * k4 + c8 * k5 + c7 * k6 - c10 * k7 + c9 * k8,
        )
    }

    fn offset(&self) -> Vector2 {
        // southing takes the false northing, westing the false easting
        Vector2::new(self.false_offset.y, self.false_offset.x)
    }
}

impl CoordinateMapping for KrovakModified {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        match self.orientation {
            KrovakOrientation::SouthWest => "Krovak Modified",
            KrovakOrientation::North => "Krovak Modified (North Orientated)",
        }
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        let p = self.core.project_south_west(value);
        let south_west = p.difference(self.correction(p)).add(self.offset());
        self.orientation.apply(south_west)
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        let corrected = self.orientation.remove(value).difference(self.offset());
        // p - correction(p) = corrected, solved by fixed point iteration
        let mut p = corrected;
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            let next = corrected.add(self.correction(p));
            converged = (next.x - p.x).abs() < 1e-10 && (next.y - p.y).abs() < 1e-10;
            p = next;
            if converged {
                break;
            }
        }
        if !converged {
            log::debug!(
                "Krovak Modified correction did not converge at ({}, {})",
                value.x,
                value.y
            );
        }
        self.core.unproject_south_west(p)
    }
}
