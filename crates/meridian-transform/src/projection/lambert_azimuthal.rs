//! Lambert Azimuthal Equal Area, ellipsoidal and spherical

use super::{authalic_q, latitude_from_authalic_q};
use crate::coordinate::{GeographicCoordinate, Point2, Vector2};
use crate::spheroid::Spheroid;
use crate::transformation::CoordinateMapping;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Aspect {
    Oblique,
    NorthPole,
    SouthPole,
}

fn aspect_of(latitude_of_origin: f64) -> Aspect {
    let distance_to_pole = std::f64::consts::FRAC_PI_2 - latitude_of_origin.abs();
    if distance_to_pole.abs() > 1e-10 {
        Aspect::Oblique
    } else if latitude_of_origin > 0.0 {
        Aspect::NorthPole
    } else {
        Aspect::SouthPole
    }
}

/// Ellipsoidal Lambert Azimuthal Equal Area
#[derive(Debug, Clone, PartialEq)]
pub struct LambertAzimuthalEqualArea {
    origin: GeographicCoordinate,
    false_offset: Vector2,
    aspect: Aspect,
    a: f64,
    e: f64,
    qp: f64,
    rq: f64,
    sin_beta0: f64,
    cos_beta0: f64,
    d: f64,
}

impl LambertAzimuthalEqualArea {
    pub fn new(origin: GeographicCoordinate, false_offset: Vector2, spheroid: &Spheroid) -> Self {
        let e = spheroid.e();
        let a = spheroid.a;
        let qp = authalic_q(std::f64::consts::FRAC_PI_2, e);
        let rq = a * (qp / 2.0).sqrt();
        let beta0 = (authalic_q(origin.latitude, e) / qp).clamp(-1.0, 1.0).asin();
        let (sin_beta0, cos_beta0) = beta0.sin_cos();
        let aspect = aspect_of(origin.latitude);
        let d = match aspect {
            Aspect::Oblique => {
                let sin_lat = origin.latitude.sin();
                a * (origin.latitude.cos() / (1.0 - e * e * sin_lat * sin_lat).sqrt())
                    / (rq * cos_beta0)
            }
            _ => 1.0,
        };
        Self {
            origin,
            false_offset,
            aspect,
            a,
            e,
            qp,
            rq,
            sin_beta0,
            cos_beta0,
            d,
        }
    }
}

impl CoordinateMapping for LambertAzimuthalEqualArea {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        "Lambert Azimuthal Equal Area"
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        let q = authalic_q(value.latitude, self.e);
        let delta_lon = value.longitude - self.origin.longitude;
        let (sin_dl, cos_dl) = delta_lon.sin_cos();
        match self.aspect {
            Aspect::Oblique => {
                let beta = (q / self.qp).clamp(-1.0, 1.0).asin();
                let (sin_beta, cos_beta) = beta.sin_cos();
                let b = self.rq
                    * (2.0 / (1.0 + self.sin_beta0 * sin_beta + self.cos_beta0 * cos_beta * cos_dl))
                        .sqrt();
                Point2::new(
                    self.false_offset.x + b * self.d * cos_beta * sin_dl,
                    self.false_offset.y
                        + (b / self.d)
                            * (self.cos_beta0 * sin_beta - self.sin_beta0 * cos_beta * cos_dl),
                )
            }
            Aspect::NorthPole => {
                let rho = self.a * (self.qp - q).max(0.0).sqrt();
                Point2::new(
                    self.false_offset.x + rho * sin_dl,
                    self.false_offset.y - rho * cos_dl,
                )
            }
            Aspect::SouthPole => {
                let rho = self.a * (self.qp + q).max(0.0).sqrt();
                Point2::new(
                    self.false_offset.x + rho * sin_dl,
                    self.false_offset.y + rho * cos_dl,
                )
            }
        }
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        let dx = value.x - self.false_offset.x;
        let dy = value.y - self.false_offset.y;
        match self.aspect {
            Aspect::Oblique => {
                let rho = (dx / self.d).hypot(self.d * dy);
                if rho < 1e-12 {
                    return self.origin;
                }
                let c = 2.0 * (rho / (2.0 * self.rq)).clamp(-1.0, 1.0).asin();
                let (sin_c, cos_c) = c.sin_cos();
                let beta = (cos_c * self.sin_beta0 + self.d * dy * sin_c * self.cos_beta0 / rho)
                    .clamp(-1.0, 1.0)
                    .asin();
                let longitude = self.origin.longitude
                    + (dx * sin_c).atan2(
                        self.d * rho * self.cos_beta0 * cos_c
                            - self.d * self.d * dy * self.sin_beta0 * sin_c,
                    );
                GeographicCoordinate::new(
                    latitude_from_authalic_q(self.qp * beta.sin(), self.e),
                    longitude,
                )
            }
            Aspect::NorthPole => {
                let rho = dx.hypot(dy);
                let q = self.qp - rho * rho / (self.a * self.a);
                GeographicCoordinate::new(
                    latitude_from_authalic_q(q, self.e),
                    self.origin.longitude + dx.atan2(-dy),
                )
            }
            Aspect::SouthPole => {
                let rho = dx.hypot(dy);
                let q = rho * rho / (self.a * self.a) - self.qp;
                GeographicCoordinate::new(
                    latitude_from_authalic_q(q, self.e),
                    self.origin.longitude + dx.atan2(dy),
                )
            }
        }
    }
}

/// Lambert Azimuthal Equal Area on the authalic sphere
#[derive(Debug, Clone, PartialEq)]
pub struct LambertAzimuthalEqualAreaSpherical {
    origin: GeographicCoordinate,
    false_offset: Vector2,
    radius: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl LambertAzimuthalEqualAreaSpherical {
    pub fn new(origin: GeographicCoordinate, false_offset: Vector2, spheroid: &Spheroid) -> Self {
        let qp = authalic_q(std::f64::consts::FRAC_PI_2, spheroid.e());
        let (sin_lat0, cos_lat0) = origin.latitude.sin_cos();
        Self {
            origin,
            false_offset,
            radius: spheroid.a * (qp / 2.0).sqrt(),
            sin_lat0,
            cos_lat0,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl CoordinateMapping for LambertAzimuthalEqualAreaSpherical {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        "Lambert Azimuthal Equal Area (Spherical)"
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        let (sin_lat, cos_lat) = value.latitude.sin_cos();
        let (sin_dl, cos_dl) = (value.longitude - self.origin.longitude).sin_cos();
        let k = (2.0 / (1.0 + self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * cos_dl)).sqrt();
        Point2::new(
            self.false_offset.x + self.radius * k * cos_lat * sin_dl,
            self.false_offset.y
                + self.radius * k * (self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * cos_dl),
        )
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        let dx = value.x - self.false_offset.x;
        let dy = value.y - self.false_offset.y;
        let rho = dx.hypot(dy);
        if rho < 1e-12 {
            return self.origin;
        }
        let c = 2.0 * (rho / (2.0 * self.radius)).clamp(-1.0, 1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();
        GeographicCoordinate::new(
            (cos_c * self.sin_lat0 + dy * sin_c * self.cos_lat0 / rho)
                .clamp(-1.0, 1.0)
                .asin(),
            self.origin.longitude
                + (dx * sin_c)
                    .atan2(rho * self.cos_lat0 * cos_c - dy * self.sin_lat0 * sin_c),
        )
    }
}
