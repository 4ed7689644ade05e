//! Lambert Conic Conformal in its one parallel, two parallel and Belgian forms

use super::{conformal_t, latitude_from_conformal_t};
use crate::coordinate::{GeographicCoordinate, Point2, Vector2};
use crate::spheroid::Spheroid;
use crate::transformation::CoordinateMapping;

/// Belgian 1972 angular correction of 29.2985 arc-seconds
const BELGIUM_THETA_OFFSET: f64 = 0.000_142_043_136_359_877_39;

#[derive(Debug, Clone, PartialEq)]
pub struct LambertConicConformal {
    name: &'static str,
    longitude_of_origin: f64,
    false_offset: Vector2,
    e: f64,
    n: f64,
    af: f64,
    r_origin: f64,
    theta_offset: f64,
}

fn m(latitude: f64, e_squared: f64) -> f64 {
    let sin_lat = latitude.sin();
    latitude.cos() / (1.0 - e_squared * sin_lat * sin_lat).sqrt()
}

impl LambertConicConformal {
    /// Lambert Conic Conformal (1SP)
    pub fn one_standard_parallel(
        origin: GeographicCoordinate,
        scale_factor: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
    ) -> Self {
        let e = spheroid.e();
        let n = origin.latitude.sin();
        let t0 = conformal_t(origin.latitude, e);
        let f = m(origin.latitude, spheroid.e_squared()) / (n * t0.powf(n));
        let af = spheroid.a * f * scale_factor;
        Self {
            name: "Lambert Conic Conformal (1SP)",
            longitude_of_origin: origin.longitude,
            false_offset,
            e,
            n,
            af,
            r_origin: af * t0.powf(n),
            theta_offset: 0.0,
        }
    }

    /// Lambert Conic Conformal (2SP); `origin` is the false origin
    pub fn two_standard_parallels(
        origin: GeographicCoordinate,
        first_parallel: f64,
        second_parallel: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
    ) -> Self {
        let e = spheroid.e();
        let e2 = spheroid.e_squared();
        let m1 = m(first_parallel, e2);
        let t1 = conformal_t(first_parallel, e);
        let n = if first_parallel == second_parallel {
            first_parallel.sin()
        } else {
            let m2 = m(second_parallel, e2);
            let t2 = conformal_t(second_parallel, e);
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };
        let af = spheroid.a * m1 / (n * t1.powf(n));
        Self {
            name: "Lambert Conic Conformal (2SP)",
            longitude_of_origin: origin.longitude,
            false_offset,
            e,
            n,
            af,
            r_origin: af * conformal_t(origin.latitude, e).powf(n),
            theta_offset: 0.0,
        }
    }

    /// Lambert Conic Conformal (2SP Belgium)
    pub fn belgium(
        origin: GeographicCoordinate,
        first_parallel: f64,
        second_parallel: f64,
        false_offset: Vector2,
        spheroid: &Spheroid,
    ) -> Self {
        Self {
            name: "Lambert Conic Conformal (2SP Belgium)",
            theta_offset: BELGIUM_THETA_OFFSET,
            ..Self::two_standard_parallels(
                origin,
                first_parallel,
                second_parallel,
                false_offset,
                spheroid,
            )
        }
    }
}

impl CoordinateMapping for LambertConicConformal {
    type Source = GeographicCoordinate;
    type Target = Point2;

    fn name(&self) -> &str {
        self.name
    }

    fn forward(&self, value: GeographicCoordinate) -> Point2 {
        let r = self.af * conformal_t(value.latitude, self.e).powf(self.n);
        let theta = self.n * (value.longitude - self.longitude_of_origin) - self.theta_offset;
        Point2::new(
            self.false_offset.x + r * theta.sin(),
            self.false_offset.y + self.r_origin - r * theta.cos(),
        )
    }

    fn reverse(&self, value: Point2) -> GeographicCoordinate {
        let dx = value.x - self.false_offset.x;
        let dy = self.r_origin - (value.y - self.false_offset.y);
        let sign = self.n.signum();
        let r = sign * dx.hypot(dy);
        let t = (r / self.af).powf(1.0 / self.n);
        let theta = (sign * dx).atan2(sign * dy);
        GeographicCoordinate::new(
            latitude_from_conformal_t(t, self.e),
            (theta + self.theta_offset) / self.n + self.longitude_of_origin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::test_util::{assert_point, assert_round_trip, dms};
    use crate::units::Unit;

    #[test]
    fn test_lcc_1sp_example() {
        let clarke = Spheroid::from_inverse_flattening(6_378_206.4, 294.978_7, Unit::metre());
        let projection = LambertConicConformal::one_standard_parallel(
            GeographicCoordinate::new(dms(18.0, 0.0, 0.0), dms(-77.0, 0.0, 0.0)),
            1.0,
            Vector2::new(250_000.0, 150_000.0),
            &clarke,
        );
        let start = GeographicCoordinate::new(dms(17.0, 55.0, 55.80), dms(-76.0, 56.0, 37.26));
        assert_point(projection.forward(start), 255_966.58, 142_493.51, 0.01);
        assert_round_trip(&projection, start);
    }

    #[test]
    fn test_lcc_2sp_example_in_feet() {
        let clarke = Spheroid::from_inverse_flattening(
            20_925_832.16,
            294.978_7,
            Unit::us_survey_foot(),
        );
        let projection = LambertConicConformal::two_standard_parallels(
            GeographicCoordinate::new(dms(27.0, 50.0, 0.0), dms(-99.0, 0.0, 0.0)),
            dms(28.0, 23.0, 0.0),
            dms(30.0, 17.0, 0.0),
            Vector2::new(2_000_000.0, 0.0),
            &clarke,
        );
        let start = GeographicCoordinate::new(dms(28.0, 30.0, 0.0), dms(-96.0, 0.0, 0.0));
        assert_point(projection.forward(start), 2_963_503.91, 254_759.80, 0.01);
        assert_round_trip(&projection, start);
    }

    #[test]
    fn test_lcc_belgium_round_trip() {
        let projection = LambertConicConformal::belgium(
            GeographicCoordinate::new(dms(90.0, 0.0, 0.0), dms(4.0, 21.0, 24.983)),
            dms(49.0, 50.0, 0.00204),
            dms(51.0, 10.0, 0.00204),
            Vector2::new(150_000.01256, 5_400_088.4378),
            &Spheroid::international_1924(),
        );
        let start = GeographicCoordinate::new(dms(50.0, 40.0, 46.461), dms(5.0, 48.0, 26.533));
        let plain = LambertConicConformal::two_standard_parallels(
            GeographicCoordinate::new(dms(90.0, 0.0, 0.0), dms(4.0, 21.0, 24.983)),
            dms(49.0, 50.0, 0.00204),
            dms(51.0, 10.0, 0.00204),
            Vector2::new(150_000.01256, 5_400_088.4378),
            &Spheroid::international_1924(),
        );
        assert_ne!(projection.forward(start), plain.forward(start));
        assert_round_trip(&projection, start);
    }

    #[test]
    fn test_lcc_southern_hemisphere_round_trip() {
        let projection = LambertConicConformal::two_standard_parallels(
            GeographicCoordinate::new(dms(-32.0, 0.0, 0.0), dms(135.0, 0.0, 0.0)),
            dms(-28.0, 0.0, 0.0),
            dms(-36.0, 0.0, 0.0),
            Vector2::new(1_000_000.0, 2_000_000.0),
            &Spheroid::grs80(),
        );
        assert_round_trip(
            &projection,
            GeographicCoordinate::new(dms(-37.0, 30.0, 0.0), dms(144.0, 58.0, 0.0)),
        );
    }
}
