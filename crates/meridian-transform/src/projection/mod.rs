//! Map projections
//!
//! Each projection is a [`CoordinateMapping`](crate::CoordinateMapping) from
//! geographic coordinates in radians to planar coordinates in the linear
//! unit of the spheroid it was built with.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

mod equidistant_cylindrical;
mod krovak;
mod lambert_azimuthal;
mod lambert_conic;
mod mercator;

pub use equidistant_cylindrical::{EquidistantCylindrical, EquidistantCylindricalSpherical};
pub use krovak::{Krovak, KrovakModified, KrovakOrientation};
pub use lambert_azimuthal::{LambertAzimuthalEqualArea, LambertAzimuthalEqualAreaSpherical};
pub use lambert_conic::LambertConicConformal;
pub use mercator::{Mercator, PopularVisualisationPseudoMercator};

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

const MAX_ITERATIONS: usize = 32;
const CONVERGENCE: f64 = 1e-14;

/// Isometric latitude term `t` shared by the conformal projections
pub(crate) fn conformal_t(latitude: f64, e: f64) -> f64 {
    let e_sin = e * latitude.sin();
    (FRAC_PI_4 - latitude / 2.0).tan() / ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)
}

/// Invert [`conformal_t`] by fixed point iteration
pub(crate) fn latitude_from_conformal_t(t: f64, e: f64) -> f64 {
    let mut latitude = FRAC_PI_2 - 2.0 * t.atan();
    for _ in 0..MAX_ITERATIONS {
        let e_sin = e * latitude.sin();
        let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)).atan();
        let done = (next - latitude).abs() < CONVERGENCE;
        latitude = next;
        if done {
            break;
        }
    }
    latitude
}

/// Authalic `q` for a latitude; reduces to `2 sin(lat)` on a sphere
pub(crate) fn authalic_q(latitude: f64, e: f64) -> f64 {
    let sin_lat = latitude.sin();
    if e < 1e-12 {
        return 2.0 * sin_lat;
    }
    let e2 = e * e;
    (1.0 - e2)
        * (sin_lat / (1.0 - e2 * sin_lat * sin_lat)
            - (1.0 / (2.0 * e)) * ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).ln())
}

/// Invert [`authalic_q`] with Newton's iteration
pub(crate) fn latitude_from_authalic_q(q: f64, e: f64) -> f64 {
    let mut latitude = (q / 2.0).clamp(-1.0, 1.0).asin();
    if e < 1e-12 {
        return latitude;
    }
    let e2 = e * e;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lat, cos_lat) = latitude.sin_cos();
        if cos_lat.abs() < 1e-15 {
            break;
        }
        let one_minus = 1.0 - e2 * sin_lat * sin_lat;
        let step = one_minus * one_minus / (2.0 * cos_lat)
            * (q / (1.0 - e2) - sin_lat / one_minus
                + (1.0 / (2.0 * e)) * ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).ln());
        latitude += step;
        if step.abs() < CONVERGENCE {
            break;
        }
    }
    latitude
}
