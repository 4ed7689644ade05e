//! Meridian Transform - executable coordinate transformations
//!
//! This crate holds the numeric side of Meridian: coordinate value types,
//! spheroids, units of measure and the projection and datum formulas that
//! compiled operation chains are assembled from.
//!
//! # Main Components
//!
//! - **Transformation**: the object safe trait every executable step implements
//! - **CoordinateMapping**: typed formulas lifted through `Forward`/`Reverse`
//! - **Projections**: Mercator, Krovak, Lambert conic/azimuthal, equidistant cylindrical
//! - **Datum shifts**: Helmert, geocentric translations, geographic offsets
//! - **Units**: categories, scalar and sexagesimal conversions
//!
//! # Example
//!
//! ```
//! use meridian_transform::{
//!     Forward, GeographicCoordinate, Mercator, Spheroid, Transformation, Vector2,
//! };
//!
//! let mercator = Forward::new(Mercator::new(0.0, 1.0, Vector2::ZERO, &Spheroid::wgs84()));
//! let projected = mercator
//!     .transform(GeographicCoordinate::new(0.0, 0.0).into())
//!     .unwrap();
//! assert!(mercator.inverse().unwrap().transform(projected).is_ok());
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod coordinate;
pub mod error;
pub mod geocentric;
pub mod projection;
pub mod spheroid;
pub mod transformation;
pub mod units;

pub use coordinate::{
    Coordinate, CoordinateKind, CoordinateKindName, GeographicCoordinate, Point2, Point3,
    Vector2, Vector3,
};
pub use error::TransformError;
pub use geocentric::{
    GeocentricTransformationGeographicWrapper, GeocentricTranslation, GeographicGeocentric,
    GeographicOffset, Helmert7,
};
pub use projection::{
    EquidistantCylindrical, EquidistantCylindricalSpherical, Krovak, KrovakModified,
    KrovakOrientation, LambertAzimuthalEqualArea, LambertAzimuthalEqualAreaSpherical,
    LambertConicConformal, Mercator, PopularVisualisationPseudoMercator,
};
pub use spheroid::Spheroid;
pub use transformation::{
    AngularElementTransformation, ConcatenatedTransformation, CoordinateMapping, Forward,
    IdentityTransformation, LinearElementTransformation, Reverse, Transformation,
};
pub use units::{find_conversion, Unit, UnitCategory, UnitConversion, UnitScale};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
