//! Coordinate value types
//!
//! Geographic coordinates carry latitude and longitude in whatever angular
//! unit the surrounding pipeline works in; the projection and datum formulas
//! in this crate all expect radians.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair with an optional ellipsoidal height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeographicCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    /// Height above the ellipsoid; projections ignore it and datum shifts carry it
    #[serde(default)]
    pub height: f64,
}

impl GeographicCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self::with_height(latitude, longitude, 0.0)
    }

    pub const fn with_height(latitude: f64, longitude: f64, height: f64) -> Self {
        Self {
            latitude,
            longitude,
            height,
        }
    }
}

/// A planar (projected) point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, offset: Vector2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    pub fn difference(self, offset: Vector2) -> Self {
        Self::new(self.x - offset.x, self.y - offset.y)
    }
}

/// A planar displacement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An earth-centred cartesian point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, delta: Vector3) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }

    pub fn difference(self, delta: Vector3) -> Self {
        Self::new(self.x - delta.x, self.y - delta.y, self.z - delta.z)
    }
}

/// A cartesian displacement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Any coordinate flowing through a transformation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coordinate {
    Geographic(GeographicCoordinate),
    Projected(Point2),
    Geocentric(Point3),
}

impl Coordinate {
    pub fn kind(&self) -> CoordinateKindName {
        match self {
            Coordinate::Geographic(_) => CoordinateKindName::Geographic,
            Coordinate::Projected(_) => CoordinateKindName::Projected,
            Coordinate::Geocentric(_) => CoordinateKindName::Geocentric,
        }
    }
}

impl From<GeographicCoordinate> for Coordinate {
    fn from(value: GeographicCoordinate) -> Self {
        Coordinate::Geographic(value)
    }
}

impl From<Point2> for Coordinate {
    fn from(value: Point2) -> Self {
        Coordinate::Projected(value)
    }
}

impl From<Point3> for Coordinate {
    fn from(value: Point3) -> Self {
        Coordinate::Geocentric(value)
    }
}

/// Names the variants of [`Coordinate`] for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateKindName {
    Geographic,
    Projected,
    Geocentric,
}

impl fmt::Display for CoordinateKindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateKindName::Geographic => write!(f, "geographic"),
            CoordinateKindName::Projected => write!(f, "projected"),
            CoordinateKindName::Geocentric => write!(f, "geocentric"),
        }
    }
}

/// A concrete coordinate type that can travel inside [`Coordinate`]
pub trait CoordinateKind: Copy + fmt::Debug + Send + Sync + 'static {
    const KIND: CoordinateKindName;

    fn from_coordinate(value: Coordinate) -> Option<Self>;

    fn into_coordinate(self) -> Coordinate;
}

impl CoordinateKind for GeographicCoordinate {
    const KIND: CoordinateKindName = CoordinateKindName::Geographic;

    fn from_coordinate(value: Coordinate) -> Option<Self> {
        match value {
            Coordinate::Geographic(g) => Some(g),
            _ => None,
        }
    }

    fn into_coordinate(self) -> Coordinate {
        Coordinate::Geographic(self)
    }
}

impl CoordinateKind for Point2 {
    const KIND: CoordinateKindName = CoordinateKindName::Projected;

    fn from_coordinate(value: Coordinate) -> Option<Self> {
        match value {
            Coordinate::Projected(p) => Some(p),
            _ => None,
        }
    }

    fn into_coordinate(self) -> Coordinate {
        Coordinate::Projected(self)
    }
}

impl CoordinateKind for Point3 {
    const KIND: CoordinateKindName = CoordinateKindName::Geocentric;

    fn from_coordinate(value: Coordinate) -> Option<Self> {
        match value {
            Coordinate::Geocentric(p) => Some(p),
            _ => None,
        }
    }

    fn into_coordinate(self) -> Coordinate {
        Coordinate::Geocentric(self)
    }
}
