//! Coordinate reference systems
//!
//! The kinds of CRS form a closed set, so every consumer matches on
//! [`CrsDefinition`] exhaustively.

use std::fmt;

use meridian_transform::{Spheroid, Unit};
use serde::{Deserialize, Serialize};

use super::area::AreaOfUse;
use super::datum::GeodeticDatum;
use super::operation::OperationInfo;

/// Registry code of a CRS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrsCode(pub u32);

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrsKind {
    Geographic,
    Geocentric,
    Projected,
    Vertical,
    Compound,
    Engineering,
}

impl fmt::Display for CrsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrsKind::Geographic => "geographic",
            CrsKind::Geocentric => "geocentric",
            CrsKind::Projected => "projected",
            CrsKind::Vertical => "vertical",
            CrsKind::Compound => "compound",
            CrsKind::Engineering => "engineering",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrientation {
    North,
    South,
    East,
    West,
    Up,
    Down,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub orientation: AxisOrientation,
}

impl Axis {
    pub fn new(name: impl Into<String>, orientation: AxisOrientation) -> Self {
        Self {
            name: name.into(),
            orientation,
        }
    }
}

/// Shared shape of geographic and geocentric CRSs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodeticCrs {
    pub datum: GeodeticDatum,
    pub unit: Unit,
    #[serde(default)]
    pub axes: Vec<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCrs {
    pub base: CrsCode,
    pub datum: GeodeticDatum,
    pub projection: OperationInfo,
    pub unit: Unit,
    #[serde(default)]
    pub axes: Vec<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalCrs {
    pub datum: String,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundCrs {
    pub horizontal: CrsCode,
    pub vertical: CrsCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeringCrs {
    pub datum: String,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrsDefinition {
    Geographic(GeodeticCrs),
    Geocentric(GeodeticCrs),
    Projected(ProjectedCrs),
    Vertical(VerticalCrs),
    Compound(CompoundCrs),
    Engineering(EngineeringCrs),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    pub code: CrsCode,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaOfUse>,
    pub definition: CrsDefinition,
}

impl Crs {
    pub fn new(code: u32, name: impl Into<String>, definition: CrsDefinition) -> Self {
        Self {
            code: CrsCode(code),
            name: name.into(),
            area: None,
            definition,
        }
    }

    pub fn geographic(code: u32, name: impl Into<String>, datum: GeodeticDatum) -> Self {
        Self::new(
            code,
            name,
            CrsDefinition::Geographic(GeodeticCrs {
                datum,
                unit: Unit::degree(),
                axes: Vec::new(),
            }),
        )
    }

    pub fn geocentric(code: u32, name: impl Into<String>, datum: GeodeticDatum) -> Self {
        Self::new(
            code,
            name,
            CrsDefinition::Geocentric(GeodeticCrs {
                datum,
                unit: Unit::metre(),
                axes: Vec::new(),
            }),
        )
    }

    /// A projected CRS over `base`; the datum is copied from it
    pub fn projected(
        code: u32,
        name: impl Into<String>,
        base: &Crs,
        projection: OperationInfo,
        unit: Unit,
    ) -> Option<Self> {
        let datum = base.geodetic_datum()?.clone();
        Some(Self::new(
            code,
            name,
            CrsDefinition::Projected(ProjectedCrs {
                base: base.code,
                datum,
                projection,
                unit,
                axes: Vec::new(),
            }),
        ))
    }

    pub fn vertical(code: u32, name: impl Into<String>, datum: impl Into<String>) -> Self {
        Self::new(
            code,
            name,
            CrsDefinition::Vertical(VerticalCrs {
                datum: datum.into(),
                unit: Unit::metre(),
            }),
        )
    }

    pub fn compound(code: u32, name: impl Into<String>, horizontal: CrsCode, vertical: CrsCode) -> Self {
        Self::new(
            code,
            name,
            CrsDefinition::Compound(CompoundCrs {
                horizontal,
                vertical,
            }),
        )
    }

    pub fn engineering(code: u32, name: impl Into<String>, datum: impl Into<String>) -> Self {
        Self::new(
            code,
            name,
            CrsDefinition::Engineering(EngineeringCrs {
                datum: datum.into(),
                unit: Unit::metre(),
            }),
        )
    }

    pub fn with_area(mut self, area: AreaOfUse) -> Self {
        self.area = Some(area);
        self
    }

    /// Replace the coordinate unit; ignored for compound CRSs
    pub fn with_unit(mut self, unit: Unit) -> Self {
        match &mut self.definition {
            CrsDefinition::Geographic(g) | CrsDefinition::Geocentric(g) => g.unit = unit,
            CrsDefinition::Projected(p) => p.unit = unit,
            CrsDefinition::Vertical(v) => v.unit = unit,
            CrsDefinition::Engineering(e) => e.unit = unit,
            CrsDefinition::Compound(_) => {}
        }
        self
    }

    pub fn kind(&self) -> CrsKind {
        match &self.definition {
            CrsDefinition::Geographic(_) => CrsKind::Geographic,
            CrsDefinition::Geocentric(_) => CrsKind::Geocentric,
            CrsDefinition::Projected(_) => CrsKind::Projected,
            CrsDefinition::Vertical(_) => CrsKind::Vertical,
            CrsDefinition::Compound(_) => CrsKind::Compound,
            CrsDefinition::Engineering(_) => CrsKind::Engineering,
        }
    }

    /// Whether the path finders can route to and from this kind
    pub fn is_routable(&self) -> bool {
        matches!(
            self.kind(),
            CrsKind::Geographic | CrsKind::Geocentric | CrsKind::Projected
        )
    }

    pub fn unit(&self) -> Option<&Unit> {
        match &self.definition {
            CrsDefinition::Geographic(g) | CrsDefinition::Geocentric(g) => Some(&g.unit),
            CrsDefinition::Projected(p) => Some(&p.unit),
            CrsDefinition::Vertical(v) => Some(&v.unit),
            CrsDefinition::Engineering(e) => Some(&e.unit),
            CrsDefinition::Compound(_) => None,
        }
    }

    pub fn geodetic_datum(&self) -> Option<&GeodeticDatum> {
        match &self.definition {
            CrsDefinition::Geographic(g) | CrsDefinition::Geocentric(g) => Some(&g.datum),
            CrsDefinition::Projected(p) => Some(&p.datum),
            CrsDefinition::Vertical(_)
            | CrsDefinition::Compound(_)
            | CrsDefinition::Engineering(_) => None,
        }
    }

    pub fn spheroid(&self) -> Option<&Spheroid> {
        self.geodetic_datum().map(|datum| &datum.spheroid)
    }

    pub fn as_projected(&self) -> Option<&ProjectedCrs> {
        match &self.definition {
            CrsDefinition::Projected(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NamedParameter;

    fn wgs84() -> Crs {
        Crs::geographic(4326, "WGS 84", GeodeticDatum::reference("WGS 84", Spheroid::wgs84()))
    }

    #[test]
    fn test_projected_copies_datum() {
        let base = wgs84();
        let mercator = OperationInfo::new(
            "World Mercator",
            vec![NamedParameter::new("Longitude of natural origin", 0.0, Unit::degree())],
        );
        let projected = Crs::projected(3395, "WGS 84 / World Mercator", &base, mercator, Unit::metre())
            .unwrap();
        assert_eq!(projected.kind(), CrsKind::Projected);
        assert_eq!(projected.as_projected().unwrap().base, CrsCode(4326));
        assert_eq!(projected.spheroid(), base.spheroid());
        assert!(projected.is_routable());
    }

    #[test]
    fn test_non_geodetic_kinds() {
        let vertical = Crs::vertical(5703, "NAVD88 height", "North American Vertical Datum 1988");
        assert_eq!(vertical.kind(), CrsKind::Vertical);
        assert!(vertical.geodetic_datum().is_none());
        assert!(!vertical.is_routable());
        assert!(Crs::projected(1, "bad", &vertical, OperationInfo::new("x", vec![]), Unit::metre()).is_none());

        let compound = Crs::compound(5498, "NAD83 + NAVD88", CrsCode(4269), CrsCode(5703));
        assert!(compound.unit().is_none());
    }

    #[test]
    fn test_crs_json_shape() {
        let json = serde_json::to_value(wgs84()).unwrap();
        assert_eq!(json["code"], 4326);
        assert_eq!(json["definition"]["kind"], "geographic");
        let back: Crs = serde_json::from_value(json).unwrap();
        assert_eq!(back, wgs84());
    }
}
