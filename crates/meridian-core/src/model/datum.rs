//! Geodetic datums and their link to a common reference frame

use meridian_transform::{Spheroid, Unit, Vector3};
use serde::{Deserialize, Serialize};

use super::operation::{OperationInfo, OperationMethod};
use super::parameter::NamedParameter;

/// Method name of the generated datum shift operations
pub const POSITION_VECTOR_GEOCENTRIC: &str = "Position Vector transformation (geocentric domain)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimeMeridian {
    pub name: String,
    pub longitude: f64,
    pub unit: Unit,
}

impl PrimeMeridian {
    pub fn greenwich() -> Self {
        Self {
            name: "Greenwich".to_string(),
            longitude: 0.0,
            unit: Unit::degree(),
        }
    }
}

impl Default for PrimeMeridian {
    fn default() -> Self {
        Self::greenwich()
    }
}

/// Seven parameter shift from a datum to the common reference frame
///
/// Translations are in metres, rotations in arc-seconds (position vector
/// convention) and the scale difference in parts per million.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Helmert7Parameters {
    pub translation: Vector3,
    #[serde(default)]
    pub rotation: Vector3,
    #[serde(default)]
    pub scale_ppm: f64,
}

impl Helmert7Parameters {
    pub fn new(translation: Vector3, rotation: Vector3, scale_ppm: f64) -> Self {
        Self {
            translation,
            rotation,
            scale_ppm,
        }
    }

    pub fn translation_only(translation: Vector3) -> Self {
        Self::new(translation, Vector3::ZERO, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        self.translation.is_zero() && self.rotation.is_zero() && self.scale_ppm == 0.0
    }

    /// Describe the shift as a geocentric position vector operation
    pub fn to_operation(&self, datum_name: &str) -> OperationInfo {
        let t = self.translation;
        let r = self.rotation;
        OperationInfo::new(
            format!("{} to reference frame", datum_name),
            vec![
                NamedParameter::new("X-axis translation", t.x, Unit::metre()),
                NamedParameter::new("Y-axis translation", t.y, Unit::metre()),
                NamedParameter::new("Z-axis translation", t.z, Unit::metre()),
                NamedParameter::new("X-axis rotation", r.x, Unit::arc_second()),
                NamedParameter::new("Y-axis rotation", r.y, Unit::arc_second()),
                NamedParameter::new("Z-axis rotation", r.z, Unit::arc_second()),
                NamedParameter::new("Scale difference", self.scale_ppm, Unit::parts_per_million()),
            ],
        )
        .with_method(OperationMethod::new(POSITION_VECTOR_GEOCENTRIC))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodeticDatum {
    pub name: String,
    pub spheroid: Spheroid,
    #[serde(default)]
    pub prime_meridian: PrimeMeridian,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_reference: Option<Helmert7Parameters>,
    #[serde(default)]
    pub transformable_to_reference: bool,
}

impl GeodeticDatum {
    pub fn new(name: impl Into<String>, spheroid: Spheroid) -> Self {
        Self {
            name: name.into(),
            spheroid,
            prime_meridian: PrimeMeridian::greenwich(),
            to_reference: None,
            transformable_to_reference: false,
        }
    }

    /// A datum that coincides with the reference frame
    pub fn reference(name: impl Into<String>, spheroid: Spheroid) -> Self {
        Self::new(name, spheroid).with_reference_shift(Helmert7Parameters::default())
    }

    pub fn with_reference_shift(mut self, shift: Helmert7Parameters) -> Self {
        self.to_reference = Some(shift);
        self.transformable_to_reference = true;
        self
    }

    /// The reference shift, when the datum declares itself transformable
    pub fn reference_shift(&self) -> Option<&Helmert7Parameters> {
        if self.transformable_to_reference {
            self.to_reference.as_ref()
        } else {
            None
        }
    }
}
