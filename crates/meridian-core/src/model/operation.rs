//! Coordinate operation descriptions
//!
//! An [`OperationInfo`] is a cheap handle onto a shared definition plus a
//! direction flag. Inverting it flips the flag; the definition itself is
//! never copied.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::area::AreaOfUse;
use super::crs::CrsCode;
use super::parameter::NamedParameter;
use crate::error::{Error, Result};
use crate::naming::normalize_parameter_name;

fn default_true() -> bool {
    true
}

/// How a method uses one of its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterUsage {
    pub name: String,
    /// The value changes sign when the operation is applied in reverse
    #[serde(default)]
    pub sign_reversal: bool,
}

/// An operation method as catalogued by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationMethod {
    pub name: String,
    #[serde(default = "default_true")]
    pub reversible: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterUsage>,
}

impl OperationMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reversible: true,
            parameters: Vec::new(),
        }
    }

    pub fn with_usage(mut self, name: impl Into<String>, sign_reversal: bool) -> Self {
        self.parameters.push(ParameterUsage {
            name: name.into(),
            sign_reversal,
        });
        self
    }
}

/// The shared, direction independent part of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<OperationMethod>,
    #[serde(default)]
    pub parameters: Vec<NamedParameter>,
    /// Non-empty for concatenated operations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<OperationInfo>,
    #[serde(default = "default_true")]
    pub has_inverse: bool,
    /// Accuracy in metres, when published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaOfUse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_crs: Option<CrsCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_crs: Option<CrsCode>,
}

/// A handle onto an operation definition in a given direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationInfo {
    definition: Arc<OperationDefinition>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    inverted: bool,
}

impl OperationInfo {
    /// A single, invertible operation
    pub fn new(name: impl Into<String>, parameters: Vec<NamedParameter>) -> Self {
        Self::from_definition(OperationDefinition {
            code: None,
            name: name.into(),
            method: None,
            parameters,
            steps: Vec::new(),
            has_inverse: true,
            accuracy: None,
            area: None,
            source_crs: None,
            target_crs: None,
        })
    }

    /// A chain of operations run in order
    pub fn concatenated(name: impl Into<String>, steps: Vec<OperationInfo>) -> Self {
        let mut operation = Self::new(name, Vec::new());
        Arc::make_mut(&mut operation.definition).steps = steps;
        operation
    }

    pub fn from_definition(definition: OperationDefinition) -> Self {
        Self {
            definition: Arc::new(definition),
            inverted: false,
        }
    }

    fn edit(mut self, change: impl FnOnce(&mut OperationDefinition)) -> Self {
        change(Arc::make_mut(&mut self.definition));
        self
    }

    pub fn with_code(self, code: u32) -> Self {
        self.edit(|d| d.code = Some(code))
    }

    pub fn with_method(self, method: OperationMethod) -> Self {
        self.edit(|d| {
            if !method.reversible {
                d.has_inverse = false;
            }
            d.method = Some(method);
        })
    }

    pub fn with_crs(self, source: CrsCode, target: CrsCode) -> Self {
        self.edit(|d| {
            d.source_crs = Some(source);
            d.target_crs = Some(target);
        })
    }

    pub fn with_accuracy(self, accuracy: f64) -> Self {
        self.edit(|d| d.accuracy = Some(accuracy))
    }

    pub fn with_area(self, area: AreaOfUse) -> Self {
        self.edit(|d| d.area = Some(area))
    }

    /// Mark the operation as having no inverse
    pub fn one_way(self) -> Self {
        self.edit(|d| d.has_inverse = false)
    }

    pub fn definition(&self) -> &OperationDefinition {
        &self.definition
    }

    /// The defining direction of this operation
    pub fn as_defined(&self) -> OperationInfo {
        Self {
            definition: Arc::clone(&self.definition),
            inverted: false,
        }
    }

    /// The registry name of the definition, regardless of direction
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// A name that reflects the direction
    pub fn display_name(&self) -> String {
        if self.inverted {
            format!("Inverse of {}", self.definition.name)
        } else {
            self.definition.name.clone()
        }
    }

    pub fn code(&self) -> Option<u32> {
        self.definition.code
    }

    pub fn method(&self) -> Option<&OperationMethod> {
        self.definition.method.as_ref()
    }

    pub fn parameters(&self) -> &[NamedParameter] {
        &self.definition.parameters
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.definition.accuracy
    }

    pub fn area(&self) -> Option<&AreaOfUse> {
        self.definition.area.as_ref()
    }

    pub fn is_concatenated(&self) -> bool {
        !self.definition.steps.is_empty()
    }

    pub fn is_inverse_of_definition(&self) -> bool {
        self.inverted
    }

    pub fn has_inverse(&self) -> bool {
        if self.is_concatenated() {
            self.definition.steps.iter().all(OperationInfo::has_inverse)
        } else {
            self.definition.has_inverse
        }
    }

    /// The opposite direction, sharing this definition
    pub fn inverse(&self) -> Result<OperationInfo> {
        if !self.has_inverse() {
            return Err(Error::NoInverse {
                operation: self.display_name(),
            });
        }
        Ok(self.flipped())
    }

    fn flipped(&self) -> OperationInfo {
        Self {
            definition: Arc::clone(&self.definition),
            inverted: !self.inverted,
        }
    }

    pub fn source_crs(&self) -> Option<CrsCode> {
        if self.inverted {
            self.definition.target_crs
        } else {
            self.definition.source_crs
        }
    }

    pub fn target_crs(&self) -> Option<CrsCode> {
        if self.inverted {
            self.definition.source_crs
        } else {
            self.definition.target_crs
        }
    }

    /// Steps in execution order for this direction
    pub fn steps(&self) -> Vec<OperationInfo> {
        if self.inverted {
            self.definition
                .steps
                .iter()
                .rev()
                .map(OperationInfo::flipped)
                .collect()
        } else {
            self.definition.steps.clone()
        }
    }

    /// Parameters with the method's sign reversal applied when running in
    /// reverse, for methods that reverse by negation
    pub fn sign_reversed_parameters(&self) -> Vec<NamedParameter> {
        let Some(method) = self.method().filter(|_| self.inverted) else {
            return self.parameters().to_vec();
        };
        self.parameters()
            .iter()
            .map(|parameter| {
                let key = normalize_parameter_name(&parameter.name);
                let reversed = method.parameters.iter().any(|usage| {
                    usage.sign_reversal && normalize_parameter_name(&usage.name) == key
                });
                match parameter.as_f64() {
                    Some(value) if reversed => parameter.with_value(-value),
                    _ => parameter.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_transform::Unit;

    fn offset_operation() -> OperationInfo {
        OperationInfo::new(
            "Longitude rotation",
            vec![NamedParameter::new("Longitude offset", 2.337_229_17, Unit::degree())],
        )
        .with_method(OperationMethod::new("Longitude rotation").with_usage("Longitude offset", true))
        .with_crs(CrsCode(4807), CrsCode(4275))
    }

    #[test]
    fn test_inverse_is_a_proxy() {
        let forward = offset_operation();
        let inverse = forward.inverse().unwrap();
        assert!(inverse.is_inverse_of_definition());
        assert!(Arc::ptr_eq(&forward.definition, &inverse.definition));
        assert_eq!(inverse.source_crs(), Some(CrsCode(4275)));
        assert_eq!(inverse.target_crs(), Some(CrsCode(4807)));
        assert_eq!(inverse.display_name(), "Inverse of Longitude rotation");
        assert_eq!(inverse.inverse().unwrap(), forward);
    }

    #[test]
    fn test_one_way_has_no_inverse() {
        let operation = OperationInfo::new("Grid shift", Vec::new()).one_way();
        assert!(matches!(operation.inverse(), Err(Error::NoInverse { .. })));

        let irreversible = OperationInfo::new("Polynomial", Vec::new()).with_method(OperationMethod {
            name: "Polynomial".to_string(),
            reversible: false,
            parameters: Vec::new(),
        });
        assert!(!irreversible.has_inverse());
    }

    #[test]
    fn test_concatenated_steps_reverse() {
        let a = OperationInfo::new("A", Vec::new());
        let b = OperationInfo::new("B", Vec::new());
        let chain = OperationInfo::concatenated("A then B", vec![a, b]);
        assert!(chain.is_concatenated());
        let steps = chain.inverse().unwrap().steps();
        assert_eq!(steps[0].name(), "B");
        assert!(steps[0].is_inverse_of_definition());
        assert_eq!(steps[1].name(), "A");

        let blocked = OperationInfo::concatenated(
            "blocked",
            vec![OperationInfo::new("C", Vec::new()).one_way()],
        );
        assert!(!blocked.has_inverse());
    }

    #[test]
    fn test_sign_reversed_parameters() {
        let forward = offset_operation();
        assert_eq!(forward.sign_reversed_parameters()[0].as_f64(), Some(2.337_229_17));
        let reversed = forward.inverse().unwrap().sign_reversed_parameters();
        assert_eq!(reversed[0].as_f64(), Some(-2.337_229_17));
    }

    #[test]
    fn test_serde_round_trip_keeps_direction() {
        let inverse = offset_operation().inverse().unwrap();
        let json = serde_json::to_string(&inverse).unwrap();
        let back: OperationInfo = serde_json::from_str(&json).unwrap();
        assert!(back.is_inverse_of_definition());
        assert_eq!(back.name(), "Longitude rotation");
    }
}
