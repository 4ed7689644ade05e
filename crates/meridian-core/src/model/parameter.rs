//! Named operation parameters

use meridian_transform::{find_conversion, Unit};
use serde::{Deserialize, Serialize};

/// A parameter value as the registry stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
}

/// An operation parameter with its unit of measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedParameter {
    pub name: String,
    pub value: ParameterValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

impl NamedParameter {
    pub fn new(name: impl Into<String>, value: f64, unit: Unit) -> Self {
        Self {
            name: name.into(),
            value: ParameterValue::Number(value),
            unit: Some(unit),
        }
    }

    pub fn unitless(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ParameterValue::Number(value),
            unit: None,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ParameterValue::Text(value.into()),
            unit: None,
        }
    }

    /// The numeric value, parsing text values when they hold a number
    pub fn as_f64(&self) -> Option<f64> {
        match &self.value {
            ParameterValue::Number(value) => Some(*value),
            ParameterValue::Text(text) => text.trim().parse().ok(),
        }
    }

    /// The numeric value expressed in `unit`
    ///
    /// A parameter without a unit is taken to already be in `unit`. A
    /// parameter whose unit belongs to another category yields `None`.
    pub fn value_in(&self, unit: &Unit) -> Option<f64> {
        let value = self.as_f64()?;
        match &self.unit {
            None => Some(value),
            Some(own) => find_conversion(own, unit).map(|conversion| conversion.convert(value)),
        }
    }

    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value: ParameterValue::Number(value),
            ..self.clone()
        }
    }
}
