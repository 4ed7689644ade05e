//! Orchestration shared by the step compiler families
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use meridian_transform::{
    find_conversion, AngularElementTransformation, ConcatenatedTransformation,
    LinearElementTransformation, Spheroid, Transformation, Unit, UnitCategory,
};

use super::{StepCompilationParameters, StepCompilationResult};
use crate::model::{Crs, NamedParameter, OperationInfo};
use crate::naming::normalize_operation_name;
use crate::selector::ParameterLookup;

/// A constructed transform together with the units it works in
pub(crate) struct CompiledCore {
    pub transformation: Box<dyn Transformation>,
    pub input_unit: Unit,
    pub output_unit: Unit,
}

impl CompiledCore {
    pub fn new(transformation: Box<dyn Transformation>, input_unit: Unit, output_unit: Unit) -> Self {
        Self {
            transformation,
            input_unit,
            output_unit,
        }
    }
}

pub(crate) type CoreConstructor = fn(&CoreContext<'_>) -> Option<CompiledCore>;

/// What a constructor sees: the operation as defined and the related CRSs
/// for that direction
pub(crate) struct CoreContext<'a> {
    pub key: &'a str,
    pub operation: &'a OperationInfo,
    pub parameters: ParameterLookup<'a>,
    pub input_crs: Option<&'a Crs>,
    pub output_crs: Option<&'a Crs>,
}

impl<'a> CoreContext<'a> {
    /// Linear unit lengths and spheroids are expressed in
    pub fn length_unit(&self) -> Unit {
        self.output_crs
            .and_then(Crs::unit)
            .filter(|unit| unit.category == UnitCategory::Length)
            .cloned()
            .unwrap_or_else(Unit::metre)
    }

    /// Spheroid of the related CRSs, output side first
    pub fn spheroid(&self) -> Option<Spheroid> {
        self.output_crs
            .and_then(Crs::spheroid)
            .or_else(|| self.input_crs.and_then(Crs::spheroid))
            .and_then(|spheroid| self.rescaled(spheroid))
    }

    pub fn input_spheroid(&self) -> Option<Spheroid> {
        self.input_crs
            .and_then(Crs::spheroid)
            .and_then(|spheroid| self.rescaled(spheroid))
    }

    pub fn output_spheroid(&self) -> Option<Spheroid> {
        self.output_crs
            .and_then(Crs::spheroid)
            .and_then(|spheroid| self.rescaled(spheroid))
    }

    fn rescaled(&self, spheroid: &Spheroid) -> Option<Spheroid> {
        let converted = spheroid.converted_to(&self.length_unit());
        if converted.is_none() {
            log::debug!(
                "Spheroid axis unit {} cannot be expressed in {}",
                spheroid.axis_unit,
                self.length_unit()
            );
        }
        converted
    }

    pub fn angle(&self, parameter: Option<&NamedParameter>) -> Option<f64> {
        parameter.and_then(|p| p.value_in(&Unit::radian()))
    }

    pub fn length(&self, parameter: Option<&NamedParameter>) -> Option<f64> {
        parameter.and_then(|p| p.value_in(&self.length_unit()))
    }

    pub fn scale(&self, parameter: Option<&NamedParameter>) -> Option<f64> {
        parameter.and_then(|p| p.value_in(&Unit::unity()))
    }

    /// Like [`angle`](Self::angle), with a missing role read as zero
    pub fn angle_or_zero(&self, parameter: Option<&NamedParameter>) -> Option<f64> {
        match parameter {
            None => Some(0.0),
            Some(_) => self.angle(parameter),
        }
    }

    pub fn length_or_zero(&self, parameter: Option<&NamedParameter>) -> Option<f64> {
        match parameter {
            None => Some(0.0),
            Some(_) => self.length(parameter),
        }
    }

    /// Log a missing mandatory role and give up on the operation
    pub fn missing<T>(&self, role: &str) -> Option<T> {
        log::debug!(
            "Operation '{}' ({}) has no usable '{}' parameter",
            self.operation.name(),
            self.key,
            role
        );
        None
    }
}

/// The key an operation dispatches on
pub(crate) fn dispatch_key(operation: &OperationInfo) -> String {
    match operation.method() {
        Some(method) => normalize_operation_name(&method.name),
        None => normalize_operation_name(operation.name()),
    }
}

/// Compile one operation with a family's constructor lookup
pub(crate) fn compile_step(
    family: &str,
    lookup: impl Fn(&str) -> Option<CoreConstructor>,
    parameters: &StepCompilationParameters<'_>,
) -> Option<StepCompilationResult> {
    let operation = parameters.operation;
    let key = dispatch_key(operation);
    let constructor = lookup(&key)?;

    let inverted = operation.is_inverse_of_definition();
    if inverted && !operation.has_inverse() {
        log::debug!("{}: '{}' has no inverse", family, operation.display_name());
        return None;
    }

    let defined = operation.as_defined();
    let (input_crs, output_crs) = if inverted {
        (parameters.related_output_crs, parameters.related_input_crs)
    } else {
        (parameters.related_input_crs, parameters.related_output_crs)
    };
    let context = CoreContext {
        key: &key,
        operation: &defined,
        parameters: ParameterLookup::new(defined.parameters()),
        input_crs,
        output_crs,
    };

    let core = constructor(&context)?;
    let core = if inverted {
        match core.transformation.inverse() {
            Ok(inverse) => CompiledCore::new(inverse, core.output_unit, core.input_unit),
            Err(err) => {
                log::debug!("{}: cannot invert '{}': {}", family, operation.name(), err);
                return None;
            }
        }
    } else {
        core
    };

    let transformation = match parameters.input_unit {
        Some(unit) => with_input_unit(core.transformation, unit, &core.input_unit),
        None => core.transformation,
    };

    Some(StepCompilationResult {
        transformation,
        output_unit: core.output_unit,
    })
}

/// Prepend an element-wise unit conversion when `ambient` differs from what
/// the transform expects
///
/// Units that cannot be converted leave the transform unwrapped.
fn with_input_unit(
    transformation: Box<dyn Transformation>,
    ambient: &Unit,
    expected: &Unit,
) -> Box<dyn Transformation> {
    match unit_conversion(ambient, expected) {
        Some(Some(conversion)) => Box::new(ConcatenatedTransformation::new(vec![
            conversion,
            transformation,
        ])),
        Some(None) => transformation,
        None => {
            log::debug!(
                "'{}' keeps its input in {}; ambient {} is not convertible",
                transformation.name(),
                expected,
                ambient
            );
            transformation
        }
    }
}

/// The element wrapper converting `from` into `to`; `Some(None)` when the
/// units already agree and `None` when they cannot be converted
pub(crate) fn unit_conversion(from: &Unit, to: &Unit) -> Option<Option<Box<dyn Transformation>>> {
    if from.is_equivalent(to) {
        return Some(None);
    }
    let Some(conversion) = find_conversion(from, to) else {
        log::debug!("No conversion from {} to {}", from, to);
        return None;
    };
    if conversion.is_unity() {
        return Some(None);
    }
    match from.category {
        UnitCategory::Angle => Some(Some(Box::new(AngularElementTransformation::new(conversion)))),
        UnitCategory::Length => Some(Some(Box::new(LinearElementTransformation::new(conversion)))),
        UnitCategory::Scale => {
            log::debug!("Scale unit {} cannot carry coordinates", from);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OperationMethod;

    #[test]
    fn test_dispatch_key_prefers_method() {
        let operation = OperationInfo::new("WGS 84 / World Mercator", vec![])
            .with_method(OperationMethod::new("Mercator (1SP)"));
        assert_eq!(dispatch_key(&operation), "MERCATOR1SP");

        let operation = OperationInfo::new("Lambert Conformal Conic (2SP)", vec![]);
        assert_eq!(dispatch_key(&operation), "LAMBERTCONICCONFORMAL2SP");
    }

    #[test]
    fn test_unit_conversion_wrappers() {
        assert!(matches!(unit_conversion(&Unit::degree(), &Unit::degree()), Some(None)));
        assert!(matches!(unit_conversion(&Unit::degree(), &Unit::radian()), Some(Some(_))));
        assert!(matches!(unit_conversion(&Unit::foot(), &Unit::metre()), Some(Some(_))));
        assert!(unit_conversion(&Unit::metre(), &Unit::radian()).is_none());
        assert!(unit_conversion(&Unit::unity(), &Unit::parts_per_million()).is_none());
    }
}
