//! The transformation abstraction and generic building blocks
//!
//! Every executable step implements [`Transformation`], which works on the
//! dynamically-kinded [`Coordinate`]. Concrete formulas are written against
//! the statically-typed [`CoordinateMapping`] trait and lifted into
//! [`Transformation`] through the [`Forward`] and [`Reverse`] adapters.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::fmt;

use crate::coordinate::{
    Coordinate, CoordinateKind, CoordinateKindName, GeographicCoordinate, Point2, Point3,
};
use crate::error::TransformError;
use crate::units::UnitConversion;

/// An executable coordinate transformation
pub trait Transformation: fmt::Debug + Send + Sync {
    /// Human readable operation name
    fn name(&self) -> &str;

    /// Transform one coordinate
    fn transform(&self, value: Coordinate) -> Result<Coordinate, TransformError>;

    /// Transform a batch in place
    fn transform_values(&self, values: &mut [Coordinate]) -> Result<(), TransformError> {
        for value in values.iter_mut() {
            *value = self.transform(*value)?;
        }
        Ok(())
    }

    /// Whether [`Transformation::inverse`] will succeed
    fn has_inverse(&self) -> bool;

    /// Build the algebraic inverse
    fn inverse(&self) -> Result<Box<dyn Transformation>, TransformError>;
}

/// A typed formula from one coordinate kind to another
pub trait CoordinateMapping: Clone + fmt::Debug + Send + Sync + 'static {
    type Source: CoordinateKind;
    type Target: CoordinateKind;

    fn name(&self) -> &str;

    fn forward(&self, value: Self::Source) -> Self::Target;

    fn reverse(&self, value: Self::Target) -> Self::Source;

    fn is_invertible(&self) -> bool {
        true
    }

    fn inverse_name(&self) -> String {
        format!("Inverse {}", self.name())
    }
}

fn extract<K: CoordinateKind>(operation: &str, value: Coordinate) -> Result<K, TransformError> {
    K::from_coordinate(value).ok_or_else(|| TransformError::CoordinateMismatch {
        operation: operation.to_string(),
        expected: K::KIND,
        found: value.kind(),
    })
}

/// Runs a mapping in its defining direction
#[derive(Debug, Clone)]
pub struct Forward<M>(pub M);

impl<M: CoordinateMapping> Forward<M> {
    pub fn new(mapping: M) -> Self {
        Self(mapping)
    }

    pub fn mapping(&self) -> &M {
        &self.0
    }
}

impl<M: CoordinateMapping> Transformation for Forward<M> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn transform(&self, value: Coordinate) -> Result<Coordinate, TransformError> {
        let source = extract::<M::Source>(self.0.name(), value)?;
        Ok(self.0.forward(source).into_coordinate())
    }

    fn has_inverse(&self) -> bool {
        self.0.is_invertible()
    }

    fn inverse(&self) -> Result<Box<dyn Transformation>, TransformError> {
        if !self.0.is_invertible() {
            return Err(TransformError::no_inverse(self.0.name()));
        }
        Ok(Box::new(Reverse::new(self.0.clone())))
    }
}

/// Runs a mapping against its defining direction
#[derive(Debug, Clone)]
pub struct Reverse<M> {
    mapping: M,
    name: String,
}

impl<M: CoordinateMapping> Reverse<M> {
    pub fn new(mapping: M) -> Self {
        let name = mapping.inverse_name();
        Self { mapping, name }
    }
}

impl<M: CoordinateMapping> Transformation for Reverse<M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: Coordinate) -> Result<Coordinate, TransformError> {
        let target = extract::<M::Target>(&self.name, value)?;
        Ok(self.mapping.reverse(target).into_coordinate())
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn inverse(&self) -> Result<Box<dyn Transformation>, TransformError> {
        Ok(Box::new(Forward::new(self.mapping.clone())))
    }
}

/// Passes every coordinate through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransformation;

impl Transformation for IdentityTransformation {
    fn name(&self) -> &str {
        "Identity"
    }

    fn transform(&self, value: Coordinate) -> Result<Coordinate, TransformError> {
        Ok(value)
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn inverse(&self) -> Result<Box<dyn Transformation>, TransformError> {
        Ok(Box::new(IdentityTransformation))
    }
}

/// Runs a sequence of transformations one after another
#[derive(Debug)]
pub struct ConcatenatedTransformation {
    steps: Vec<Box<dyn Transformation>>,
}

impl ConcatenatedTransformation {
    pub fn new(steps: Vec<Box<dyn Transformation>>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Box<dyn Transformation>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transformation for ConcatenatedTransformation {
    fn name(&self) -> &str {
        "Concatenated"
    }

    fn transform(&self, value: Coordinate) -> Result<Coordinate, TransformError> {
        self.steps
            .iter()
            .try_fold(value, |current, step| step.transform(current))
    }

    fn has_inverse(&self) -> bool {
        self.steps.iter().all(|step| step.has_inverse())
    }

    fn inverse(&self) -> Result<Box<dyn Transformation>, TransformError> {
        let steps = self
            .steps
            .iter()
            .rev()
            .map(|step| step.inverse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(ConcatenatedTransformation::new(steps)))
    }
}

/// Converts the angular components of geographic coordinates
#[derive(Debug, Clone, Copy)]
pub struct AngularElementTransformation {
    conversion: UnitConversion,
}

impl AngularElementTransformation {
    pub fn new(conversion: UnitConversion) -> Self {
        Self { conversion }
    }

    pub fn conversion(&self) -> UnitConversion {
        self.conversion
    }
}

impl Transformation for AngularElementTransformation {
    fn name(&self) -> &str {
        "Angular Unit Conversion"
    }

    fn transform(&self, value: Coordinate) -> Result<Coordinate, TransformError> {
        match value {
            Coordinate::Geographic(g) => Ok(Coordinate::Geographic(
                GeographicCoordinate::with_height(
                    self.conversion.convert(g.latitude),
                    self.conversion.convert(g.longitude),
                    g.height,
                ),
            )),
            other => Err(TransformError::CoordinateMismatch {
                operation: self.name().to_string(),
                expected: CoordinateKindName::Geographic,
                found: other.kind(),
            }),
        }
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn inverse(&self) -> Result<Box<dyn Transformation>, TransformError> {
        Ok(Box::new(Self::new(self.conversion.inverse())))
    }
}

/// Converts the length components of projected and geocentric coordinates
#[derive(Debug, Clone, Copy)]
pub struct LinearElementTransformation {
    conversion: UnitConversion,
}

impl LinearElementTransformation {
    pub fn new(conversion: UnitConversion) -> Self {
        Self { conversion }
    }

    pub fn conversion(&self) -> UnitConversion {
        self.conversion
    }
}

impl Transformation for LinearElementTransformation {
    fn name(&self) -> &str {
        "Linear Unit Conversion"
    }

    fn transform(&self, value: Coordinate) -> Result<Coordinate, TransformError> {
        let c = &self.conversion;
        match value {
            Coordinate::Projected(p) => Ok(Coordinate::Projected(Point2::new(
                c.convert(p.x),
                c.convert(p.y),
            ))),
            Coordinate::Geocentric(p) => Ok(Coordinate::Geocentric(Point3::new(
                c.convert(p.x),
                c.convert(p.y),
                c.convert(p.z),
            ))),
            Coordinate::Geographic(_) => Err(TransformError::CoordinateMismatch {
                operation: self.name().to_string(),
                expected: CoordinateKindName::Projected,
                found: CoordinateKindName::Geographic,
            }),
        }
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn inverse(&self) -> Result<Box<dyn Transformation>, TransformError> {
        Ok(Box::new(Self::new(self.conversion.inverse())))
    }
}
