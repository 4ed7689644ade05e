//! Compilation of coordinate operations into executable transforms
//!
//! A [`StepCompiler`] turns one [`OperationInfo`] into a
//! [`Transformation`]. Each compiler covers one family of methods and
//! answers `None` for anything outside it, so compilers can be tried in
//! turn. [`CoordinateOperationCompiler`] strings step results together into
//! a single chain.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod chain;
pub mod projection;
mod step;
pub mod transformation;

use std::fmt;

use meridian_transform::{Transformation, Unit};

use crate::model::{Crs, OperationInfo};

pub use chain::{CompiledChain, CoordinateOperationCompiler};
pub use projection::ProjectionStepCompiler;
pub use transformation::TransformationStepCompiler;

/// Everything a step compiler may consult for one operation
#[derive(Debug, Clone, Copy)]
pub struct StepCompilationParameters<'a> {
    pub operation: &'a OperationInfo,
    /// Unit of the coordinates arriving at this step, when known
    pub input_unit: Option<&'a Unit>,
    pub related_input_crs: Option<&'a Crs>,
    pub related_output_crs: Option<&'a Crs>,
}

impl<'a> StepCompilationParameters<'a> {
    pub fn new(operation: &'a OperationInfo) -> Self {
        Self {
            operation,
            input_unit: None,
            related_input_crs: None,
            related_output_crs: None,
        }
    }

    pub fn with_input_unit(mut self, unit: &'a Unit) -> Self {
        self.input_unit = Some(unit);
        self
    }

    pub fn with_crs(mut self, input: Option<&'a Crs>, output: Option<&'a Crs>) -> Self {
        self.related_input_crs = input;
        self.related_output_crs = output;
        self
    }
}

/// A compiled step and the unit its output is expressed in
pub struct StepCompilationResult {
    pub transformation: Box<dyn Transformation>,
    pub output_unit: Unit,
}

impl fmt::Debug for StepCompilationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepCompilationResult")
            .field("transformation", &self.transformation.name())
            .field("output_unit", &self.output_unit)
            .finish()
    }
}

/// Compiles the operations of one method family
pub trait StepCompiler: Send + Sync {
    /// Family name, used in log messages
    fn name(&self) -> &str;

    /// `None` when the operation is outside this family or lacks what the
    /// method needs
    fn compile(&self, parameters: &StepCompilationParameters<'_>) -> Option<StepCompilationResult>;
}
