//! Compiling whole paths into one executable chain
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

use meridian_transform::{
    ConcatenatedTransformation, IdentityTransformation, Transformation, Unit,
};

use super::step::unit_conversion;
use super::{
    ProjectionStepCompiler, StepCompilationParameters, StepCompilationResult, StepCompiler,
    TransformationStepCompiler,
};
use crate::model::{Crs, CrsCode, OperationInfo};
use crate::path::{CoordinateOperationPath, PathStep, StructuralPath};
use crate::registry::CrsRegistry;

/// An executable chain and the unit its output is expressed in
pub struct CompiledChain {
    pub transformation: Box<dyn Transformation>,
    pub output_unit: Unit,
    /// Number of leaf operations compiled, after expanding concatenations
    pub step_count: usize,
}

impl fmt::Debug for CompiledChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledChain")
            .field("transformation", &self.transformation.name())
            .field("output_unit", &self.output_unit)
            .field("step_count", &self.step_count)
            .finish()
    }
}

/// A leaf operation with the CRSs on either side of it
struct LeafStep {
    operation: OperationInfo,
    input_crs: Option<Arc<Crs>>,
    output_crs: Option<Arc<Crs>>,
}

pub struct CoordinateOperationCompiler {
    registry: Arc<dyn CrsRegistry>,
    compilers: Vec<Box<dyn StepCompiler>>,
}

impl CoordinateOperationCompiler {
    /// Projection compiler first, then transformations
    pub fn new(registry: Arc<dyn CrsRegistry>) -> Self {
        Self::with_compilers(
            registry,
            vec![
                Box::new(ProjectionStepCompiler::new()),
                Box::new(TransformationStepCompiler::new()),
            ],
        )
    }

    pub fn with_compilers(
        registry: Arc<dyn CrsRegistry>,
        compilers: Vec<Box<dyn StepCompiler>>,
    ) -> Self {
        Self {
            registry,
            compilers,
        }
    }

    /// Compile a path found by the graph search
    pub fn compile_path(&self, path: &CoordinateOperationPath) -> Option<CompiledChain> {
        let source = path.source()?;
        let target = path.target()?;
        self.compile_steps(source, target, &path.steps)
    }

    /// Compile a structural path between `source` and `target`
    pub fn compile_structural(
        &self,
        source: &Crs,
        target: &Crs,
        path: &StructuralPath,
    ) -> Option<CompiledChain> {
        self.compile_steps(source, target, path.steps())
    }

    /// Compile a single operation on its own, with no unit context
    pub fn compile_operation(&self, operation: &OperationInfo) -> Option<CompiledChain> {
        let mut leaves = Vec::new();
        self.expand(operation, None, None, &mut leaves);
        self.compile_leaves(None, None, &leaves)
    }

    fn compile_steps(&self, source: &Crs, target: &Crs, steps: &[PathStep]) -> Option<CompiledChain> {
        let mut leaves = Vec::new();
        for step in steps {
            self.expand(
                &step.operation,
                step.source_crs.clone(),
                step.target_crs.clone(),
                &mut leaves,
            );
        }
        self.compile_leaves(source.unit(), target.unit(), &leaves)
    }

    fn compile_leaves(
        &self,
        source_unit: Option<&Unit>,
        target_unit: Option<&Unit>,
        leaves: &[LeafStep],
    ) -> Option<CompiledChain> {
        if leaves.is_empty() {
            return Some(CompiledChain {
                transformation: Box::new(IdentityTransformation),
                output_unit: source_unit.cloned().unwrap_or_else(Unit::radian),
                step_count: 0,
            });
        }

        // Unknown until the first step when compiling without a source CRS
        let mut unit: Option<Unit> = source_unit.cloned();
        let mut transformations = Vec::with_capacity(leaves.len() + 1);
        for leaf in leaves {
            let mut parameters = StepCompilationParameters::new(&leaf.operation)
                .with_crs(leaf.input_crs.as_deref(), leaf.output_crs.as_deref());
            if let Some(unit) = &unit {
                parameters = parameters.with_input_unit(unit);
            }
            let Some(result) = self.compile_leaf(&parameters) else {
                log::debug!(
                    "No compiler handles step '{}'; chain abandoned",
                    leaf.operation.display_name()
                );
                return None;
            };
            transformations.push(result.transformation);
            unit = Some(result.output_unit);
        }
        let mut unit = unit.unwrap_or_else(Unit::radian);

        if let Some(target_unit) = target_unit {
            match unit_conversion(&unit, target_unit) {
                Some(Some(conversion)) => {
                    transformations.push(conversion);
                    unit = target_unit.clone();
                }
                Some(None) => unit = target_unit.clone(),
                None => log::debug!("Chain output stays in {}, no conversion to {}", unit, target_unit),
            }
        }

        let transformation: Box<dyn Transformation> = if transformations.len() == 1 {
            transformations.remove(0)
        } else {
            Box::new(ConcatenatedTransformation::new(transformations))
        };
        Some(CompiledChain {
            transformation,
            output_unit: unit,
            step_count: leaves.len(),
        })
    }

    fn compile_leaf(
        &self,
        parameters: &StepCompilationParameters<'_>,
    ) -> Option<StepCompilationResult> {
        self.compilers.iter().find_map(|compiler| {
            let result = compiler.compile(parameters);
            if result.is_some() {
                log::debug!(
                    "{} compiler took '{}'",
                    compiler.name(),
                    parameters.operation.display_name()
                );
            }
            result
        })
    }

    /// Flatten concatenations into leaf operations in execution order
    fn expand(
        &self,
        operation: &OperationInfo,
        input_crs: Option<Arc<Crs>>,
        output_crs: Option<Arc<Crs>>,
        leaves: &mut Vec<LeafStep>,
    ) {
        if !operation.is_concatenated() {
            leaves.push(LeafStep {
                operation: operation.clone(),
                input_crs: self.resolve(operation.source_crs()).or(input_crs),
                output_crs: self.resolve(operation.target_crs()).or(output_crs),
            });
            return;
        }

        let steps = operation.steps();
        let last = steps.len().saturating_sub(1);
        for (index, step) in steps.iter().enumerate() {
            let input = if index == 0 { input_crs.clone() } else { None };
            let output = if index == last { output_crs.clone() } else { None };
            self.expand(step, input, output, leaves);
        }
    }

    fn resolve(&self, code: Option<CrsCode>) -> Option<Arc<Crs>> {
        code.and_then(|code| self.registry.crs(code))
    }
}
