//! Finding operation paths between reference systems
//!
//! Two strategies live here. [`structural`] derives a path from the shape of
//! the two CRSs alone: undo projections, shift datums through the common
//! reference frame, apply projections. [`search`] walks the registry's
//! operation graph for the cheapest chain of published operations.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod search;
pub mod structural;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Crs, OperationInfo};

pub use search::{PathCost, TransformGraphSearch};
pub use structural::StructuralPathGenerator;

/// One operation on a path with the CRSs it connects, where known
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub operation: OperationInfo,
    pub source_crs: Option<Arc<Crs>>,
    pub target_crs: Option<Arc<Crs>>,
}

impl PathStep {
    pub fn new(
        operation: OperationInfo,
        source_crs: Option<Arc<Crs>>,
        target_crs: Option<Arc<Crs>>,
    ) -> Self {
        Self {
            operation,
            source_crs,
            target_crs,
        }
    }

    pub fn between(operation: OperationInfo, source: &Arc<Crs>, target: &Arc<Crs>) -> Self {
        Self::new(operation, Some(Arc::clone(source)), Some(Arc::clone(target)))
    }
}

/// Result of the structural generator
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralPath {
    /// Source and target share a frame; coordinates pass through unchanged
    NoOperation,
    Single(PathStep),
    Concatenated(Vec<PathStep>),
}

impl StructuralPath {
    pub fn from_steps(mut steps: Vec<PathStep>) -> Self {
        match steps.len() {
            0 => StructuralPath::NoOperation,
            1 => match steps.pop() {
                Some(step) => StructuralPath::Single(step),
                None => StructuralPath::NoOperation,
            },
            _ => StructuralPath::Concatenated(steps),
        }
    }

    pub fn steps(&self) -> &[PathStep] {
        match self {
            StructuralPath::NoOperation => &[],
            StructuralPath::Single(step) => std::slice::from_ref(step),
            StructuralPath::Concatenated(steps) => steps,
        }
    }

    pub fn len(&self) -> usize {
        self.steps().len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps().is_empty()
    }
}

/// A path found by the graph search: `nodes` has one more entry than `steps`
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateOperationPath {
    pub nodes: Vec<Arc<Crs>>,
    pub steps: Vec<PathStep>,
}

impl CoordinateOperationPath {
    pub fn source(&self) -> Option<&Arc<Crs>> {
        self.nodes.first()
    }

    pub fn target(&self) -> Option<&Arc<Crs>> {
        self.nodes.last()
    }

    pub fn hops(&self) -> usize {
        self.steps.len()
    }
}

/// Reject CRS kinds neither path finder can route
pub(crate) fn ensure_routable(crs: &Crs) -> Result<()> {
    if crs.is_routable() {
        Ok(())
    } else {
        Err(Error::UnsupportedKind {
            crs: crs.code,
            kind: crs.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str) -> PathStep {
        PathStep::new(OperationInfo::new(name, vec![]), None, None)
    }

    #[test]
    fn test_structural_path_shapes() {
        assert_eq!(StructuralPath::from_steps(vec![]), StructuralPath::NoOperation);
        assert!(matches!(
            StructuralPath::from_steps(vec![step("a")]),
            StructuralPath::Single(_)
        ));
        let path = StructuralPath::from_steps(vec![step("a"), step("b")]);
        assert_eq!(path.len(), 2);
        assert_eq!(path.steps()[1].operation.name(), "b");
    }

    #[test]
    fn test_ensure_routable() {
        let vertical = Crs::vertical(5703, "NAVD88 height", "NAVD88");
        assert!(matches!(
            ensure_routable(&vertical),
            Err(Error::UnsupportedKind { .. })
        ));
    }
}
