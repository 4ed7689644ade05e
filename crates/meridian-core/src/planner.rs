//! Planning facade: structural derivation first, graph search second
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::compiler::{CompiledChain, CoordinateOperationCompiler};
use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::model::{Crs, CrsCode};
use crate::path::{ensure_routable, PathStep, StructuralPathGenerator, TransformGraphSearch};
use crate::registry::CrsRegistry;

/// Which path finder produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStrategy {
    Structural,
    GraphSearch,
}

impl fmt::Display for PlanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStrategy::Structural => write!(f, "structural"),
            PlanStrategy::GraphSearch => write!(f, "graph search"),
        }
    }
}

/// A compiled route between two CRSs
#[derive(Debug)]
pub struct PlannedOperation {
    pub strategy: PlanStrategy,
    pub steps: Vec<PathStep>,
    pub chain: CompiledChain,
}

pub struct CoordinateOperationPlanner {
    registry: Arc<dyn CrsRegistry>,
    config: PlannerConfig,
    structural: StructuralPathGenerator,
    search: TransformGraphSearch,
    compiler: CoordinateOperationCompiler,
}

impl CoordinateOperationPlanner {
    pub fn new(registry: Arc<dyn CrsRegistry>) -> Self {
        Self::with_config(registry, PlannerConfig::default())
    }

    pub fn with_config(registry: Arc<dyn CrsRegistry>, config: PlannerConfig) -> Self {
        Self {
            structural: StructuralPathGenerator::with_config(Arc::clone(&registry), &config),
            search: TransformGraphSearch::with_config(Arc::clone(&registry), config.search.clone()),
            compiler: CoordinateOperationCompiler::new(Arc::clone(&registry)),
            registry,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Find and compile an operation from `from` to `to`
    ///
    /// `Ok(None)` means no known operation connects the two.
    pub fn plan(&self, from: CrsCode, to: CrsCode) -> Result<Option<PlannedOperation>> {
        let span = debug_span!("plan", from = %from, to = %to);
        let _enter = span.enter();

        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        ensure_routable(&source)?;
        ensure_routable(&target)?;
        if from == to {
            return Err(Error::IdenticalCrs { crs: from });
        }

        // A structural failure is reported only when the graph search finds nothing either
        let mut structural_error = None;
        match self.structural.generate(&source, &target) {
            Ok(Some(path)) => match self.compiler.compile_structural(&source, &target, &path) {
                Some(chain) => {
                    debug!(steps = path.len(), "structural path compiled");
                    return Ok(Some(PlannedOperation {
                        strategy: PlanStrategy::Structural,
                        steps: path.steps().to_vec(),
                        chain,
                    }));
                }
                None => debug!("structural path did not compile"),
            },
            Ok(None) => debug!("no structural path"),
            Err(err) => {
                debug!(error = %err, "structural derivation failed");
                structural_error = Some(err);
            }
        }

        let candidates = self
            .search
            .find_paths(from, to, self.config.search.max_candidates)?;
        debug!(candidates = candidates.len(), "graph search finished");
        for (rank, path) in candidates.into_iter().enumerate() {
            if let Some(chain) = self.compiler.compile_path(&path) {
                debug!(rank, hops = path.hops(), "graph path compiled");
                return Ok(Some(PlannedOperation {
                    strategy: PlanStrategy::GraphSearch,
                    steps: path.steps,
                    chain,
                }));
            }
        }

        match structural_error {
            Some(err) => Err(err),
            None => {
                debug!("no operation found");
                Ok(None)
            }
        }
    }

    fn resolve(&self, code: CrsCode) -> Result<Arc<Crs>> {
        self.registry
            .crs(code)
            .ok_or(Error::UnknownCrs { code })
    }
}
