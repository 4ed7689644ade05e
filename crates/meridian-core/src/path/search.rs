//! Best-first search over the registry's operation graph
//!
//! Nodes are CRSs; edges are projections and published operations, both
//! generated lazily as nodes are expanded. Paths are ranked by hop count
//! first and accumulated inaccuracy second.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use tracing::{debug, debug_span, trace};

use super::{ensure_routable, CoordinateOperationPath, PathStep};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::model::{Crs, CrsCode, OperationInfo};
use crate::registry::CrsRegistry;

/// Cost of a partial path, ordered by hops and then by inaccuracy
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCost {
    pub hops: usize,
    /// Sum of operation accuracies in metres
    pub inaccuracy: f64,
}

impl PathCost {
    fn extend(self, inaccuracy: f64) -> Self {
        Self {
            hops: self.hops + 1,
            inaccuracy: self.inaccuracy + inaccuracy,
        }
    }
}

impl PartialEq for PathCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathCost {}

impl PartialOrd for PathCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hops
            .cmp(&other.hops)
            .then_with(|| self.inaccuracy.total_cmp(&other.inaccuracy))
    }
}

/// A node reached along one particular path
struct Label {
    crs: Arc<Crs>,
    parent: Option<usize>,
    step: Option<PathStep>,
    cost: PathCost,
}

/// Heap entry; reversed so the heap pops the cheapest, oldest entry first
#[derive(PartialEq, Eq)]
struct Queued {
    cost: PathCost,
    sequence: usize,
    label: usize,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An outgoing edge of a node
struct Edge {
    operation: OperationInfo,
    target: Arc<Crs>,
    inaccuracy: f64,
}

pub struct TransformGraphSearch {
    registry: Arc<dyn CrsRegistry>,
    config: SearchConfig,
}

impl TransformGraphSearch {
    pub fn new(registry: Arc<dyn CrsRegistry>) -> Self {
        Self::with_config(registry, SearchConfig::default())
    }

    pub fn with_config(registry: Arc<dyn CrsRegistry>, config: SearchConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The cheapest path, or `None` when the target is unreachable
    pub fn find_path(&self, from: CrsCode, to: CrsCode) -> Result<Option<CoordinateOperationPath>> {
        Ok(self.find_paths(from, to, 1)?.into_iter().next())
    }

    /// Up to `limit` loop-free paths, cheapest first
    pub fn find_paths(
        &self,
        from: CrsCode,
        to: CrsCode,
        limit: usize,
    ) -> Result<Vec<CoordinateOperationPath>> {
        let span = debug_span!("find_paths", from = %from, to = %to, limit);
        let _enter = span.enter();

        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        ensure_routable(&source)?;
        ensure_routable(&target)?;
        if from == to {
            return Err(Error::IdenticalCrs { crs: from });
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut labels = vec![Label {
            crs: Arc::clone(&source),
            parent: None,
            step: None,
            cost: PathCost::default(),
        }];
        let mut heap = BinaryHeap::new();
        let mut sequence = 0;
        heap.push(Queued {
            cost: PathCost::default(),
            sequence,
            label: 0,
        });
        let mut settled: HashMap<CrsCode, usize> = HashMap::new();
        let mut paths = Vec::new();

        while let Some(Queued { label: index, .. }) = heap.pop() {
            let code = labels[index].crs.code;
            let count = settled.entry(code).or_insert(0);
            if *count >= limit {
                continue;
            }
            *count += 1;

            if code == to {
                let path = rebuild(&labels, index);
                debug!(hops = path.hops(), "found path");
                paths.push(path);
                if paths.len() >= limit {
                    break;
                }
                continue;
            }

            let node = Arc::clone(&labels[index].crs);
            let cost = labels[index].cost;
            trace!(node = %code, hops = cost.hops, "expanding");
            for edge in self.edges(&node) {
                let next = edge.target.code;
                if settled.get(&next).copied().unwrap_or(0) >= limit
                    || on_path(&labels, index, next)
                    || !self.within_area(&edge.target, &source, &target)
                {
                    continue;
                }
                let next_cost = cost.extend(edge.inaccuracy);
                labels.push(Label {
                    crs: Arc::clone(&edge.target),
                    parent: Some(index),
                    step: Some(PathStep::between(edge.operation, &node, &edge.target)),
                    cost: next_cost,
                });
                sequence += 1;
                heap.push(Queued {
                    cost: next_cost,
                    sequence,
                    label: labels.len() - 1,
                });
            }
        }

        if paths.is_empty() {
            debug!("target unreachable");
        }
        Ok(paths)
    }

    fn resolve(&self, code: CrsCode) -> Result<Arc<Crs>> {
        self.registry
            .crs(code)
            .ok_or(Error::UnknownCrs { code })
    }

    fn operation_cost(&self, operation: &OperationInfo) -> f64 {
        operation
            .accuracy()
            .unwrap_or(self.config.default_operation_accuracy)
    }

    /// Outgoing edges in a fixed order: projections, then concatenated
    /// operations, then single transformations
    fn edges(&self, node: &Arc<Crs>) -> Vec<Edge> {
        let mut edges = Vec::new();

        if let Some(projected) = node.as_projected() {
            match (self.registry.crs(projected.base), projected.projection.inverse()) {
                (Some(base), Ok(inverse)) => edges.push(Edge {
                    operation: inverse,
                    target: base,
                    inaccuracy: 0.0,
                }),
                (None, _) => trace!(base = %projected.base, "base CRS missing"),
                (_, Err(err)) => trace!(error = %err, "projection not invertible"),
            }
        }

        for crs in self.registry.projections_based_on(node.code) {
            let Some(projected) = crs.as_projected() else {
                continue;
            };
            if projected.projection.has_inverse() {
                edges.push(Edge {
                    operation: projected.projection.clone(),
                    target: Arc::clone(&crs),
                    inaccuracy: 0.0,
                });
            }
        }

        let forward = self
            .registry
            .concatenated_operations_from(node.code)
            .into_iter()
            .chain(self.registry.transformations_from(node.code));
        let reverse = self
            .registry
            .concatenated_operations_to(node.code)
            .into_iter()
            .chain(self.registry.transformations_to(node.code))
            .filter_map(|operation| operation.inverse().ok());

        for operation in forward.chain(reverse) {
            let Some(target) = operation.target_crs().and_then(|code| self.registry.crs(code))
            else {
                continue;
            };
            let inaccuracy = self.operation_cost(&operation);
            edges.push(Edge {
                operation,
                target,
                inaccuracy,
            });
        }

        edges
    }

    /// Area of use filter; passes whenever the data to apply it is missing
    fn within_area(&self, candidate: &Crs, source: &Crs, target: &Crs) -> bool {
        if !self.config.area_filter {
            return true;
        }
        let (Some(area), Some(source_area), Some(target_area)) =
            (&candidate.area, &source.area, &target.area)
        else {
            return true;
        };
        area.intersects(source_area) || area.intersects(target_area)
    }
}

fn on_path(labels: &[Label], mut index: usize, code: CrsCode) -> bool {
    loop {
        if labels[index].crs.code == code {
            return true;
        }
        match labels[index].parent {
            Some(parent) => index = parent,
            None => return false,
        }
    }
}

fn rebuild(labels: &[Label], mut index: usize) -> CoordinateOperationPath {
    let mut nodes = vec![Arc::clone(&labels[index].crs)];
    let mut steps = Vec::new();
    while let Some(parent) = labels[index].parent {
        if let Some(step) = &labels[index].step {
            steps.push(step.clone());
        }
        nodes.push(Arc::clone(&labels[parent].crs));
        index = parent;
    }
    nodes.reverse();
    steps.reverse();
    CoordinateOperationPath { nodes, steps }
}
