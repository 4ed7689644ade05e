//! Read-only access to reference systems and the operations between them
//!
//! The path finders only ever ask a [`CrsRegistry`] questions; they never
//! mutate it. [`InMemoryRegistry`] is the bundled implementation, built in
//! code through [`RegistryBuilder`] or loaded from a JSON document:
//!
//! ```json
//! {
//!   "crs": [ { "code": 4326, "name": "WGS 84", "definition": { "kind": "geographic", ... } } ],
//!   "operations": [ { "code": 1311, "name": "ED50 to WGS 84 (18)", "source_crs": 4230, ... } ]
//! }
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Crs, CrsCode, CrsDefinition, OperationDefinition, OperationInfo};

/// Lookup interface over a CRS and operation catalogue
pub trait CrsRegistry: Send + Sync {
    fn crs(&self, code: CrsCode) -> Option<Arc<Crs>>;

    /// Projected CRSs whose base is `code`
    fn projections_based_on(&self, code: CrsCode) -> Vec<Arc<Crs>>;

    fn concatenated_operations_from(&self, code: CrsCode) -> Vec<OperationInfo>;

    fn concatenated_operations_to(&self, code: CrsCode) -> Vec<OperationInfo>;

    /// Single (non-concatenated) transformations starting at `code`
    fn transformations_from(&self, code: CrsCode) -> Vec<OperationInfo>;

    fn transformations_to(&self, code: CrsCode) -> Vec<OperationInfo>;
}

/// Serialized form of an [`InMemoryRegistry`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub crs: Vec<Crs>,
    #[serde(default)]
    pub operations: Vec<OperationDefinition>,
}

/// A registry held entirely in memory
///
/// Query results come back in insertion order, which keeps path searches
/// deterministic.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    crs: HashMap<CrsCode, Arc<Crs>>,
    crs_order: Vec<CrsCode>,
    operations: Vec<OperationInfo>,
}

impl InMemoryRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn from_document(document: RegistryDocument) -> Result<Self> {
        let mut builder = Self::builder();
        for crs in document.crs {
            builder = builder.crs(crs);
        }
        for definition in document.operations {
            builder = builder.operation(OperationInfo::from_definition(definition));
        }
        builder.build()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: RegistryDocument =
            serde_json::from_str(json).context("Failed to parse registry document")?;
        Self::from_document(document)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let document: RegistryDocument = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse registry document {}", path.display()))?;
        Self::from_document(document)
    }

    pub fn len(&self) -> usize {
        self.crs_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crs_order.is_empty()
    }

    /// Every CRS in insertion order
    pub fn all_crs(&self) -> impl Iterator<Item = &Arc<Crs>> + '_ {
        self.crs_order.iter().filter_map(|code| self.crs.get(code))
    }

    pub fn operations(&self) -> &[OperationInfo] {
        &self.operations
    }

    fn operations_matching(
        &self,
        concatenated: bool,
        endpoint: impl Fn(&OperationInfo) -> Option<CrsCode>,
        code: CrsCode,
    ) -> Vec<OperationInfo> {
        self.operations
            .iter()
            .filter(|operation| operation.is_concatenated() == concatenated)
            .filter(|operation| endpoint(operation) == Some(code))
            .cloned()
            .collect()
    }
}

impl CrsRegistry for InMemoryRegistry {
    fn crs(&self, code: CrsCode) -> Option<Arc<Crs>> {
        self.crs.get(&code).cloned()
    }

    fn projections_based_on(&self, code: CrsCode) -> Vec<Arc<Crs>> {
        self.all_crs()
            .filter(|crs| crs.as_projected().is_some_and(|projected| projected.base == code))
            .cloned()
            .collect()
    }

    fn concatenated_operations_from(&self, code: CrsCode) -> Vec<OperationInfo> {
        self.operations_matching(true, OperationInfo::source_crs, code)
    }

    fn concatenated_operations_to(&self, code: CrsCode) -> Vec<OperationInfo> {
        self.operations_matching(true, OperationInfo::target_crs, code)
    }

    fn transformations_from(&self, code: CrsCode) -> Vec<OperationInfo> {
        self.operations_matching(false, OperationInfo::source_crs, code)
    }

    fn transformations_to(&self, code: CrsCode) -> Vec<OperationInfo> {
        self.operations_matching(false, OperationInfo::target_crs, code)
    }
}

/// Collects entries and validates cross references on [`build`](Self::build)
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    crs: Vec<Crs>,
    operations: Vec<OperationInfo>,
}

impl RegistryBuilder {
    pub fn crs(mut self, crs: Crs) -> Self {
        self.crs.push(crs);
        self
    }

    pub fn operation(mut self, operation: OperationInfo) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn build(self) -> Result<InMemoryRegistry> {
        let mut registry = InMemoryRegistry::default();
        for crs in self.crs {
            let code = crs.code;
            if registry.crs.insert(code, Arc::new(crs)).is_some() {
                return Err(anyhow!("Duplicate CRS {}", code).into());
            }
            registry.crs_order.push(code);
        }

        for crs in registry.crs.values() {
            let referenced: Vec<CrsCode> = match &crs.definition {
                CrsDefinition::Projected(projected) => vec![projected.base],
                CrsDefinition::Compound(compound) => vec![compound.horizontal, compound.vertical],
                CrsDefinition::Geographic(_)
                | CrsDefinition::Geocentric(_)
                | CrsDefinition::Vertical(_)
                | CrsDefinition::Engineering(_) => Vec::new(),
            };
            for code in referenced {
                if !registry.crs.contains_key(&code) {
                    return Err(anyhow!("{} references unknown CRS {}", crs.code, code).into());
                }
            }
        }

        for operation in &self.operations {
            validate_operation(&registry, operation)?;
            if operation.source_crs().is_none() || operation.target_crs().is_none() {
                log::warn!(
                    "Operation '{}' has no source or target CRS and will not be searchable",
                    operation.name()
                );
            }
        }
        registry.operations = self.operations;

        Ok(registry)
    }
}

fn validate_operation(registry: &InMemoryRegistry, operation: &OperationInfo) -> Result<()> {
    for code in [operation.source_crs(), operation.target_crs()].into_iter().flatten() {
        if !registry.crs.contains_key(&code) {
            return Err(anyhow!(
                "Operation '{}' references unknown CRS {}",
                operation.name(),
                code
            )
            .into());
        }
    }
    for step in operation.steps() {
        validate_operation(registry, &step)
            .with_context(|| format!("In concatenated operation '{}'", operation.name()))
            .map_err(crate::error::Error::from)?;
    }
    Ok(())
}
