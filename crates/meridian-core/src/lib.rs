//! Meridian Core - Planning engine for coordinate reference system operations
//!
//! This crate turns registry descriptions of reference systems and
//! operations into executable transform chains, and finds the operations
//! that connect two reference systems.
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Naming**: Normalization of method and parameter names into dispatch keys
//! - **Selection**: Role binding of named parameters by keyword scoring
//! - **Compilation**: Projection and transformation step compilers and the chain compiler
//! - **Path Finding**: Structural path derivation and best-first graph search
//! - **Planning**: A facade that tries both and compiles the result
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use meridian_core::{
//!     CoordinateOperationPlanner, Crs, CrsCode, GeodeticDatum, InMemoryRegistry, PlanStrategy,
//! };
//! use meridian_transform::Spheroid;
//!
//! fn example() -> meridian_core::Result<()> {
//!     let datum = GeodeticDatum::reference("WGS 84", Spheroid::wgs84());
//!     let registry = InMemoryRegistry::builder()
//!         .crs(Crs::geographic(4326, "WGS 84", datum.clone()))
//!         .crs(Crs::geocentric(4978, "WGS 84", datum))
//!         .build()?;
//!
//!     let planner = CoordinateOperationPlanner::new(Arc::new(registry));
//!     let planned = planner.plan(CrsCode(4326), CrsCode(4978))?;
//!     assert_eq!(planned.map(|p| p.strategy), Some(PlanStrategy::Structural));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod compiler;
pub mod config;
pub mod error;
pub mod model;
pub mod naming;
pub mod path;
pub mod planner;
pub mod registry;
pub mod selector;

// Re-export main types for convenience
pub use compiler::{
    CompiledChain, CoordinateOperationCompiler, ProjectionStepCompiler,
    StepCompilationParameters, StepCompilationResult, StepCompiler, TransformationStepCompiler,
};
pub use config::{PlannerConfig, SearchConfig};
pub use error::{Error, Result};
pub use model::{
    AreaOfUse, Crs, CrsCode, CrsDefinition, CrsKind, GeodeticDatum, Helmert7Parameters,
    NamedParameter, OperationDefinition, OperationInfo, OperationMethod,
};
pub use naming::{normalize_operation_name, normalize_parameter_name};
pub use path::{
    CoordinateOperationPath, PathCost, PathStep, StructuralPath, StructuralPathGenerator,
    TransformGraphSearch,
};
pub use planner::{CoordinateOperationPlanner, PlanStrategy, PlannedOperation};
pub use registry::{CrsRegistry, InMemoryRegistry, RegistryBuilder, RegistryDocument};
pub use selector::{ParameterLookup, ParameterSelector};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
