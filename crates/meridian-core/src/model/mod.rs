//! Registry data model
//!
//! Long-lived, read-only descriptions of reference systems and operations.
//! Everything here is shared through `Arc` and never mutated once built.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod area;
pub mod crs;
pub mod datum;
pub mod operation;
pub mod parameter;

pub use area::AreaOfUse;
pub use crs::{
    Axis, AxisOrientation, CompoundCrs, Crs, CrsCode, CrsDefinition, CrsKind, EngineeringCrs,
    GeodeticCrs, ProjectedCrs, VerticalCrs,
};
pub use datum::{GeodeticDatum, Helmert7Parameters, PrimeMeridian};
pub use operation::{OperationDefinition, OperationInfo, OperationMethod, ParameterUsage};
pub use parameter::{NamedParameter, ParameterValue};
