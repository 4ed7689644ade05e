//! Structural path generation
//!
//! Derives a path from the definitions of the two CRSs without consulting
//! published operations: inverse projections down to the source's
//! geodetic CRS, a datum shift through the common reference frame, then
//! forward projections up to the target.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::sync::Arc;

use meridian_transform::find_conversion;

use super::{PathStep, StructuralPath};
use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::model::{Crs, CrsKind, GeodeticDatum, NamedParameter, OperationInfo, OperationMethod};
use crate::registry::CrsRegistry;

const GEOGRAPHIC_GEOCENTRIC: &str = "Geographic/geocentric conversions";

/// A projected CRS and the base it is defined on
struct BaseLink {
    projected: Arc<Crs>,
    projection: OperationInfo,
    base: Arc<Crs>,
}

/// The projection links above a geodetic CRS
struct Unwound {
    links: Vec<BaseLink>,
    root: Arc<Crs>,
}

pub struct StructuralPathGenerator {
    registry: Arc<dyn CrsRegistry>,
    max_base_chain_depth: usize,
}

impl StructuralPathGenerator {
    pub fn new(registry: Arc<dyn CrsRegistry>) -> Self {
        Self::with_config(registry, &PlannerConfig::default())
    }

    pub fn with_config(registry: Arc<dyn CrsRegistry>, config: &PlannerConfig) -> Self {
        Self {
            registry,
            max_base_chain_depth: config.max_base_chain_depth,
        }
    }

    /// Build the path from `source` to `target`
    ///
    /// `Ok(None)` when either CRS is of a kind without a structural path or
    /// a base CRS is missing from the registry.
    pub fn generate(&self, source: &Arc<Crs>, target: &Arc<Crs>) -> Result<Option<StructuralPath>> {
        let Some(source_chain) = self.unwind(source)? else {
            return Ok(None);
        };
        let Some(target_chain) = self.unwind(target)? else {
            return Ok(None);
        };

        let mut steps = Vec::new();
        for link in &source_chain.links {
            steps.push(PathStep::between(
                link.projection.inverse()?,
                &link.projected,
                &link.base,
            ));
        }

        steps.extend(self.datum_shift(&source_chain.root, &target_chain.root)?);

        for link in target_chain.links.iter().rev() {
            steps.push(PathStep::between(
                link.projection.clone(),
                &link.base,
                &link.projected,
            ));
        }

        log::debug!(
            "Structural path {} -> {}: {} step(s)",
            source.code,
            target.code,
            steps.len()
        );
        Ok(Some(StructuralPath::from_steps(steps)))
    }

    /// Follow projected CRSs down to their geodetic base
    fn unwind(&self, crs: &Arc<Crs>) -> Result<Option<Unwound>> {
        let mut links = Vec::new();
        let mut visited = vec![crs.code];
        let mut current = Arc::clone(crs);

        while let Some(projected) = current.as_projected() {
            let base_code = projected.base;
            let projection = projected.projection.clone();
            if visited.contains(&base_code) {
                visited.push(base_code);
                return Err(Error::CyclicBaseChain {
                    crs: crs.code,
                    chain: visited,
                });
            }
            if links.len() >= self.max_base_chain_depth {
                log::warn!(
                    "Base chain of {} is deeper than {} levels",
                    crs.code,
                    self.max_base_chain_depth
                );
                return Ok(None);
            }
            let Some(base) = self.registry.crs(base_code) else {
                log::debug!("Base {} of {} is not in the registry", base_code, current.code);
                return Ok(None);
            };
            visited.push(base_code);
            links.push(BaseLink {
                projected: Arc::clone(&current),
                projection,
                base: Arc::clone(&base),
            });
            current = base;
        }

        match current.kind() {
            CrsKind::Geographic | CrsKind::Geocentric => Ok(Some(Unwound {
                links,
                root: current,
            })),
            kind => {
                log::debug!("No structural path through {} ({})", current.code, kind);
                Ok(None)
            }
        }
    }

    /// Steps between two geodetic CRSs
    fn datum_shift(&self, source: &Arc<Crs>, target: &Arc<Crs>) -> Result<Vec<PathStep>> {
        let (Some(source_datum), Some(target_datum)) =
            (source.geodetic_datum(), target.geodetic_datum())
        else {
            return Ok(Vec::new());
        };
        let spheroids_differ = spheroids_differ(source_datum, target_datum)?;
        let shift = reference_frame_shift(source_datum, target_datum)?;

        let operations: Vec<OperationInfo> = match (source.kind(), target.kind()) {
            (CrsKind::Geographic, CrsKind::Geographic) => {
                if shift.is_empty() && !spheroids_differ {
                    Vec::new()
                } else {
                    let mut operations = vec![to_geocentric(source_datum)];
                    operations.extend(shift);
                    operations.push(to_geocentric(target_datum).inverse()?);
                    operations
                }
            }
            (CrsKind::Geographic, CrsKind::Geocentric) => {
                let mut operations = vec![to_geocentric(source_datum)];
                operations.extend(shift);
                operations
            }
            (CrsKind::Geocentric, CrsKind::Geographic) => {
                let mut operations = shift;
                operations.push(to_geocentric(target_datum).inverse()?);
                operations
            }
            _ => shift,
        };

        let count = operations.len();
        Ok(operations
            .into_iter()
            .enumerate()
            .map(|(index, operation)| {
                let from = (index == 0).then(|| Arc::clone(source));
                let to = (index + 1 == count).then(|| Arc::clone(target));
                PathStep::new(operation, from, to)
            })
            .collect())
    }
}

/// Whether the spheroids differ in size or shape once in a common unit
fn spheroids_differ(source: &GeodeticDatum, target: &GeodeticDatum) -> Result<bool> {
    let source = &source.spheroid;
    let target = &target.spheroid;
    match find_conversion(&target.axis_unit, &source.axis_unit) {
        Some(conversion) if conversion.is_scalar() => {
            let a = conversion.convert(target.a);
            let b = conversion.convert(target.b);
            Ok(a != source.a || b != source.b)
        }
        _ => Err(Error::NotImplemented {
            message: format!(
                "spheroid axis unit conversion from {} to {}",
                target.axis_unit, source.axis_unit
            ),
            feature: Some("non-scalar spheroid unit in datum shift".to_string()),
        }),
    }
}

/// Geocentric shift through the common reference frame, empty when none applies
fn reference_frame_shift(
    source: &GeodeticDatum,
    target: &GeodeticDatum,
) -> Result<Vec<OperationInfo>> {
    match (source.reference_shift(), target.reference_shift()) {
        (Some(to_reference), Some(from_reference)) if to_reference != from_reference => Ok(vec![
            to_reference.to_operation(&source.name),
            from_reference.to_operation(&target.name).inverse()?,
        ]),
        _ => Ok(Vec::new()),
    }
}

/// Geographic to geocentric conversion on the datum's spheroid
fn to_geocentric(datum: &GeodeticDatum) -> OperationInfo {
    let spheroid = &datum.spheroid;
    OperationInfo::new(
        format!("{} geographic to geocentric", datum.name),
        vec![
            NamedParameter::new("Semi-major axis", spheroid.a, spheroid.axis_unit.clone()),
            NamedParameter::new("Semi-minor axis", spheroid.b, spheroid.axis_unit.clone()),
        ],
    )
    .with_method(OperationMethod::new(GEOGRAPHIC_GEOCENTRIC))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CrsCode, Helmert7Parameters};
    use crate::registry::InMemoryRegistry;
    use meridian_transform::{Spheroid, Unit, Vector3};

    fn wgs84_datum() -> GeodeticDatum {
        GeodeticDatum::reference("WGS 84", Spheroid::wgs84())
    }

    fn ed50_datum() -> GeodeticDatum {
        GeodeticDatum::new("ED50", Spheroid::international_1924()).with_reference_shift(
            Helmert7Parameters::translation_only(Vector3::new(-87.0, -98.0, -121.0)),
        )
    }

    fn mercator() -> OperationInfo {
        OperationInfo::new(
            "World Mercator",
            vec![NamedParameter::new("Longitude of natural origin", 0.0, Unit::degree())],
        )
        .with_method(OperationMethod::new("Mercator (1SP)"))
    }

    fn generator(crs: Vec<Crs>) -> StructuralPathGenerator {
        let registry = crs
            .into_iter()
            .fold(InMemoryRegistry::builder(), |builder, crs| builder.crs(crs))
            .build()
            .unwrap();
        StructuralPathGenerator::new(Arc::new(registry))
    }

    #[test]
    fn test_same_datum_needs_no_operation() {
        let a = Arc::new(Crs::geographic(4326, "WGS 84", wgs84_datum()));
        let b = Arc::new(Crs::geographic(9999, "WGS 84 copy", wgs84_datum()));
        let generator = generator(vec![(*a).clone(), (*b).clone()]);
        assert_eq!(generator.generate(&a, &b).unwrap(), Some(StructuralPath::NoOperation));
    }

    #[test]
    fn test_projected_to_base_is_single_inverse() {
        let base = Crs::geographic(4326, "WGS 84", wgs84_datum());
        let projected =
            Crs::projected(3395, "World Mercator", &base, mercator(), Unit::metre()).unwrap();
        let base = Arc::new(base);
        let projected = Arc::new(projected);
        let generator = generator(vec![(*base).clone(), (*projected).clone()]);

        let path = generator.generate(&projected, &base).unwrap().unwrap();
        let StructuralPath::Single(step) = path else {
            panic!("expected a single step, got {:?}", path);
        };
        assert!(step.operation.is_inverse_of_definition());
        assert_eq!(step.source_crs.unwrap().code, CrsCode(3395));
        assert_eq!(step.target_crs.unwrap().code, CrsCode(4326));
    }

    #[test]
    fn test_datum_shift_through_reference_frame() {
        let ed50 = Arc::new(Crs::geographic(4230, "ED50", ed50_datum()));
        let wgs84 = Arc::new(Crs::geographic(4326, "WGS 84", wgs84_datum()));
        let generator = generator(vec![(*ed50).clone(), (*wgs84).clone()]);

        let path = generator.generate(&ed50, &wgs84).unwrap().unwrap();
        let names: Vec<String> = path
            .steps()
            .iter()
            .map(|step| step.operation.display_name())
            .collect();
        assert_eq!(names.len(), 4, "{:?}", names);
        assert_eq!(names[0], "ED50 geographic to geocentric");
        assert_eq!(names[1], "ED50 to reference frame");
        assert_eq!(names[2], "Inverse of WGS 84 to reference frame");
        assert_eq!(names[3], "Inverse of WGS 84 geographic to geocentric");
    }

    #[test]
    fn test_different_spheroids_without_shift() {
        let a = Arc::new(Crs::geographic(1, "A", GeodeticDatum::new("A", Spheroid::wgs84())));
        let b = Arc::new(Crs::geographic(2, "B", GeodeticDatum::new("B", Spheroid::bessel_1841())));
        let generator = generator(vec![(*a).clone(), (*b).clone()]);
        let path = generator.generate(&a, &b).unwrap().unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_geocentric_to_geocentric_shift_only() {
        let a = Arc::new(Crs::geocentric(4080, "ED50 geocentric", ed50_datum()));
        let b = Arc::new(Crs::geocentric(4978, "WGS 84 geocentric", wgs84_datum()));
        let generator = generator(vec![(*a).clone(), (*b).clone()]);
        let path = generator.generate(&a, &b).unwrap().unwrap();
        assert_eq!(path.len(), 2);
        assert!(path.steps()[0].source_crs.is_some());
        assert!(path.steps()[0].target_crs.is_none());
        assert!(path.steps()[1].target_crs.is_some());
    }

    #[test]
    fn test_sexagesimal_spheroid_unit_not_implemented() {
        let odd_unit = Unit {
            name: "packed".to_string(),
            category: meridian_transform::UnitCategory::Length,
            scale: meridian_transform::UnitScale::Sexagesimal,
        };
        let odd = Spheroid::from_axes(6_378_137.0, 6_356_752.0, odd_unit);
        let a = Arc::new(Crs::geographic(1, "A", GeodeticDatum::new("A", odd)));
        let b = Arc::new(Crs::geographic(2, "B", wgs84_datum()));
        let generator = generator(vec![(*a).clone(), (*b).clone()]);
        assert!(matches!(
            generator.generate(&a, &b),
            Err(Error::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_unrecognised_kinds_have_no_path() {
        let vertical = Arc::new(Crs::vertical(5703, "NAVD88 height", "NAVD88"));
        let wgs84 = Arc::new(Crs::geographic(4326, "WGS 84", wgs84_datum()));
        let generator = generator(vec![(*vertical).clone(), (*wgs84).clone()]);
        assert_eq!(generator.generate(&vertical, &wgs84).unwrap(), None);
    }
}
