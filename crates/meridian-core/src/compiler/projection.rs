//! Map projection step compiler
//!
//! Projections take geographic coordinates in radians to projected
//! coordinates in the linear unit of the related projected CRS.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use meridian_transform::{
    CoordinateMapping, EquidistantCylindrical, EquidistantCylindricalSpherical, Forward,
    GeographicCoordinate, Krovak, KrovakModified, LambertAzimuthalEqualArea,
    LambertAzimuthalEqualAreaSpherical, LambertConicConformal, Mercator, Point2,
    PopularVisualisationPseudoMercator, Unit, Vector2,
};

use super::step::{compile_step, CompiledCore, CoreConstructor, CoreContext};
use super::{StepCompilationParameters, StepCompilationResult, StepCompiler};
use crate::model::NamedParameter;
use crate::selector::{all_selected, ParameterSelector};

/// Supported projections by dispatch key; `None` marks methods that are
/// recognised but not implemented
static PROJECTIONS: &[(&str, Option<CoreConstructor>)] = &[
    ("MERCATOR1SP", Some(mercator)),
    ("MERCATOR2SP", Some(mercator)),
    ("MERCATORVARIANTA", Some(mercator)),
    ("MERCATORVARIANTB", Some(mercator)),
    ("POPULARVISUALISATIONPSEUDOMERCATOR", Some(pseudo_mercator)),
    ("LAMBERTAZIMUTHALEQUALAREA", Some(lambert_azimuthal)),
    ("LAMBERTAZIMUTHALEQUALAREASPHERICAL", Some(lambert_azimuthal)),
    ("EQUIDISTANTCYLINDRICAL", Some(equidistant_cylindrical)),
    ("EQUIDISTANTCYLINDRICALSPHERICAL", Some(equidistant_cylindrical)),
    ("LAMBERTCONICCONFORMAL1SP", Some(lambert_conic)),
    ("LAMBERTCONICCONFORMAL2SP", Some(lambert_conic)),
    ("LAMBERTCONICCONFORMAL2SPBELGIUM", Some(lambert_conic)),
    ("KROVAK", Some(krovak)),
    ("KROVAKNORTH", Some(krovak)),
    ("KROVAKMODIFIED", Some(krovak)),
    ("KROVAKMODIFIEDNORTH", Some(krovak)),
    ("ALBERSEQUALAREACONIC", None),
    ("AZIMUTHALEQUIDISTANT", None),
    ("CASSINISOLDNER", None),
    ("CYLINDRICALEQUALAREA", None),
    ("EQUIDISTANTCONIC", None),
    ("HOTINEOBLIQUEMERCATOR", None),
    ("KROVAKOBLIQUECONICCONFORMAL", None),
    ("OBLIQUESTEREOGRAPHIC", None),
    ("ORTHOGRAPHIC", None),
    ("POLARSTEREOGRAPHIC", None),
    ("POLYCONIC", None),
    ("TRANSVERSEMERCATOR", None),
    ("TRANSVERSEMERCATORSOUTHORIENTATED", None),
];

/// Compiles map projections and their inverses
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectionStepCompiler;

impl ProjectionStepCompiler {
    pub fn new() -> Self {
        Self
    }

    fn constructor(key: &str) -> Option<CoreConstructor> {
        let Some((_, entry)) = PROJECTIONS.iter().find(|(name, _)| *name == key) else {
            return None;
        };
        if entry.is_none() {
            log::debug!("Projection {} is recognised but not supported", key);
        }
        *entry
    }
}

impl StepCompiler for ProjectionStepCompiler {
    fn name(&self) -> &str {
        "projection"
    }

    fn compile(&self, parameters: &StepCompilationParameters<'_>) -> Option<StepCompilationResult> {
        compile_step(self.name(), Self::constructor, parameters)
    }
}

fn projected<M>(mapping: M, context: &CoreContext<'_>) -> Option<CompiledCore>
where
    M: CoordinateMapping,
{
    Some(CompiledCore::new(
        Box::new(Forward::new(mapping)),
        Unit::radian(),
        context.length_unit(),
    ))
}

fn false_offset(
    context: &CoreContext<'_>,
    easting: Option<&NamedParameter>,
    northing: Option<&NamedParameter>,
) -> Option<Vector2> {
    Some(Vector2::new(
        context.length_or_zero(easting)?,
        context.length_or_zero(northing)?,
    ))
}

fn false_easting() -> ParameterSelector {
    ParameterSelector::keywords(&["FALSE", "OFFSET", "X", "EAST"])
}

fn false_northing() -> ParameterSelector {
    ParameterSelector::keywords(&["FALSE", "OFFSET", "Y", "NORTH"])
}

fn mercator(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let parallel = ParameterSelector::keywords(&["STANDARD", "PARALLEL"]);
    let longitude = ParameterSelector::keywords(&["LON", "ORIGIN"]);
    let latitude = ParameterSelector::keywords(&["LAT", "ORIGIN"]);
    let scale = ParameterSelector::keywords(&["SCALE"]);
    let x = false_easting();
    let y = false_northing();
    let [parallel, longitude, latitude, scale, x, y] = context
        .parameters
        .assign([&parallel, &longitude, &latitude, &scale, &x, &y]);

    let Some(spheroid) = context.spheroid() else {
        return context.missing("spheroid");
    };
    let central_meridian = context.angle_or_zero(longitude)?;
    let offset = false_offset(context, x, y)?;

    if let Some(latitude) = context.angle(latitude) {
        if latitude != 0.0 {
            log::warn!(
                "Mercator '{}' has a non-zero latitude of origin, which is ignored",
                context.operation.name()
            );
        }
    }

    let mapping = match parallel {
        Some(_) => Mercator::from_standard_parallel(
            context.angle(parallel)?,
            central_meridian,
            offset,
            &spheroid,
        ),
        None => {
            let scale_factor = match scale {
                Some(_) => context.scale(scale)?,
                None => 1.0,
            };
            Mercator::new(central_meridian, scale_factor, offset, &spheroid)
        }
    };
    projected(mapping, context)
}

fn pseudo_mercator(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let latitude = ParameterSelector::keywords(&["LAT", "ORIGIN"]);
    let longitude = ParameterSelector::keywords(&["LON", "ORIGIN"]);
    let x = false_easting();
    let y = false_northing();
    let bound = context.parameters.assign([&latitude, &longitude, &x, &y]);
    if !all_selected(&bound) {
        return context.missing("pseudo mercator origin and offsets");
    }
    let [_, longitude, x, y] = bound;

    let Some(spheroid) = context.spheroid() else {
        return context.missing("spheroid");
    };
    let mapping = PopularVisualisationPseudoMercator::new(
        context.angle(longitude)?,
        false_offset(context, x, y)?,
        &spheroid,
    );
    projected(mapping, context)
}

fn lambert_azimuthal(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let latitude = ParameterSelector::keywords(&["LAT", "NATURALORIGIN"]);
    let longitude = ParameterSelector::keywords(&["LON", "NATURALORIGIN"]);
    let x = false_easting();
    let y = false_northing();
    let [latitude, longitude, x, y] = context.parameters.assign([&latitude, &longitude, &x, &y]);

    let Some(spheroid) = context.spheroid() else {
        return context.missing("spheroid");
    };
    let origin = GeographicCoordinate::new(
        context.angle_or_zero(latitude)?,
        context.angle_or_zero(longitude)?,
    );
    let offset = false_offset(context, x, y)?;

    if context.key.ends_with("SPHERICAL") {
        projected(
            LambertAzimuthalEqualAreaSpherical::new(origin, offset, &spheroid),
            context,
        )
    } else {
        projected(LambertAzimuthalEqualArea::new(origin, offset, &spheroid), context)
    }
}

fn equidistant_cylindrical(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let parallel = ParameterSelector::keywords(&["LAT", "PARALLEL"]);
    let longitude = ParameterSelector::keywords(&["LON", "NATURALORIGIN"]);
    let x = false_easting();
    let y = false_northing();
    let [parallel, longitude, x, y] = context.parameters.assign([&parallel, &longitude, &x, &y]);

    let Some(spheroid) = context.spheroid() else {
        return context.missing("spheroid");
    };
    let parallel = context.angle_or_zero(parallel)?;
    let longitude = context.angle_or_zero(longitude)?;
    let offset = false_offset(context, x, y)?;

    if context.key.ends_with("SPHERICAL") {
        projected(
            EquidistantCylindricalSpherical::new(parallel, longitude, offset, &spheroid),
            context,
        )
    } else {
        projected(
            EquidistantCylindrical::new(parallel, longitude, offset, &spheroid),
            context,
        )
    }
}

fn lambert_conic(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let latitude = ParameterSelector::keywords(&["LAT", "ORIGIN"]);
    let longitude = ParameterSelector::keywords(&["LON", "ORIGIN"]);
    let x = false_easting();
    let y = false_northing();
    let scale = ParameterSelector::keywords(&["SCALE"]);
    let first = ParameterSelector::keywords(&["LAT", "1", "PARALLEL"]);
    let second = ParameterSelector::keywords(&["LAT", "2", "PARALLEL"]);
    let [latitude, longitude, x, y, scale, first, second] = context
        .parameters
        .assign([&latitude, &longitude, &x, &y, &scale, &first, &second]);

    let Some(spheroid) = context.spheroid() else {
        return context.missing("spheroid");
    };
    let origin = GeographicCoordinate::new(
        context.angle_or_zero(latitude)?,
        context.angle_or_zero(longitude)?,
    );
    let offset = false_offset(context, x, y)?;

    let mapping = match (first, second, scale) {
        (Some(_), Some(_), _) => {
            let first = context.angle(first)?;
            let second = context.angle(second)?;
            if context.key.ends_with("BELGIUM") {
                LambertConicConformal::belgium(origin, first, second, offset, &spheroid)
            } else {
                LambertConicConformal::two_standard_parallels(origin, first, second, offset, &spheroid)
            }
        }
        (_, _, Some(_)) => LambertConicConformal::one_standard_parallel(
            origin,
            context.scale(scale)?,
            offset,
            &spheroid,
        ),
        _ => return context.missing("standard parallels or scale factor"),
    };
    projected(mapping, context)
}

fn krovak(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let cone = ParameterSelector::keywords(&["CO", "LAT", "CONE", "AXIS"]);
    let centre = ParameterSelector::keywords(&["LAT", "CENTER"]);
    let pseudo = ParameterSelector::keywords(&["LAT", "PSEUDO", "PARALLEL"]);
    let scale = ParameterSelector::keywords(&["SCALE", "PARALLEL"]);
    let longitude = ParameterSelector::keywords(&["LON", "ORIGIN"]);
    let x = false_easting();
    let y = false_northing();
    let evaluation_x = ParameterSelector::keywords(&["ORDINATE1", "EVALUATION", "POINT"]);
    let evaluation_y = ParameterSelector::keywords(&["ORDINATE2", "EVALUATION", "POINT"]);

    let modified = context.key.starts_with("KROVAKMODIFIED");
    let north = context.key.ends_with("NORTH");

    let mut selectors = vec![
        cone,
        centre,
        pseudo,
        scale,
        longitude,
        x,
        y,
        evaluation_x,
        evaluation_y,
    ];
    if modified {
        selectors.extend(constant_selectors());
    }
    let bound = context.parameters.assign_all(&selectors);
    let &[cone, centre, pseudo, scale, longitude, x, y, evaluation_x, evaluation_y] = &bound[..9]
    else {
        return None;
    };

    let Some(spheroid) = context.spheroid() else {
        return context.missing("spheroid");
    };
    let Some(azimuth) = context.angle(cone) else {
        return context.missing("co-latitude of cone axis");
    };
    let Some(pseudo_parallel) = context.angle(pseudo) else {
        return context.missing("latitude of pseudo standard parallel");
    };
    let Some(scale_factor) = context.scale(scale) else {
        return context.missing("scale factor on pseudo standard parallel");
    };
    let origin = GeographicCoordinate::new(
        context.angle_or_zero(centre)?,
        context.angle_or_zero(longitude)?,
    );
    let offset = false_offset(context, x, y)?;

    if !modified {
        let mapping = Krovak::new(origin, pseudo_parallel, azimuth, scale_factor, offset, &spheroid);
        return if north {
            projected(mapping.north_orientated(), context)
        } else {
            projected(mapping, context)
        };
    }

    let mut constants = [0.0; 10];
    for (slot, parameter) in constants.iter_mut().zip(&bound[9..]) {
        let Some(value) = parameter.and_then(|p| p.value_in(&Unit::unity())) else {
            return context.missing("Krovak Modified polynomial constant");
        };
        *slot = value;
    }
    let evaluation_point = Point2::new(
        context.length_or_zero(evaluation_x)?,
        context.length_or_zero(evaluation_y)?,
    );
    let mapping = KrovakModified::new(
        origin,
        pseudo_parallel,
        azimuth,
        scale_factor,
        offset,
        &spheroid,
        evaluation_point,
        constants,
    );
    if north {
        projected(mapping.north_orientated(), context)
    } else {
        projected(mapping, context)
    }
}

/// Full match selectors for C1..C10, ordered by their numeric suffix
fn constant_selectors() -> Vec<ParameterSelector> {
    let mut names: Vec<String> = (1..=10).rev().map(|i| format!("C{}", i)).collect();
    names.sort_by_key(|name| name[1..].parse::<u32>().unwrap_or(u32::MAX));
    names
        .iter()
        .map(|name| ParameterSelector::full_match(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Crs, GeodeticDatum, OperationInfo, OperationMethod};
    use meridian_transform::{Coordinate, Spheroid};

    fn dms(degrees: f64, minutes: f64, seconds: f64) -> f64 {
        degrees + minutes / 60.0 + seconds / 3600.0
    }

    fn crs_pair(spheroid: Spheroid, unit: Unit) -> (Crs, Crs) {
        let base = Crs::geographic(1, "base", GeodeticDatum::new("datum", spheroid));
        let projected = Crs::projected(2, "projected", &base, OperationInfo::new("p", vec![]), unit)
            .unwrap();
        (base, projected)
    }

    fn compile(
        operation: &OperationInfo,
        base: &Crs,
        projected: &Crs,
    ) -> Option<StepCompilationResult> {
        let degree = Unit::degree();
        let parameters = StepCompilationParameters::new(operation)
            .with_input_unit(&degree)
            .with_crs(Some(base), Some(projected));
        ProjectionStepCompiler::new().compile(&parameters)
    }

    fn project(result: &StepCompilationResult, latitude: f64, longitude: f64) -> Point2 {
        match result
            .transformation
            .transform(GeographicCoordinate::new(latitude, longitude).into())
            .unwrap()
        {
            Coordinate::Projected(point) => point,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_mercator_1sp_binding() {
        let (base, projected) = crs_pair(Spheroid::bessel_1841(), Unit::metre());
        let operation = OperationInfo::new(
            "Makassar / NEIEZ",
            vec![
                NamedParameter::new("Latitude of natural origin", 0.0, Unit::degree()),
                NamedParameter::new("Longitude of natural origin", 110.0, Unit::degree()),
                NamedParameter::unitless("Scale factor at natural origin", 0.997),
                NamedParameter::new("False easting", 3_900_000.0, Unit::metre()),
                NamedParameter::new("False northing", 900_000.0, Unit::metre()),
            ],
        )
        .with_method(OperationMethod::new("Mercator (variant A)"));

        let result = compile(&operation, &base, &projected).unwrap();
        assert_eq!(result.output_unit, Unit::metre());
        let point = project(&result, -3.0, 120.0);
        assert!((point.x - 5_009_726.58).abs() < 0.01, "{}", point.x);
        assert!((point.y - 569_150.82).abs() < 0.01, "{}", point.y);
    }

    #[test]
    fn test_mercator_2sp_binding() {
        let krassowsky = Spheroid::from_inverse_flattening(6_378_245.0, 298.3, Unit::metre());
        let (base, projected) = crs_pair(krassowsky, Unit::metre());
        let operation = OperationInfo::new(
            "Pulkovo 1942 / Mercator 2SP",
            vec![
                NamedParameter::new("Latitude of 1st standard parallel", 42.0, Unit::degree()),
                NamedParameter::new("Longitude of natural origin", 51.0, Unit::degree()),
                NamedParameter::new("False easting", 0.0, Unit::metre()),
                NamedParameter::new("False northing", 0.0, Unit::metre()),
            ],
        )
        .with_method(OperationMethod::new("Mercator (2SP)"));

        let result = compile(&operation, &base, &projected).unwrap();
        let point = project(&result, 53.0, 53.0);
        assert!((point.x - 165_704.29).abs() < 0.01, "{}", point.x);
        assert!((point.y - 5_171_848.07).abs() < 0.01, "{}", point.y);
    }

    #[test]
    fn test_krovak_worked_example() {
        let (base, projected) = crs_pair(Spheroid::bessel_1841(), Unit::metre());
        let operation = OperationInfo::new(
            "S-JTSK / Krovak",
            vec![
                NamedParameter::new("Latitude of projection centre", 49.5, Unit::degree()),
                NamedParameter::new("Longitude of origin", dms(24.0, 50.0, 0.0), Unit::degree()),
                NamedParameter::new(
                    "Co-latitude of cone axis",
                    dms(30.0, 17.0, 17.30311),
                    Unit::degree(),
                ),
                NamedParameter::new("Latitude of pseudo standard parallel", 78.5, Unit::degree()),
                NamedParameter::unitless("Scale factor on pseudo standard parallel", 0.9999),
                NamedParameter::new("False easting", 0.0, Unit::metre()),
                NamedParameter::new("False northing", 0.0, Unit::metre()),
            ],
        )
        .with_method(OperationMethod::new("Krovak"));

        let result = compile(&operation, &base, &projected).unwrap();
        let point = project(&result, dms(50.0, 12.0, 32.442), dms(16.0, 50.0, 59.179));
        assert!((point.x - 1_050_538.63).abs() < 0.01, "{}", point.x);
        assert!((point.y - 568_991.00).abs() < 0.01, "{}", point.y);
    }

    #[test]
    fn test_krovak_requires_mandatory_roles() {
        let (base, projected) = crs_pair(Spheroid::bessel_1841(), Unit::metre());
        let operation = OperationInfo::new(
            "Krovak without scale",
            vec![
                NamedParameter::new("Co-latitude of cone axis", 30.288_139_75, Unit::degree()),
                NamedParameter::new("Latitude of pseudo standard parallel", 78.5, Unit::degree()),
            ],
        )
        .with_method(OperationMethod::new("Krovak (North Orientated)"));
        assert!(compile(&operation, &base, &projected).is_none());
    }

    #[test]
    fn test_lambert_conic_without_parallels_or_scale() {
        let (base, projected) = crs_pair(Spheroid::wgs84(), Unit::metre());
        let operation = OperationInfo::new(
            "Lambert Conformal Conic (2SP)",
            vec![NamedParameter::new("Latitude of false origin", 27.833_333, Unit::degree())],
        );
        assert!(compile(&operation, &base, &projected).is_none());
    }

    #[test]
    fn test_lengths_follow_projected_unit() {
        let (base, projected) = crs_pair(Spheroid::wgs84(), Unit::foot());
        let operation = OperationInfo::new(
            "Mercator (1SP)",
            vec![NamedParameter::new("False easting", 1000.0, Unit::metre())],
        );
        let result = compile(&operation, &base, &projected).unwrap();
        assert_eq!(result.output_unit, Unit::foot());
        let point = project(&result, 0.0, 0.0);
        assert!((point.x - 1000.0 / 0.3048).abs() < 1e-6);
    }

    #[test]
    fn test_unconvertible_input_unit_skips_wrapper() {
        let (base, projected) = crs_pair(Spheroid::wgs84(), Unit::metre());
        let operation = OperationInfo::new("Mercator (1SP)", vec![]);
        let metre = Unit::metre();
        let parameters = StepCompilationParameters::new(&operation)
            .with_input_unit(&metre)
            .with_crs(Some(&base), Some(&projected));
        let result = ProjectionStepCompiler::new()
            .compile(&parameters)
            .expect("step should compile without the unit wrapper");
        assert_eq!(result.output_unit, Unit::metre());

        // Input is read in radians, the projection's own unit
        let point = project(&result, 0.0, 1.0);
        assert!((point.x - 6_378_137.0).abs() < 1e-6, "{}", point.x);
    }

    #[test]
    fn test_recognised_but_unsupported() {
        let (base, projected) = crs_pair(Spheroid::wgs84(), Unit::metre());
        let operation = OperationInfo::new("Transverse Mercator", vec![]);
        assert!(compile(&operation, &base, &projected).is_none());
        let operation = OperationInfo::new("Geocentric translations", vec![]);
        assert!(compile(&operation, &base, &projected).is_none());
    }

    #[test]
    fn test_inverse_projection_swaps_units() {
        let (base, projected) = crs_pair(Spheroid::wgs84(), Unit::metre());
        let operation = OperationInfo::new(
            "Popular Visualisation Pseudo Mercator",
            vec![
                NamedParameter::new("Latitude of natural origin", 0.0, Unit::degree()),
                NamedParameter::new("Longitude of natural origin", 0.0, Unit::degree()),
                NamedParameter::new("False easting", 0.0, Unit::metre()),
                NamedParameter::new("False northing", 0.0, Unit::metre()),
            ],
        );
        let inverse = operation.inverse().unwrap();
        let metre = Unit::metre();
        let parameters = StepCompilationParameters::new(&inverse)
            .with_input_unit(&metre)
            .with_crs(Some(&projected), Some(&base));
        let result = ProjectionStepCompiler::new().compile(&parameters).unwrap();
        assert_eq!(result.output_unit, Unit::radian());
        let value = result
            .transformation
            .transform(Point2::new(0.0, 0.0).into())
            .unwrap();
        assert!(matches!(value, Coordinate::Geographic(g) if g.latitude.abs() < 1e-12));
    }

    #[test]
    fn test_constant_selectors_sorted_numerically() {
        let selectors = constant_selectors();
        assert_eq!(selectors.len(), 10);
        assert_eq!(selectors[0], ParameterSelector::full_match("C1"));
        assert_eq!(selectors[1], ParameterSelector::full_match("C2"));
        assert_eq!(selectors[9], ParameterSelector::full_match("C10"));
    }
}
