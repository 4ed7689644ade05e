//! Datum transformation step compiler
//!
//! Geocentric methods (Helmert, geocentric translations) work on
//! geocentric coordinates. Unless the method is declared in the geocentric
//! domain or both related CRSs are geocentric, the compiled transform is
//! wrapped in geographic/geocentric conversions on the related spheroids.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use meridian_transform::{
    Forward, GeocentricTransformationGeographicWrapper, GeocentricTranslation,
    GeographicGeocentric, GeographicOffset, Helmert7, Reverse, Spheroid, Transformation, Unit,
    Vector3,
};

use super::step::{compile_step, CompiledCore, CoreConstructor, CoreContext};
use super::{StepCompilationParameters, StepCompilationResult, StepCompiler};
use crate::model::{Crs, CrsKind};
use crate::selector::{all_selected, ParameterSelector};

const GEOCENTRIC_DOMAIN: &str = "GEOCENTRICDOMAIN";

/// Whole-key matches; `None` marks recognised but unsupported methods
static EXACT: &[(&str, Option<CoreConstructor>)] = &[
    ("GEOGRAPHICOFFSET", Some(geographic_offset)),
    ("GEOGRAPHIC2DOFFSET", Some(geographic_offset)),
    ("GEOGRAPHICGEOCENTRICCONVERSIONS", Some(geographic_geocentric)),
    ("MOLODENSKY", None),
    ("ABRIDGEDMOLODENSKY", None),
    ("MOLODENSKYBADEKASTRANSFORMATION", None),
    ("NADCON", None),
    ("NTV2", None),
];

/// Key prefixes, tried in order after the exact matches
static PREFIXES: &[(&str, Option<CoreConstructor>)] = &[
    ("POSITIONVECTORTRANSFORMATION", Some(position_vector)),
    ("COORDINATEFRAMEROTATION", Some(coordinate_frame)),
    ("GEOGRAPHICOFFSET", Some(geographic_offset)),
    ("GEOGRAPHIC2DOFFSET", Some(geographic_offset)),
    ("GEOCENTRICTRANSLATION", Some(geocentric_translation)),
    ("GEOGRAPHICGEOCENTRIC", Some(geographic_geocentric)),
];

/// Compiles datum shifts and geodetic conversions
#[derive(Debug, Default, Clone, Copy)]
pub struct TransformationStepCompiler;

impl TransformationStepCompiler {
    pub fn new() -> Self {
        Self
    }

    fn constructor(key: &str) -> Option<CoreConstructor> {
        let entry = EXACT
            .iter()
            .find(|(name, _)| *name == key)
            .or_else(|| PREFIXES.iter().find(|(prefix, _)| key.starts_with(prefix)));
        match entry {
            Some((_, Some(constructor))) => Some(*constructor),
            Some((_, None)) => {
                log::debug!("Transformation {} is recognised but not supported", key);
                None
            }
            None => None,
        }
    }
}

impl StepCompiler for TransformationStepCompiler {
    fn name(&self) -> &str {
        "transformation"
    }

    fn compile(&self, parameters: &StepCompilationParameters<'_>) -> Option<StepCompilationResult> {
        compile_step(self.name(), Self::constructor, parameters)
    }
}

fn is_geocentric(crs: Option<&Crs>) -> bool {
    crs.is_some_and(|crs| crs.kind() == CrsKind::Geocentric)
}

/// Place a geocentric core in the domain the related CRSs call for
fn in_domain(context: &CoreContext<'_>, core: Box<dyn Transformation>) -> Option<CompiledCore> {
    let length = context.length_unit();
    if context.key.ends_with(GEOCENTRIC_DOMAIN)
        || (is_geocentric(context.input_crs) && is_geocentric(context.output_crs))
    {
        return Some(CompiledCore::new(core, length.clone(), length));
    }

    let Some(source) = context.input_spheroid() else {
        return context.missing("source spheroid");
    };
    let Some(target) = context.output_spheroid() else {
        return context.missing("target spheroid");
    };
    Some(CompiledCore::new(
        Box::new(GeocentricTransformationGeographicWrapper::new(source, target, core)),
        Unit::radian(),
        Unit::radian(),
    ))
}

/// Translation, rotation and scale roles of a seven parameter Helmert
fn helmert_parameters(context: &CoreContext<'_>) -> Option<(Vector3, Vector3, f64)> {
    let selectors = [
        ParameterSelector::keywords(&["XAXIS", "TRANSLATION"]),
        ParameterSelector::keywords(&["YAXIS", "TRANSLATION"]),
        ParameterSelector::keywords(&["ZAXIS", "TRANSLATION"]),
        ParameterSelector::keywords(&["XAXIS", "ROTATION"]),
        ParameterSelector::keywords(&["YAXIS", "ROTATION"]),
        ParameterSelector::keywords(&["ZAXIS", "ROTATION"]),
        ParameterSelector::keywords(&["SCALE"]),
    ];
    let bound = context.parameters.assign_all(&selectors);
    if !all_selected(&bound) {
        return context.missing("seven Helmert parameters");
    }
    let arc_second = Unit::arc_second();
    let arc_seconds = |index: usize| bound[index].and_then(|p| p.value_in(&arc_second));

    let translation = Vector3::new(
        context.length(bound[0])?,
        context.length(bound[1])?,
        context.length(bound[2])?,
    );
    let rotation = Vector3::new(arc_seconds(3)?, arc_seconds(4)?, arc_seconds(5)?);
    let scale = bound[6]?.value_in(&Unit::parts_per_million())?;
    Some((translation, rotation, scale))
}

fn position_vector(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let (translation, rotation, scale) = helmert_parameters(context)?;
    let core = Helmert7::position_vector(translation, rotation, scale);
    in_domain(context, Box::new(Forward::new(core)))
}

fn coordinate_frame(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let (translation, rotation, scale) = helmert_parameters(context)?;
    let core = Helmert7::coordinate_frame(translation, rotation, scale);
    in_domain(context, Box::new(Forward::new(core)))
}

fn geocentric_translation(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let x = ParameterSelector::keywords(&["XAXIS", "TRANSLATION"]);
    let y = ParameterSelector::keywords(&["YAXIS", "TRANSLATION"]);
    let z = ParameterSelector::keywords(&["ZAXIS", "TRANSLATION"]);
    let bound = context.parameters.assign([&x, &y, &z]);
    if !all_selected(&bound) {
        return context.missing("three geocentric translations");
    }
    let [x, y, z] = bound;
    let delta = Vector3::new(context.length(x)?, context.length(y)?, context.length(z)?);
    in_domain(context, Box::new(Forward::new(GeocentricTranslation::new(delta))))
}

fn geographic_offset(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let latitude = ParameterSelector::keywords(&["LAT"]);
    let longitude = ParameterSelector::keywords(&["LON"]);
    let [latitude, longitude] = context.parameters.assign([&latitude, &longitude]);
    if latitude.is_none() && longitude.is_none() {
        return context.missing("latitude or longitude offset");
    }

    let offset = GeographicOffset::new(
        context.angle_or_zero(latitude)?,
        context.angle_or_zero(longitude)?,
    );
    Some(CompiledCore::new(
        Box::new(Forward::new(offset)),
        Unit::radian(),
        Unit::radian(),
    ))
}

fn geographic_geocentric(context: &CoreContext<'_>) -> Option<CompiledCore> {
    let semi_major = ParameterSelector::keywords(&["SEMI", "MAJOR"]);
    let semi_minor = ParameterSelector::keywords(&["SEMI", "MINOR"]);
    let [semi_major, semi_minor] = context.parameters.assign([&semi_major, &semi_minor]);

    let spheroid = match (context.length(semi_major), context.length(semi_minor)) {
        (Some(a), Some(b)) => Some(Spheroid::from_axes(a, b, context.length_unit())),
        _ => context.spheroid(),
    };
    let Some(spheroid) = spheroid else {
        return context.missing("spheroid");
    };

    let conversion = GeographicGeocentric::new(spheroid);
    let length = context.length_unit();
    let reversed = is_geocentric(context.input_crs)
        && context
            .output_crs
            .is_some_and(|crs| crs.kind() == CrsKind::Geographic);
    if reversed {
        Some(CompiledCore::new(
            Box::new(Reverse::new(conversion)),
            length,
            Unit::radian(),
        ))
    } else {
        Some(CompiledCore::new(
            Box::new(Forward::new(conversion)),
            Unit::radian(),
            length,
        ))
    }
}
