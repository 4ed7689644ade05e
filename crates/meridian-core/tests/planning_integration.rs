//! End-to-end planning tests over the fixture registry
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::sync::Arc;

use meridian_core::{
    CoordinateOperationPlanner, Crs, CrsCode, CrsDefinition, Error, GeodeticDatum,
    InMemoryRegistry, OperationInfo, OperationMethod, PlanStrategy, PlannerConfig,
};
use meridian_core::model::ProjectedCrs;
use meridian_transform::{Coordinate, Spheroid, Unit};

use test_support::*;

fn planner() -> CoordinateOperationPlanner {
    CoordinateOperationPlanner::new(fixture_registry())
}

#[test]
fn test_ed50_to_wgs84_through_reference_frame() {
    let planned = planner()
        .plan(ED50, WGS84)
        .unwrap()
        .expect("operation should exist");
    assert_eq!(planned.strategy, PlanStrategy::Structural);

    let names: Vec<String> = planned
        .steps
        .iter()
        .map(|step| step.operation.display_name())
        .collect();
    assert_eq!(
        names,
        vec![
            "European Datum 1950 geographic to geocentric",
            "European Datum 1950 to reference frame",
            "Inverse of World Geodetic System 1984 to reference frame",
            "Inverse of World Geodetic System 1984 geographic to geocentric",
        ]
    );
    assert!(planned.chain.output_unit.is_equivalent(&Unit::degree()));

    let (latitude, longitude) =
        lat_lon(planned.chain.transformation.transform(degrees(53.0, 4.0)).unwrap());
    assert!((latitude - 52.999_227_597).abs() < 1e-7);
    assert!((longitude - 3.998_634_286).abs() < 1e-7);
}

#[test]
fn test_round_trip_through_projection() {
    let planner = planner();
    let forward = planner.plan(WGS84, WORLD_MERCATOR).unwrap().unwrap();
    assert_eq!(forward.steps.len(), 1);
    assert!(forward.chain.output_unit.is_equivalent(&Unit::metre()));

    let inverse = forward.chain.transformation.inverse().unwrap();
    for (latitude, longitude) in [(0.0, 0.0), (51.5, -0.12), (-33.9, 151.2), (79.0, 179.0)] {
        let projected = forward
            .chain
            .transformation
            .transform(degrees(latitude, longitude))
            .unwrap();
        assert!(matches!(projected, Coordinate::Projected(_)));
        let (lat, lon) = lat_lon(inverse.transform(projected).unwrap());
        assert!((lat - latitude).abs() < 1e-9);
        assert!((lon - longitude).abs() < 1e-9);
    }
}

#[test]
fn test_projected_to_base_is_single_inverse_step() {
    let planned = planner().plan(WORLD_MERCATOR, WGS84).unwrap().unwrap();
    assert_eq!(planned.steps.len(), 1);
    assert!(planned.steps[0].operation.is_inverse_of_definition());
    assert_eq!(planned.chain.step_count, 1);
}

#[test]
fn test_geographic_to_geocentric_same_datum() {
    let planned = planner().plan(WGS84, WGS84_GEOCENTRIC).unwrap().unwrap();
    assert_eq!(planned.strategy, PlanStrategy::Structural);
    assert_eq!(planned.steps.len(), 1);

    match planned.chain.transformation.transform(degrees(0.0, 0.0)).unwrap() {
        Coordinate::Geocentric(point) => {
            assert!((point.x - 6_378_137.0).abs() < 1e-6);
            assert!(point.y.abs() < 1e-6);
            assert!(point.z.abs() < 1e-6);
        }
        other => panic!("expected geocentric output, got {:?}", other),
    }
}

#[test]
fn test_identical_datum_needs_no_operation() {
    let datum = GeodeticDatum::new("Shared", Spheroid::wgs84());
    let registry = InMemoryRegistry::builder()
        .crs(Crs::geographic(9101, "Shared A", datum.clone()))
        .crs(Crs::geographic(9102, "Shared B", datum))
        .build()
        .unwrap();
    let planned = CoordinateOperationPlanner::new(Arc::new(registry))
        .plan(CrsCode(9101), CrsCode(9102))
        .unwrap()
        .unwrap();
    assert!(planned.steps.is_empty());
    assert_eq!(planned.chain.step_count, 0);
}

#[test]
fn test_unsupported_kinds_are_rejected() {
    let registry = InMemoryRegistry::builder()
        .crs(geographic(4326, "WGS 84", None))
        .crs(Crs::vertical(5703, "NAVD88 height", "North American Vertical Datum 1988"))
        .crs(Crs::compound(9200, "WGS 84 + NAVD88 height", WGS84, NAVD88))
        .build()
        .unwrap();
    let planner = CoordinateOperationPlanner::new(Arc::new(registry));

    for code in [NAVD88, CrsCode(9200)] {
        assert!(matches!(
            planner.plan(WGS84, code),
            Err(Error::UnsupportedKind { .. })
        ));
        assert!(matches!(
            planner.plan(code, WGS84),
            Err(Error::UnsupportedKind { .. })
        ));
    }
}

#[test]
fn test_cyclic_base_chain_is_reported() {
    let datum = GeodeticDatum::new("Loop", Spheroid::wgs84());
    let projected = |code: u32, base: u32| {
        Crs::new(
            code,
            format!("Loop {}", code),
            CrsDefinition::Projected(ProjectedCrs {
                base: CrsCode(base),
                datum: datum.clone(),
                projection: OperationInfo::new("Loop projection", vec![])
                    .with_method(OperationMethod::new("Popular Visualisation Pseudo Mercator")),
                unit: Unit::metre(),
                axes: Vec::new(),
            }),
        )
    };
    let registry = InMemoryRegistry::builder()
        .crs(Crs::geographic(9300, "Loop base", datum.clone()))
        .crs(projected(9301, 9302))
        .crs(projected(9302, 9301))
        .build()
        .unwrap();

    let result =
        CoordinateOperationPlanner::new(Arc::new(registry)).plan(CrsCode(9301), CrsCode(9300));
    match result {
        Err(Error::CyclicBaseChain { crs, chain }) => {
            assert_eq!(crs, CrsCode(9301));
            assert_eq!(chain, vec![CrsCode(9301), CrsCode(9302), CrsCode(9301)]);
        }
        other => panic!("expected a cyclic chain error, got {:?}", other),
    }
}

fn sexagesimal_registry(operation: Option<OperationInfo>) -> Arc<InMemoryRegistry> {
    let odd = Spheroid::from_axes(6_378_137.0, 6_356_752.314, Unit::sexagesimal_dms());
    let mut builder = InMemoryRegistry::builder()
        .crs(Crs::geographic(9401, "Metric", GeodeticDatum::new("Metric", Spheroid::wgs84())))
        .crs(Crs::geographic(9402, "Odd", GeodeticDatum::new("Odd", odd)));
    if let Some(operation) = operation {
        builder = builder.operation(operation);
    }
    Arc::new(builder.build().unwrap())
}

#[test]
fn test_sexagesimal_spheroid_unit_is_not_implemented() {
    let result = CoordinateOperationPlanner::new(sexagesimal_registry(None))
        .plan(CrsCode(9401), CrsCode(9402));
    assert!(matches!(result, Err(Error::NotImplemented { .. })));
}

#[test]
fn test_structural_failure_falls_back_to_published_operation() {
    let registry = sexagesimal_registry(Some(offset("Metric to Odd", 9401, 9402, 1.0)));
    let planned = CoordinateOperationPlanner::new(registry)
        .plan(CrsCode(9401), CrsCode(9402))
        .unwrap()
        .expect("published operation should be used");
    assert_eq!(planned.strategy, PlanStrategy::GraphSearch);
    assert_eq!(planned.steps.len(), 1);

    let (latitude, longitude) =
        lat_lon(planned.chain.transformation.transform(degrees(10.0, 20.0)).unwrap());
    assert!((latitude - (10.0 + 1.0 / 3600.0)).abs() < 1e-9);
    assert!((longitude - (20.0 - 1.0 / 3600.0)).abs() < 1e-9);
}

#[test]
fn test_falls_back_to_graph_search() {
    let config = PlannerConfig {
        max_base_chain_depth: 0,
        ..PlannerConfig::default()
    };
    let planner = CoordinateOperationPlanner::with_config(fixture_registry(), config);
    let planned = planner.plan(WORLD_MERCATOR, WGS84).unwrap().unwrap();
    assert_eq!(planned.strategy, PlanStrategy::GraphSearch);
    assert_eq!(planned.steps.len(), 1);
}

#[test]
fn test_spheroid_change_converts_through_geocentric() {
    let registry = InMemoryRegistry::builder()
        .crs(geographic(9501, "Island", None))
        .crs(Crs::geographic(
            9502,
            "Mainland",
            GeodeticDatum::new("Mainland", Spheroid::international_1924()),
        ))
        .build()
        .unwrap();
    let planned = CoordinateOperationPlanner::new(Arc::new(registry))
        .plan(CrsCode(9501), CrsCode(9502))
        .unwrap()
        .unwrap();
    assert_eq!(planned.steps.len(), 2);
    assert_eq!(planned.chain.step_count, 2);
}

#[test]
fn test_no_known_operation_is_none() {
    let base = geographic(9601, "Base", None);
    let one_way = OperationInfo::new("Forward only", vec![])
        .with_method(OperationMethod::new("Popular Visualisation Pseudo Mercator"))
        .one_way();
    let projected = Crs::projected(9602, "Base / forward only", &base, one_way, Unit::metre())
        .expect("base is geodetic");
    let registry = InMemoryRegistry::builder()
        .crs(base)
        .crs(projected)
        .crs(geographic(9603, "Elsewhere", None))
        .build()
        .unwrap();
    let planner = CoordinateOperationPlanner::with_config(
        Arc::new(registry),
        PlannerConfig {
            max_base_chain_depth: 0,
            ..PlannerConfig::default()
        },
    );
    assert!(planner.plan(CrsCode(9602), CrsCode(9603)).unwrap().is_none());
}
