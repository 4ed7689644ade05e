//! The canonical operation names known to the dispatcher

use std::collections::HashSet;
use std::sync::OnceLock;

use super::normalize_basic;

/// Standard coordinate operation names, in their display form
pub const OPERATION_NAMES: &[&str] = &[
    "Albers Equal-Area Conic",
    "Azimuthal Equidistant",
    "Cassini-Soldner",
    "Cylindrical Equal Area",
    "Eckert IV",
    "Eckert VI",
    "Equidistant Conic",
    "Equidistant Cylindrical",
    "Equidistant Cylindrical (Spherical)",
    "Equirectangular",
    "Gall Stereographic",
    "Geographic2D Offsets",
    "Geostationary Satellite View",
    "Gnomonic",
    "Hotine Oblique Mercator",
    "Krovak",
    "Krovak (North Orientated)",
    "Krovak Modified",
    "Krovak Modified (North Orientated)",
    "Krovak Oblique Conic Conformal",
    "Laborde Oblique Mercator",
    "Lambert Azimuthal Equal Area",
    "Lambert Azimuthal Equal Area (Spherical)",
    "Lambert Conic Conformal (1SP)",
    "Lambert Conic Conformal (2SP)",
    "Lambert Conic Conformal (2SP Belgium)",
    "Mercator (1SP)",
    "Mercator (2SP)",
    "Miller Cylindrical",
    "Mollweide",
    "New Zealand Map Grid",
    "Oblique Mercator",
    "Oblique Stereographic",
    "Orthographic",
    "Polar Stereographic",
    "Polyconic",
    "Popular Visualisation Pseudo Mercator",
    "Robinson",
    "Rosenmund Oblique Mercator",
    "Sinusoidal",
    "Swiss Oblique Cylindrical",
    "Stereographic",
    "Transverse Mercator",
    "Transverse Mercator (South Orientated)",
    "Tunisia Mining Grid",
    "Van der Grinten",
];

fn canonical_set() -> &'static HashSet<String> {
    static CANONICAL: OnceLock<HashSet<String>> = OnceLock::new();
    CANONICAL.get_or_init(|| {
        OPERATION_NAMES
            .iter()
            .map(|name| {
                // the canonical keys carry the same north orientation rewrite
                let mut key = normalize_basic(name);
                if key.ends_with("NORTHORIENTATED") {
                    key.truncate(key.len() - "ORIENTATED".len());
                }
                if key.ends_with("OFFSETS") {
                    key.pop();
                }
                key
            })
            .collect()
    })
}

/// Whether a normalized key names a standard operation
pub fn is_canonical(normalized: &str) -> bool {
    canonical_set().contains(normalized)
}
