//! Name normalization for operation methods and parameters
//!
//! Registry names arrive as free text with inconsistent casing, punctuation
//! and word order ("Lambert Conformal Conic (2SP)", "Krovak North",
//! "Longitude rotation"). Normalization reduces them to stable keys so that
//! dispatch and parameter selection never compare raw text.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod standard_names;

const NORTH_ORIENTATED: &str = "NORTHORIENTATED";
const ORIENTATED: &str = "ORIENTATED";

/// Uppercase, then strip everything but letters and digits
///
/// Uppercasing first keeps multi-character expansions (`ß` to `SS`) inside
/// the filter, so a second pass changes nothing.
pub fn normalize_basic(text: &str) -> String {
    text.chars()
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Normalize a coordinate operation or method name to its dispatch key
///
/// Never fails; text that matches no known rewrite comes back in its
/// basic normalized form.
pub fn normalize_operation_name(text: &str) -> String {
    let mut name = normalize_basic(text);

    if name.ends_with(NORTH_ORIENTATED) {
        name.truncate(name.len() - ORIENTATED.len());
    }

    if name.contains("LONGITUDEROTATION") {
        name = name.replace("LONGITUDEROTATION", "GEOGRAPHICOFFSET");
    }

    if name.ends_with("OFFSETS") {
        name.pop();
    }

    if standard_names::is_canonical(&name) {
        return name;
    }

    if name.contains("CONFORMALCONIC") {
        let swapped = name.replace("CONFORMALCONIC", "CONICCONFORMAL");
        if standard_names::is_canonical(&swapped) {
            return swapped;
        }
    }

    if name.ends_with("AREA") {
        let conic = format!("{}CONIC", name);
        if standard_names::is_canonical(&conic) {
            return conic;
        }
    }

    name
}

/// Normalize a parameter name to its selection key
pub fn normalize_parameter_name(text: &str) -> String {
    let mut name = normalize_basic(text);
    // Repeat until stable; a replacement can expose another ("LATITUDEITUDE")
    loop {
        let next = name
            .replace("LATITUDE", "LAT")
            .replace("LONGITUDE", "LON")
            .replace("CENTRE", "CENTER");
        if next == name {
            return name;
        }
        name = next;
    }
}

/// Compare two operation names after normalization
pub fn operation_names_match(a: &str, b: &str) -> bool {
    normalize_operation_name(a) == normalize_operation_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize_basic("Mercator (1SP)"), "MERCATOR1SP");
        assert_eq!(normalize_basic("  x-axis translation "), "XAXISTRANSLATION");
        assert_eq!(normalize_basic(""), "");
        assert_eq!(normalize_basic("Straße Krovák"), "STRASSEKROVÁK");
        let once = normalize_basic("ŉ-ǅ");
        assert_eq!(normalize_basic(&once), once);
    }

    #[test]
    fn test_conic_word_order_flip() {
        assert_eq!(
            normalize_operation_name("Lambert Conformal Conic (2SP)"),
            normalize_operation_name("Lambert Conic Conformal (2SP)")
        );
        assert_eq!(
            normalize_operation_name("Lambert Conformal Conic (2SP)"),
            "LAMBERTCONICCONFORMAL2SP"
        );
    }

    #[test]
    fn test_krovak_north_equivalence() {
        assert_eq!(normalize_operation_name("Krovak (North Orientated)"), "KROVAKNORTH");
        assert_eq!(normalize_operation_name("Krovak North"), "KROVAKNORTH");
        assert_eq!(
            normalize_operation_name("Krovak Modified (North Orientated)"),
            "KROVAKMODIFIEDNORTH"
        );
    }

    #[test]
    fn test_longitude_rotation_and_offsets() {
        assert_eq!(normalize_operation_name("Longitude rotation"), "GEOGRAPHICOFFSET");
        assert_eq!(normalize_operation_name("Geographic2D offsets"), "GEOGRAPHIC2DOFFSET");
    }

    #[test]
    fn test_equal_area_gains_conic() {
        assert_eq!(normalize_operation_name("Albers Equal Area"), "ALBERSEQUALAREACONIC");
        // already canonical without the suffix
        assert_eq!(
            normalize_operation_name("Lambert Azimuthal Equal Area"),
            "LAMBERTAZIMUTHALEQUALAREA"
        );
        assert_eq!(normalize_operation_name("Made Up Equal Area"), "MADEUPEQUALAREA");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for name in [
            "Lambert Conformal Conic (1SP)",
            "Krovak (North Orientated)",
            "Longitude rotation",
            "Albers Equal Area",
            "Popular Visualisation Pseudo Mercator",
            "Geographic2D offsets",
        ] {
            let once = normalize_operation_name(name);
            assert_eq!(normalize_operation_name(&once), once, "{}", name);
        }
    }

    #[test]
    fn test_parameter_normalization() {
        assert_eq!(normalize_parameter_name("Latitude of natural origin"), "LATOFNATURALORIGIN");
        assert_eq!(
            normalize_parameter_name("Latitude of projection centre"),
            "LATOFPROJECTIONCENTER"
        );
        assert_eq!(normalize_parameter_name("Longitude offset"), "LONOFFSET");
        assert_eq!(normalize_parameter_name("latitudeitude"), "LAT");
    }

    #[test]
    fn test_operation_names_match() {
        assert!(operation_names_match("Mercator (variant A)", "MERCATOR VARIANT A"));
        assert!(!operation_names_match("Mercator (1SP)", "Mercator (2SP)"));
    }
}
