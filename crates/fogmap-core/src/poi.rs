use std::collections::HashSet;
use std::path::Path;

use fogmap_grid::{GridLayout, PointOfInterest};
use serde::Deserialize;

use crate::ConfigError;

#[derive(Debug, Deserialize)]
pub struct PoiCatalog {
    pub points: Vec<PointOfInterest>,
}

/// Load and validate the points-of-interest catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_points_of_interest(path: &Path) -> Result<PoiCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PoiFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: PoiCatalog = serde_yaml::from_str(&content)?;

    validate_points(&catalog, &GridLayout::TAIWAN)?;

    Ok(catalog)
}

fn validate_points(catalog: &PoiCatalog, layout: &GridLayout) -> Result<(), ConfigError> {
    if catalog.points.is_empty() {
        return Err(ConfigError::Validation(
            "points of interest catalog must not be empty".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for poi in &catalog.points {
        if poi.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "point of interest name must be non-empty".to_string(),
            ));
        }

        if !layout.is_in_region(poi.lat, poi.lon) {
            return Err(ConfigError::Validation(format!(
                "point of interest '{}' at ({}, {}) is outside the exploration region",
                poi.name, poi.lat, poi.lon
            )));
        }

        if !seen_names.insert(poi.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate point of interest name: '{}'",
                poi.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use fogmap_grid::PoiCategory;

    use super::*;

    fn catalog(points: Vec<PointOfInterest>) -> PoiCatalog {
        PoiCatalog { points }
    }

    fn poi(name: &str, lat: f64, lon: f64) -> PointOfInterest {
        PointOfInterest {
            name: name.to_string(),
            category: PoiCategory::Landmark,
            lat,
            lon,
            description: None,
        }
    }

    #[test]
    fn parses_yaml_catalog() {
        let yaml = r"
points:
  - name: Taipei 101
    category: landmark
    lat: 25.0339
    lon: 121.5645
  - name: Raohe Night Market
    category: food
    lat: 25.0510
    lon: 121.5774
    description: Try the pepper buns.
";
        let parsed: PoiCatalog = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(parsed.points.len(), 2);
        assert_eq!(parsed.points[1].category, PoiCategory::Food);
        assert_eq!(
            parsed.points[1].description.as_deref(),
            Some("Try the pepper buns.")
        );
        validate_points(&parsed, &GridLayout::TAIWAN).expect("valid");
    }

    #[test]
    fn validate_rejects_empty_catalog() {
        let parsed: PoiCatalog = serde_yaml::from_str("points: []").expect("parse");
        let err = validate_points(&parsed, &GridLayout::TAIWAN).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let err = validate_points(&catalog(vec![poi("  ", 25.0, 121.5)]), &GridLayout::TAIWAN)
            .unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_out_of_region_point() {
        let err = validate_points(
            &catalog(vec![poi("Tokyo Tower", 35.6586, 139.7454)]),
            &GridLayout::TAIWAN,
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside the exploration region"));
    }

    #[test]
    fn validate_rejects_case_insensitive_duplicates() {
        let err = validate_points(
            &catalog(vec![
                poi("Taipei 101", 25.0339, 121.5645),
                poi("TAIPEI 101", 25.0339, 121.5645),
            ]),
            &GridLayout::TAIWAN,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_points_of_interest(Path::new("/nonexistent/fogmap/pois.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::PoiFileIo { ref path, .. } if path.contains("pois.yaml")));
    }

    #[test]
    fn bundled_catalog_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/points_of_interest.yaml");
        let catalog = load_points_of_interest(&path).expect("bundled catalog loads");
        assert!(!catalog.points.is_empty());
    }
}
