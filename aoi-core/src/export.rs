//! Export du snapshot du store vers un artefact JSON téléchargeable

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::error::AoiError;
use crate::types::Feature;

/// Sérialise le snapshot courant: tableau JSON indenté des features, verbatim
pub fn export_snapshot(features: &[Feature]) -> Result<String, AoiError> {
    Ok(serde_json::to_string_pretty(features)?)
}

/// Nom de l'artefact d'export pour un horodatage unix en millisecondes
pub fn export_filename(unix_millis: i64) -> String {
    format!("aoi-features-{unix_millis}.json")
}

/// Écrit l'artefact d'export horodaté dans le répertoire donné.
///
/// Fonction pure de l'état du store: aucune mutation. Retourne le chemin du
/// fichier écrit.
pub fn write_export(features: &[Feature], dir: &Path) -> Result<PathBuf, AoiError> {
    let path = dir.join(export_filename(Utc::now().timestamp_millis()));
    let payload = export_snapshot(features)?;

    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, payload)?;

    info!(path = %path.display(), count = features.len(), "Exported feature snapshot");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeatureKind, FeatureProperties};
    use geojson::{Geometry, Value};

    fn feature(id: &str) -> Feature {
        Feature {
            id: id.to_string(),
            kind: FeatureKind::Polyline,
            geometry: Geometry::new(Value::LineString(vec![
                vec![7.0, 51.0],
                vec![7.1, 51.1],
            ])),
            properties: FeatureProperties::stamped("2024-06-01T00:00:00.000Z"),
        }
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename(1717200000000),
            "aoi-features-1717200000000.json"
        );
    }

    #[test]
    fn test_snapshot_is_verbatim_and_ordered() {
        let features = vec![feature("a"), feature("b")];
        let json = export_snapshot(&features).unwrap();

        // Indentation lisible et ordre d'insertion conservé
        assert!(json.starts_with("[\n"));
        let pos_a = json.find("\"a\"").unwrap();
        let pos_b = json.find("\"b\"").unwrap();
        assert!(pos_a < pos_b);

        let back: Vec<Feature> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, features);
    }

    #[test]
    fn test_write_export_creates_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let features = vec![feature("a")];

        let path = write_export(&features, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("aoi-features-"));
        assert!(name.ends_with(".json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Feature> = serde_json::from_str(&content).unwrap();
        assert_eq!(back, features);
    }
}
