//! Types de données pour le crate aoi-core

use geojson::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Couleur par défaut appliquée aux features dessinées
pub const DEFAULT_COLOR: &str = "#0ea5e9";

/// Type d'une feature dessinée, fixé à la création
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Point unique
    Marker,
    /// Chemin ouvert (>= 2 points)
    Polyline,
    /// Anneau fermé
    Polygon,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marker => write!(f, "marker"),
            Self::Polyline => write!(f, "polyline"),
            Self::Polygon => write!(f, "polygon"),
        }
    }
}

/// Attributs d'une feature
///
/// Les champs inconnus sont conservés tels quels dans `extra` pour
/// survivre aux allers-retours de persistance (compatibilité ascendante).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Nom optionnel saisi par l'utilisateur
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description optionnelle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Couleur CSS (défaut: `#0ea5e9`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Horodatage de création, ISO-8601, toujours présent
    #[serde(rename = "createdAt")]
    pub created_at: String,

    /// Champs additionnels pass-through
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FeatureProperties {
    /// Crée des attributs avec la couleur par défaut et l'horodatage donné
    pub fn stamped(created_at: impl Into<String>) -> Self {
        Self {
            name: None,
            description: None,
            color: Some(DEFAULT_COLOR.to_string()),
            created_at: created_at.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Une feature géographique dessinée par l'utilisateur
///
/// Les coordonnées de `geometry` sont des paires `[longitude, latitude]`
/// en degrés WGS84, portées par le type GeoJSON standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Identifiant opaque, unique et stable pour toute la durée de vie
    pub id: String,

    /// Type de la feature (marker, polyline, polygon)
    #[serde(rename = "type")]
    pub kind: FeatureKind,

    /// Géométrie GeoJSON
    pub geometry: Geometry,

    /// Attributs (createdAt garanti présent)
    pub properties: FeatureProperties,
}

impl Feature {
    /// Vérifie que la géométrie correspond structurellement au `kind`.
    ///
    /// Purement indicatif: le store accepte les features dont la géométrie
    /// ne correspond pas au `kind` (voir la politique de permissivité du
    /// store). La responsabilité de la cohérence revient au producteur.
    pub fn kind_matches_geometry(&self) -> bool {
        use geojson::Value;
        matches!(
            (self.kind, &self.geometry.value),
            (FeatureKind::Marker, Value::Point(_))
                | (FeatureKind::Polyline, Value::LineString(_))
                | (FeatureKind::Polygon, Value::Polygon(_))
        )
    }
}

/// Source d'une couche cartographique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Tuiles raster XYZ
    Tile,
    /// Service WMS
    Wms,
    /// Couche de features vectorielles
    Feature,
}

/// Une couche de fond ou de superposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Identifiant de la couche
    pub id: String,

    /// Nom affiché
    pub name: String,

    /// Visibilité courante
    pub visible: bool,

    /// Type de source
    #[serde(rename = "type")]
    pub kind: LayerKind,

    /// URL de la source (absent pour les couches de features)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// État de la vue carte (centre + zoom)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    /// Centre `[latitude, longitude]`
    pub center: [f64; 2],

    /// Niveau de zoom
    pub zoom: u8,
}
