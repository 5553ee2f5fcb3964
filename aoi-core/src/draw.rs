//! Adaptateur de surface de dessin
//!
//! Fait le pont entre une surface de dessin interactive (widget carte,
//! collaborateur externe) et le store de features. La surface émet des
//! événements bruts `(forme, géométrie)`; l'adaptateur assigne un id frais,
//! horodate, applique la couleur par défaut et pousse la feature dans le
//! store.
//!
//! Les formes hors du modèle (rectangle, cercle) sont normalisées vers le
//! `kind` supporté le plus proche (polygon) en conservant la géométrie
//! réellement dessinée. Une géométrie vide ou dégénérée est écartée en
//! silence et l'adaptateur revient à l'état repos.

use chrono::{SecondsFormat, Utc};
use geojson::Geometry;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use crate::error::AoiError;
use crate::storage::Storage;
use crate::store::FeatureStore;
use crate::types::{Feature, FeatureKind, FeatureProperties};

/// Forme brute telle que rapportée par la surface de dessin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawShapeKind {
    Marker,
    Polyline,
    Polygon,
    Rectangle,
    Circle,
}

impl RawShapeKind {
    /// Normalise vers le `kind` supporté le plus proche.
    ///
    /// Rectangle et cercle sont stockés comme polygones; la géométrie
    /// dessinée est conservée telle quelle.
    pub fn normalized(self) -> FeatureKind {
        match self {
            Self::Marker => FeatureKind::Marker,
            Self::Polyline => FeatureKind::Polyline,
            Self::Polygon | Self::Rectangle | Self::Circle => FeatureKind::Polygon,
        }
    }
}

impl fmt::Display for RawShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Marker => "marker",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
        };
        write!(f, "{name}")
    }
}

/// Événement brut émis par la surface de dessin
#[derive(Debug, Clone)]
pub enum DrawEvent {
    /// L'utilisateur a sélectionné un outil et commence à dessiner
    ToolSelected(RawShapeKind),

    /// La forme est terminée (double-clic, fermeture du polygone, clic marker)
    Completed {
        shape: RawShapeKind,
        geometry: geo::Geometry<f64>,
    },

    /// Dessin annulé (échap)
    Cancelled,

    /// Suppression d'une forme existante, identifiée par l'id de sa feature
    Deleted { id: String },
}

/// État de l'adaptateur (une seule forme active à la fois sur la surface)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    /// Aucun outil actif
    Idle,
    /// Forme en cours de définition
    Drawing(RawShapeKind),
}

/// Machine à états reliant la surface de dessin au store
#[derive(Debug)]
pub struct DrawAdapter {
    state: DrawState,
}

impl Default for DrawAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawAdapter {
    pub fn new() -> Self {
        Self {
            state: DrawState::Idle,
        }
    }

    /// État courant
    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Traite un événement de la surface de dessin.
    ///
    /// Retourne l'id de la feature créée quand l'événement aboutit à un
    /// ajout dans le store. Une géométrie malformée est écartée (logué en
    /// debug, jamais remonté à l'utilisateur) et l'état repasse à `Idle`.
    pub fn handle<S: Storage>(
        &mut self,
        store: &mut FeatureStore<S>,
        event: DrawEvent,
    ) -> Option<String> {
        match event {
            DrawEvent::ToolSelected(shape) => {
                self.state = DrawState::Drawing(shape);
                None
            }
            DrawEvent::Cancelled => {
                self.state = DrawState::Idle;
                None
            }
            DrawEvent::Deleted { id } => {
                // Transition indépendante: pas de passage par Drawing
                store.remove(&id);
                None
            }
            DrawEvent::Completed { shape, geometry } => {
                self.state = DrawState::Idle;
                match build_feature(shape, &geometry) {
                    Ok(feature) => {
                        let id = feature.id.clone();
                        store.add(feature);
                        Some(id)
                    }
                    Err(e) => {
                        debug!(error = %e, shape = %shape, "Discarding malformed geometry from drawing surface");
                        None
                    }
                }
            }
        }
    }
}

/// Génère un identifiant de feature frais, jamais réutilisé
pub fn fresh_feature_id() -> String {
    Uuid::new_v4().to_string()
}

/// Construit une feature depuis une forme brute terminée
fn build_feature(shape: RawShapeKind, geometry: &geo::Geometry<f64>) -> Result<Feature, AoiError> {
    if is_degenerate(geometry) {
        return Err(AoiError::empty_geometry(shape.to_string()));
    }

    Ok(Feature {
        id: fresh_feature_id(),
        kind: shape.normalized(),
        geometry: Geometry::new(geojson::Value::from(geometry)),
        properties: FeatureProperties::stamped(created_at_stamp()),
    })
}

/// Horodatage ISO-8601 en millisecondes, UTC
fn created_at_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Vrai si la géométrie brute est vide ou trop petite pour sa forme
fn is_degenerate(geometry: &geo::Geometry<f64>) -> bool {
    use geo::Geometry as G;
    match geometry {
        G::Point(_) | G::Line(_) | G::Rect(_) | G::Triangle(_) => false,
        G::LineString(ls) => ls.0.len() < 2,
        G::Polygon(p) => p.exterior().0.len() < 4,
        G::MultiPoint(mp) => mp.0.is_empty(),
        G::MultiLineString(mls) => mls.0.is_empty() || mls.0.iter().all(|ls| ls.0.len() < 2),
        G::MultiPolygon(mp) => mp.0.is_empty(),
        G::GeometryCollection(gc) => gc.0.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use geo::{line_string, point, polygon};
    use std::collections::HashSet;

    fn new_store() -> FeatureStore<MemoryStorage> {
        FeatureStore::load(MemoryStorage::new())
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| fresh_feature_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_marker_commit() {
        let mut store = new_store();
        let mut adapter = DrawAdapter::new();

        adapter.handle(&mut store, DrawEvent::ToolSelected(RawShapeKind::Marker));
        assert_eq!(adapter.state(), DrawState::Drawing(RawShapeKind::Marker));

        let id = adapter.handle(
            &mut store,
            DrawEvent::Completed {
                shape: RawShapeKind::Marker,
                geometry: geo::Geometry::Point(point!(x: 7.2, y: 51.5)),
            },
        );

        assert!(id.is_some());
        assert_eq!(adapter.state(), DrawState::Idle);

        let feature = &store.features()[0];
        assert_eq!(feature.id, id.unwrap());
        assert_eq!(feature.kind, FeatureKind::Marker);
        assert_eq!(feature.properties.color.as_deref(), Some("#0ea5e9"));
        assert!(!feature.properties.created_at.is_empty());
    }

    #[test]
    fn test_rectangle_is_stored_as_polygon() {
        let mut store = new_store();
        let mut adapter = DrawAdapter::new();

        // Anneau à quatre coins tel que rapporté par la surface
        let rect_ring = polygon![
            (x: 7.0, y: 51.0),
            (x: 7.5, y: 51.0),
            (x: 7.5, y: 51.4),
            (x: 7.0, y: 51.4),
        ];

        adapter.handle(
            &mut store,
            DrawEvent::Completed {
                shape: RawShapeKind::Rectangle,
                geometry: geo::Geometry::Polygon(rect_ring),
            },
        );

        let feature = &store.features()[0];
        assert_eq!(feature.kind, FeatureKind::Polygon);

        // La géométrie dessinée est conservée: anneau fermé de 5 positions
        match &feature.geometry.value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0][0], rings[0][4]);
                assert_eq!(rings[0][0], vec![7.0, 51.0]);
            }
            other => panic!("Expected polygon geometry, got {other:?}"),
        }
    }

    #[test]
    fn test_circle_normalizes_to_polygon_kind() {
        assert_eq!(RawShapeKind::Circle.normalized(), FeatureKind::Polygon);
        assert_eq!(RawShapeKind::Rectangle.normalized(), FeatureKind::Polygon);
        assert_eq!(RawShapeKind::Polyline.normalized(), FeatureKind::Polyline);
    }

    #[test]
    fn test_degenerate_polyline_is_discarded() {
        let mut store = new_store();
        let mut adapter = DrawAdapter::new();

        adapter.handle(&mut store, DrawEvent::ToolSelected(RawShapeKind::Polyline));
        let id = adapter.handle(
            &mut store,
            DrawEvent::Completed {
                shape: RawShapeKind::Polyline,
                geometry: geo::Geometry::LineString(line_string![(x: 7.0, y: 51.0)]),
            },
        );

        // Récupération locale silencieuse: rien dans le store, retour à Idle
        assert!(id.is_none());
        assert!(store.is_empty());
        assert_eq!(adapter.state(), DrawState::Idle);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut store = new_store();
        let mut adapter = DrawAdapter::new();

        adapter.handle(&mut store, DrawEvent::ToolSelected(RawShapeKind::Polygon));
        adapter.handle(&mut store, DrawEvent::Cancelled);

        assert_eq!(adapter.state(), DrawState::Idle);
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_routes_to_store_remove() {
        let mut store = new_store();
        let mut adapter = DrawAdapter::new();

        let id = adapter
            .handle(
                &mut store,
                DrawEvent::Completed {
                    shape: RawShapeKind::Marker,
                    geometry: geo::Geometry::Point(point!(x: 1.0, y: 2.0)),
                },
            )
            .unwrap();

        adapter.handle(&mut store, DrawEvent::Deleted { id });
        assert!(store.is_empty());

        // Suppression d'un id inconnu: no-op
        adapter.handle(
            &mut store,
            DrawEvent::Deleted {
                id: "nonexistent-id".to_string(),
            },
        );
        assert!(store.is_empty());
    }
}
