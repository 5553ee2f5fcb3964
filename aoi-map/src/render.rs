//! Surface de rendu texte pour le terminal
//!
//! Tient lieu de widget carte pour la CLI: le groupe d'overlays devient une
//! liste de lignes, reconstruite en entier à chaque rafraîchissement.

use aoi_core::{Overlay, RenderSurface};

/// Surface accumulant les overlays sous forme de lignes affichables
#[derive(Debug, Default)]
pub struct TermSurface {
    lines: Vec<String>,
}

impl TermSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lignes du groupe d'overlays courant
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Affiche le groupe courant sur stdout
    pub fn print(&self) {
        if self.lines.is_empty() {
            println!("No features drawn yet.");
            return;
        }
        for line in &self.lines {
            println!("{line}");
        }
    }
}

impl RenderSurface for TermSurface {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn draw(&mut self, overlay: Overlay) {
        let geometry_kind = match &overlay.geometry.value {
            geojson::Value::Point(_) => "Point",
            geojson::Value::LineString(_) => "LineString",
            geojson::Value::Polygon(_) => "Polygon",
            geojson::Value::MultiPoint(_) => "MultiPoint",
            geojson::Value::MultiLineString(_) => "MultiLineString",
            geojson::Value::MultiPolygon(_) => "MultiPolygon",
            geojson::Value::GeometryCollection(_) => "GeometryCollection",
        };
        self.lines
            .push(format!("{} [{}] {}", overlay.label, geometry_kind, overlay.color));
    }
}
