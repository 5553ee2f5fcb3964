//! Projection du store vers les overlays affichables
//!
//! Projection à sens unique: à chaque changement du store, le groupe
//! d'overlays géré est entièrement vidé puis reconstruit. Pas de diff
//! incrémental: cela évite de maintenir une table de réconciliation entre
//! identité de feature et identité d'objet de rendu, et élimine toute une
//! classe de bugs d'overlays périmés. Le redraw est en O(n) par mutation,
//! acceptable pour des dizaines de features.

use chrono::DateTime;
use geojson::Geometry;

use crate::types::{Feature, DEFAULT_COLOR};

/// Un objet affichable sur la surface de rendu, clé par handle opaque
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Handle opaque (l'id de la feature source)
    pub handle: String,

    /// Étiquette affichée (popup)
    pub label: String,

    /// Couleur de tracé
    pub color: String,

    /// Géométrie GeoJSON à tracer
    pub geometry: Geometry,
}

/// Surface de rendu acceptant ajout et vidage d'overlays
///
/// Frontière avec le widget carte; le crate ne connaît que ce contrat.
pub trait RenderSurface {
    /// Vide le groupe d'overlays géré
    fn clear(&mut self);

    /// Ajoute un overlay au groupe
    fn draw(&mut self, overlay: Overlay);
}

/// Synchronisation store → surface de rendu (clear-and-rebuild complet)
pub struct RenderSync<R: RenderSurface> {
    surface: R,
}

impl<R: RenderSurface> RenderSync<R> {
    pub fn new(surface: R) -> Self {
        Self { surface }
    }

    /// Reconstruit entièrement le groupe d'overlays depuis l'état du store.
    ///
    /// À brancher comme observateur du store: chaque mutation déclenche un
    /// rebuild complet, jamais un diff.
    pub fn refresh(&mut self, features: &[Feature]) {
        self.surface.clear();
        for feature in features {
            self.surface.draw(overlay_for(feature));
        }
    }

    /// Accès à la surface sous-jacente
    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Reprend possession de la surface
    pub fn into_surface(self) -> R {
        self.surface
    }
}

/// Construit l'overlay d'une feature
pub fn overlay_for(feature: &Feature) -> Overlay {
    Overlay {
        handle: feature.id.clone(),
        label: overlay_label(feature),
        color: feature
            .properties
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        geometry: feature.geometry.clone(),
    }
}

/// Étiquette d'overlay: id, type et horodatage de création formaté
fn overlay_label(feature: &Feature) -> String {
    format!(
        "Feature ID: {} | Type: {} | Created: {}",
        feature.id,
        feature.kind,
        format_created_at(&feature.properties.created_at)
    )
}

/// Formate l'horodatage ISO-8601 pour affichage; valeur brute si illisible
fn format_created_at(created_at: &str) -> String {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => created_at.to_string(),
    }
}
