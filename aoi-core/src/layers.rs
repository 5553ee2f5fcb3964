//! Registre des couches cartographiques
//!
//! Pas de cycle de vie au-delà du basculement de visibilité.

use crate::types::{Layer, LayerKind};

/// Ensemble ordonné de couches avec bascule de visibilité par id
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSet {
    layers: Vec<Layer>,
}

impl LayerSet {
    /// Registre vide
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Les couches de base fournies par défaut par l'application
    pub fn with_defaults() -> Self {
        Self {
            layers: vec![
                Layer {
                    id: "esri-satellite".to_string(),
                    name: "Satellite Imagery (Esri)".to_string(),
                    visible: true,
                    kind: LayerKind::Tile,
                    url: Some(
                        "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
                            .to_string(),
                    ),
                },
                Layer {
                    id: "wms-satellite".to_string(),
                    name: "Satellite Imagery (NRW)".to_string(),
                    visible: false,
                    kind: LayerKind::Wms,
                    url: Some("https://www.wms.nrw.de/geobasis/wms_nw_dop".to_string()),
                },
            ],
        }
    }

    /// Toutes les couches, dans l'ordre
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Ajoute une couche au registre
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Bascule la visibilité de la couche d'id donné.
    ///
    /// Retourne la nouvelle visibilité, ou `None` si l'id est inconnu.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|l| l.id == id)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    /// Les couches actuellement visibles
    pub fn visible(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::new()
    }
}
