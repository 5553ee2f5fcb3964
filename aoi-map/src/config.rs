//! Configuration de l'application

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use aoi_core::{Layer, LayerSet};

/// Configuration principale
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Chemin du fichier de store (prioritaire sur le défaut, pas sur --store)
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// URL de base du service de géocodage (défaut: Nominatim public)
    #[serde(default)]
    pub nominatim_url: Option<String>,

    /// Couches additionnelles, ajoutées après les couches par défaut
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Config {
    /// Charge une configuration depuis un fichier JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Registre de couches: défauts de l'application + couches configurées
    pub fn layer_set(&self) -> LayerSet {
        let mut layers = LayerSet::with_defaults();
        for layer in &self.layers {
            layers.push(layer.clone());
        }
        layers
    }

    /// URL de base du géocodeur
    pub fn nominatim_url(&self) -> &str {
        self.nominatim_url
            .as_deref()
            .unwrap_or(crate::search::NOMINATIM_BASE_URL)
    }
}
