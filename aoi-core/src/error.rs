//! Types d'erreurs pour le crate aoi-core

use thiserror::Error;

/// Erreurs pouvant survenir dans le cycle de vie des features
#[derive(Debug, Error)]
pub enum AoiError {
    /// Erreur d'I/O sur le support de stockage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload persisté illisible (JSON invalide ou forme inattendue)
    #[error("Corrupt store payload: {0}")]
    CorruptStore(#[from] serde_json::Error),

    /// Échec d'écriture vers le stockage durable
    #[error("Storage write failed: {reason}")]
    StorageWrite { reason: String },

    /// Géométrie vide ou dégénérée en provenance de la surface de dessin
    #[error("Empty or degenerate geometry for shape '{shape}'")]
    EmptyGeometry { shape: String },

    /// Forme brute non reconnue par l'adaptateur
    #[error("Unsupported shape kind: {0}")]
    UnsupportedShape(String),
}

impl AoiError {
    /// Crée une erreur d'écriture avec contexte
    pub fn storage_write(reason: impl Into<String>) -> Self {
        Self::StorageWrite {
            reason: reason.into(),
        }
    }

    /// Crée une erreur de géométrie dégénérée
    pub fn empty_geometry(shape: impl Into<String>) -> Self {
        Self::EmptyGeometry {
            shape: shape.into(),
        }
    }
}
