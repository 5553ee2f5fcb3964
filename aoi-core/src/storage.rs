//! Substrat de persistance clé-valeur
//!
//! Une seule clé bien connue contient le tableau JSON des features.
//! Chaque écriture remplace le document entier; l'écriture fichier passe
//! par un fichier temporaire puis un rename pour rester atomique.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::AoiError;

/// Support de stockage durable du store
///
/// `read` retourne `None` si la clé n'a jamais été écrite. Les deux
/// opérations sont synchrones; une écriture réussie est considérée durable.
pub trait Storage {
    /// Lit le payload persisté, s'il existe
    fn read(&self) -> Result<Option<String>, AoiError>;

    /// Remplace le payload persisté
    fn write(&self, payload: &str) -> Result<(), AoiError>;
}

/// Stockage fichier: un document JSON sur disque
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Crée un stockage pointant sur le fichier donné
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Chemin du fichier de stockage
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>, AoiError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, payload: &str) -> Result<(), AoiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Écriture atomique: fichier temporaire puis rename
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, payload)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Stockage en mémoire, partageable entre instances via `Clone`
///
/// Utilisé par les tests pour simuler des sessions successives sur le même
/// support, et pour provoquer des échecs d'écriture contrôlés.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    payload: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    /// Crée un stockage vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Crée un stockage pré-rempli avec un payload arbitraire
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let storage = Self::new();
        *storage.inner.payload.lock().unwrap() = Some(payload.into());
        storage
    }

    /// Fait échouer (ou non) les écritures suivantes
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Payload actuellement persisté
    pub fn payload(&self) -> Option<String> {
        self.inner.payload.lock().unwrap().clone()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, AoiError> {
        Ok(self.inner.payload.lock().unwrap().clone())
    }

    fn write(&self, payload: &str) -> Result<(), AoiError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(AoiError::storage_write("memory storage in failing mode"));
        }
        *self.inner.payload.lock().unwrap() = Some(payload.to_string());
        Ok(())
    }
}
