//! Store persistant de features
//!
//! Collection ordonnée (ordre d'insertion) et durable des features d'une
//! session. Chaque mutation persiste la collection complète de manière
//! synchrone, puis notifie les observateurs avec l'état résultant.
//!
//! Politique d'erreurs: tout dégrade vers la collection vide plutôt que de
//! planter. Un payload corrompu au chargement donne un store vide; un échec
//! d'écriture laisse l'état mémoire autoritaire pour la session (la
//! prochaine session ne verra pas la mutation non sauvée, perte acceptée).

use tracing::{debug, warn};

use crate::storage::Storage;
use crate::types::Feature;

/// Callback invoqué après chaque mutation avec l'état complet résultant
pub type StoreObserver = Box<dyn FnMut(&[Feature])>;

/// Collection ordonnée et persistée des features d'une session
///
/// Le store est la propriété exclusive de la session: toutes les mutations
/// passent par `&mut self` et sont donc sérialisées entre elles.
pub struct FeatureStore<S: Storage> {
    storage: S,
    features: Vec<Feature>,
    observers: Vec<StoreObserver>,
}

impl<S: Storage> FeatureStore<S> {
    /// Hydrate un store depuis le stockage durable.
    ///
    /// Clé absente: collection vide. Payload illisible: la condition est
    /// loguée et le store démarre vide (fail-soft, jamais d'erreur pour
    /// l'appelant, jamais de collection partielle).
    pub fn load(storage: S) -> Self {
        let features = match storage.read() {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<Feature>>(&payload) {
                Ok(features) => features,
                Err(e) => {
                    warn!(error = %e, "Corrupt store payload, starting with empty collection");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read store payload, starting with empty collection");
                Vec::new()
            }
        };

        debug!(count = features.len(), "Feature store hydrated");

        Self {
            storage,
            features,
            observers: Vec::new(),
        }
    }

    /// Les features dans l'ordre d'insertion
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Nombre de features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Vrai si la collection est vide
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Enregistre un observateur notifié après chaque mutation
    pub fn subscribe(&mut self, observer: StoreObserver) {
        self.observers.push(observer);
    }

    /// Ajoute une feature en fin de séquence et persiste.
    ///
    /// Aucune déduplication: l'unicité des `id` est garantie par le
    /// producteur (ids toujours fraîchement générés). La cohérence
    /// `kind`/`geometry` n'est pas vérifiée ici, volontairement: le store
    /// accepte ce que l'adaptateur lui donne.
    pub fn add(&mut self, feature: Feature) {
        debug!(id = %feature.id, kind = %feature.kind, "Adding feature");
        self.features.push(feature);
        self.persist();
        self.notify();
    }

    /// Retire la feature d'id donné, si elle existe.
    ///
    /// Id inconnu: no-op (pas une erreur), mais la collection est
    /// re-persistée quand même, ce qui rend l'opération idempotente vis-à-vis
    /// du stockage. Retourne la séquence résultante.
    pub fn remove(&mut self, id: &str) -> &[Feature] {
        match self.features.iter().position(|f| f.id == id) {
            Some(pos) => {
                self.features.remove(pos);
                debug!(id = %id, "Removed feature");
            }
            None => debug!(id = %id, "Remove of unknown feature id, no-op"),
        }
        self.persist();
        self.notify();
        &self.features
    }

    /// Vide la collection et persiste la collection vide
    pub fn clear(&mut self) {
        debug!(count = self.features.len(), "Clearing feature store");
        self.features.clear();
        self.persist();
        self.notify();
    }

    /// Persiste la collection complète.
    ///
    /// L'échec est logué et avalé: l'état mémoire reste autoritaire jusqu'à
    /// la prochaine écriture réussie. Pas de retry.
    fn persist(&self) {
        let payload = match serde_json::to_string(&self.features) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize feature collection");
                return;
            }
        };

        if let Err(e) = self.storage.write(&payload) {
            warn!(error = %e, "Failed to persist feature collection, in-memory state stays authoritative");
        }
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer(&self.features);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::{Feature, FeatureKind, FeatureProperties};
    use geojson::{Geometry, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn marker(id: &str) -> Feature {
        Feature {
            id: id.to_string(),
            kind: FeatureKind::Marker,
            geometry: Geometry::new(Value::Point(vec![7.1, 51.2])),
            properties: FeatureProperties::stamped("2024-06-01T00:00:00.000Z"),
        }
    }

    #[test]
    fn test_load_empty_storage() {
        let store = FeatureStore::load(MemoryStorage::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_payload_is_fail_soft() {
        let storage = MemoryStorage::with_payload("{not json");
        let store = FeatureStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_fail_soft() {
        // JSON valide mais pas un tableau de features
        let storage = MemoryStorage::with_payload(r#"{"hello": "world"}"#);
        let store = FeatureStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = FeatureStore::load(MemoryStorage::new());
        store.add(marker("a"));
        store.add(marker("b"));
        store.add(marker("c"));

        let ids: Vec<&str> = store.features().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = FeatureStore::load(MemoryStorage::new());
        store.add(marker("a"));
        store.add(marker("b"));

        let after_first: Vec<String> =
            store.remove("a").iter().map(|f| f.id.clone()).collect();
        let after_second: Vec<String> =
            store.remove("a").iter().map(|f| f.id.clone()).collect();

        assert_eq!(after_first, vec!["b"]);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = FeatureStore::load(MemoryStorage::new());
        store.add(marker("a"));

        let remaining = store.remove("nonexistent-id");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "a");
    }

    #[test]
    fn test_clear_is_absorbing() {
        let mut store = FeatureStore::load(MemoryStorage::new());
        store.add(marker("a"));
        store.clear();
        store.remove("a");
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_mismatched_kind_is_accepted() {
        // Politique délibérée: le store ne valide pas kind vs geometry
        let mut store = FeatureStore::load(MemoryStorage::new());
        let mut feature = marker("weird");
        feature.kind = FeatureKind::Polygon;
        assert!(!feature.kind_matches_geometry());

        store.add(feature);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_write_failure_keeps_memory_authoritative() {
        let storage = MemoryStorage::new();
        let mut store = FeatureStore::load(storage.clone());
        store.add(marker("a"));

        storage.set_fail_writes(true);
        store.add(marker("b"));

        // L'état mémoire contient bien les deux features
        assert_eq!(store.len(), 2);

        // Mais une session fraîche ne voit que la dernière écriture réussie
        storage.set_fail_writes(false);
        let fresh = FeatureStore::load(storage);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh.features()[0].id, "a");
    }

    #[test]
    fn test_observers_receive_full_snapshot() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let mut store = FeatureStore::load(MemoryStorage::new());
        store.subscribe(Box::new(move |features| {
            sink.borrow_mut().push(features.len());
        }));

        store.add(marker("a"));
        store.add(marker("b"));
        store.remove("a");
        store.clear();

        assert_eq!(*seen.borrow(), vec![1, 2, 1, 0]);
    }
}
