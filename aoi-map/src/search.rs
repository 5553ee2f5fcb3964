//! Client de recherche de lieux (Nominatim / OpenStreetMap)
//!
//! Collaborateur externe de l'UI uniquement: le store de features ne
//! l'appelle jamais. Tout échec réseau ou de parsing dégrade vers une liste
//! vide, loguée, jamais remontée comme erreur à la couche appelante. Les
//! requêtes ne sont jamais réessayées automatiquement.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// URL de base du service Nominatim public
pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Fenêtre de debounce côté UI avant d'émettre une requête
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// User-Agent exigé par la politique d'usage de Nominatim
pub const SEARCH_USER_AGENT: &str = "AOI-Creation-App";

/// Erreurs internes du client de recherche
#[derive(Debug, Error)]
pub enum SearchError {
    /// Requête HTTP échouée
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Réponse avec statut non-2xx
    #[error("Search service returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Candidat de géocodage, tel que renvoyé par Nominatim
///
/// lat/lon arrivent en chaînes sur le fil; `lat()`/`lon()` les exposent
/// parsées.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub display_name: String,
    lat: String,
    lon: String,
    #[serde(default)]
    pub boundingbox: Vec<String>,
}

impl SearchResult {
    /// Latitude en degrés décimaux
    pub fn lat(&self) -> Option<f64> {
        self.lat.parse().ok()
    }

    /// Longitude en degrés décimaux
    pub fn lon(&self) -> Option<f64> {
        self.lon.parse().ok()
    }
}

/// Recherche un lieu en texte libre.
///
/// Requête vide ou blanche: court-circuit vers une liste vide sans appel
/// réseau. Tout échec (HTTP, statut, parsing) est logué et retourne la
/// liste vide.
pub async fn search_location(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    match try_search(client, base_url, query).await {
        Ok(results) => {
            debug!(query = query, count = results.len(), "Search results");
            results
        }
        Err(e) => {
            warn!(query = query, error = %e, "Location search failed, returning empty result set");
            Vec::new()
        }
    }
}

async fn try_search(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Result<Vec<SearchResult>, SearchError> {
    let resp = client
        .get(format!("{base_url}/search"))
        .query(&[
            ("format", "json"),
            ("q", query),
            ("limit", "10"),
            ("addressdetails", "1"),
        ])
        .header(reqwest::header::USER_AGENT, SEARCH_USER_AGENT)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(SearchError::Status(resp.status()));
    }

    Ok(resp.json().await?)
}

/// Formate une paire lat/lon pour affichage (6 décimales, ~10 cm)
pub fn format_coordinates(lat: f64, lon: f64) -> String {
    format!("{lat:.6}, {lon:.6}")
}

/// Séquenceur de requêtes: une recherche en vol est supplantée, pas annulée.
///
/// Chaque requête émise reçoit un ticket croissant. Un résultat n'est
/// accepté que si aucune requête plus récente n'a déjà abouti: dernier
/// arrivé gagne, par ordre d'achèvement et non d'émission.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    issued: u64,
    last_completed: u64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Émet un nouveau ticket de requête
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Signale l'achèvement d'une requête.
    ///
    /// Retourne vrai si son résultat doit être utilisé, faux s'il est
    /// périmé (une requête plus récente a déjà abouti).
    pub fn complete(&mut self, ticket: u64) -> bool {
        if ticket >= self.last_completed {
            self.last_completed = ticket;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nominatim_payload() {
        let payload = r#"[{
            "display_name": "Düsseldorf, Nordrhein-Westfalen, Deutschland",
            "lat": "51.2254018",
            "lon": "6.7763137",
            "boundingbox": ["51.1243747", "51.3521411", "6.6858296", "6.9399704"]
        }]"#;

        let results: Vec<SearchResult> = serde_json::from_str(payload).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lat(), Some(51.2254018));
        assert_eq!(results[0].lon(), Some(6.7763137));
        assert_eq!(results[0].boundingbox.len(), 4);
    }

    #[test]
    fn test_parse_tolerates_missing_boundingbox() {
        let payload = r#"[{"display_name": "X", "lat": "1.0", "lon": "2.0"}]"#;
        let results: Vec<SearchResult> = serde_json::from_str(payload).unwrap();
        assert!(results[0].boundingbox.is_empty());
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(51.2254018, 6.7763137), "51.225402, 6.776314");
    }

    #[tokio::test]
    async fn test_blank_query_short_circuits() {
        // Aucun appel réseau: l'URL de base est volontairement invalide
        let client = reqwest::Client::new();
        let results = search_location(&client, "http://invalid.localhost", "   ").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_returns_empty() {
        let client = reqwest::Client::new();
        // Port non routable: la requête échoue, le résultat est vide
        let results = search_location(&client, "http://127.0.0.1:1", "Düsseldorf").await;
        assert!(results.is_empty());
    }

    #[test]
    fn test_sequencer_discards_superseded_results() {
        let mut seq = SearchSequencer::new();
        let first = seq.begin();
        let second = seq.begin();

        // La requête la plus récente aboutit d'abord: l'ancienne est périmée
        assert!(seq.complete(second));
        assert!(!seq.complete(first));
    }

    #[test]
    fn test_sequencer_accepts_in_order_completion() {
        let mut seq = SearchSequencer::new();
        let first = seq.begin();
        let second = seq.begin();

        // Achèvement dans l'ordre d'émission: les deux résultats passent,
        // le dernier achevé l'emporte
        assert!(seq.complete(first));
        assert!(seq.complete(second));
    }
}
