//! Définition et implémentation des commandes CLI
//!
//! Toutes les commandes de mutation passent par les opérations publiques du
//! store; la commande `add` joue le rôle de surface de dessin et route la
//! géométrie par l'adaptateur (ids frais, normalisation des formes).

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::{info, warn};

use aoi_core::{
    write_export, DrawAdapter, DrawEvent, FeatureStore, FileStorage, RawShapeKind, RenderSync,
};

use crate::config::Config;
use crate::render::TermSurface;
use crate::search::{format_coordinates, search_location, SearchSequencer};

#[derive(Subcommand)]
pub enum Commands {
    /// List the features currently in the store
    List,

    /// Add a feature from a GeoJSON geometry file (routed through the draw adapter)
    Add {
        /// Path to a file containing a single GeoJSON geometry
        #[arg(short, long)]
        file: PathBuf,

        /// Shape kind reported by the surface (marker/polyline/polygon/rectangle/circle)
        #[arg(short, long)]
        shape: String,
    },

    /// Remove a feature by id (no-op if the id is unknown)
    Remove {
        /// Feature id
        id: String,
    },

    /// Remove all features
    Clear,

    /// Export the current snapshot to a timestamped JSON artifact
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Search for a location (Nominatim)
    Search {
        /// Free-text query
        query: String,
    },

    /// List base/overlay layers, optionally toggling one
    Layers {
        /// Layer id to toggle
        #[arg(long)]
        toggle: Option<String>,
    },
}

/// Ouvre le store de la session sur le fichier donné
fn open_store(store_path: &Path) -> FeatureStore<FileStorage> {
    FeatureStore::load(FileStorage::new(store_path))
}

/// Exécute la commande list
pub fn cmd_list(store_path: &Path) {
    let store = open_store(store_path);

    let mut sync = RenderSync::new(TermSurface::new());
    sync.refresh(store.features());

    println!("Features ({})", store.len());
    sync.surface().print();
}

/// Exécute la commande add: la CLI agit comme surface de dessin
pub fn cmd_add(store_path: &Path, file: &Path, shape: &str) -> Result<()> {
    let shape = parse_shape(shape)?;

    let content = std::fs::read_to_string(file)
        .context(format!("Failed to read geometry file: {}", file.display()))?;
    let geometry: geojson::Geometry =
        serde_json::from_str(&content).context("Failed to parse GeoJSON geometry")?;
    let raw: geo::Geometry<f64> = (&geometry)
        .try_into()
        .context("GeoJSON geometry is not a drawable shape")?;

    let mut store = open_store(store_path);
    let mut adapter = DrawAdapter::new();

    adapter.handle(&mut store, DrawEvent::ToolSelected(shape));
    match adapter.handle(
        &mut store,
        DrawEvent::Completed {
            shape,
            geometry: raw,
        },
    ) {
        Some(id) => {
            info!(id = %id, shape = %shape, "Feature added");
            println!("Added feature {id}");
        }
        // Géométrie dégénérée: écartée en silence, le store est intact
        None => warn!(shape = %shape, "Geometry was discarded, nothing added"),
    }

    Ok(())
}

/// Exécute la commande remove
pub fn cmd_remove(store_path: &Path, id: &str) {
    let mut store = open_store(store_path);

    // Projection branchée en observateur: reconstruite à la mutation
    let sync = Rc::new(RefCell::new(RenderSync::new(TermSurface::new())));
    let sink = sync.clone();
    store.subscribe(Box::new(move |features| sink.borrow_mut().refresh(features)));

    let remaining = store.remove(id).len();
    println!("Remaining features ({remaining})");
    sync.borrow().surface().print();
}

/// Exécute la commande clear
pub fn cmd_clear(store_path: &Path) {
    let mut store = open_store(store_path);
    let count = store.len();
    store.clear();
    println!("Cleared {count} feature(s)");
}

/// Exécute la commande export
pub fn cmd_export(store_path: &Path, output: &Path) -> Result<()> {
    let store = open_store(store_path);
    let path = write_export(store.features(), output)
        .context("Failed to write export artifact")?;
    println!("Exported {} feature(s) to {}", store.len(), path.display());
    Ok(())
}

/// Exécute la commande search
pub async fn cmd_search(config: &Config, query: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    // Une seule requête ici, mais le résultat passe par le séquenceur comme
    // dans une session interactive (les résultats supplantés sont ignorés)
    let mut sequencer = SearchSequencer::new();
    let ticket = sequencer.begin();

    let results = search_location(&client, config.nominatim_url(), query).await;
    if !sequencer.complete(ticket) {
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found");
        return Ok(());
    }

    for result in &results {
        match (result.lat(), result.lon()) {
            (Some(lat), Some(lon)) => {
                println!("{} ({})", result.display_name, format_coordinates(lat, lon));
            }
            _ => println!("{}", result.display_name),
        }
    }

    Ok(())
}

/// Exécute la commande layers
pub fn cmd_layers(config: &Config, toggle: Option<&str>) {
    let mut layers = config.layer_set();

    if let Some(id) = toggle {
        match layers.toggle(id) {
            Some(visible) => info!(id = id, visible = visible, "Layer toggled"),
            None => warn!(id = id, "Unknown layer id, nothing toggled"),
        }
    }

    for layer in layers.layers() {
        let mark = if layer.visible { "x" } else { " " };
        println!("[{mark}] {} ({})", layer.name, layer.id);
    }
}

/// Mappe le nom de forme CLI vers la forme brute de l'adaptateur
fn parse_shape(shape: &str) -> Result<RawShapeKind> {
    match shape.to_lowercase().as_str() {
        "marker" => Ok(RawShapeKind::Marker),
        "polyline" => Ok(RawShapeKind::Polyline),
        "polygon" => Ok(RawShapeKind::Polygon),
        "rectangle" => Ok(RawShapeKind::Rectangle),
        "circle" => Ok(RawShapeKind::Circle),
        _ => anyhow::bail!(
            "Unknown shape: {}. Use: marker, polyline, polygon, rectangle, circle",
            shape
        ),
    }
}
