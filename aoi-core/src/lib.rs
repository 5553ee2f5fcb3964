//! # aoi-core
//!
//! Store de features et cycle de vie des géométries pour une session de
//! dessin d'AOI (Areas of Interest).
//!
//! ## Features
//!
//! - Collection ordonnée et durable des features dessinées (marker,
//!   polyline, polygon), persistée en JSON sous une clé unique
//! - Adaptateur surface de dessin → store (ids frais, horodatage,
//!   normalisation rectangle/cercle → polygon)
//! - Projection store → overlays en clear-and-rebuild complet
//! - Export JSON horodaté du snapshot
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aoi_core::{DrawAdapter, DrawEvent, FeatureStore, FileStorage, RawShapeKind};
//!
//! let mut store = FeatureStore::load(FileStorage::new("aoi-features.json"));
//! let mut adapter = DrawAdapter::new();
//!
//! adapter.handle(&mut store, DrawEvent::Completed {
//!     shape: RawShapeKind::Marker,
//!     geometry: geo::Geometry::Point(geo::point!(x: 7.2, y: 51.5)),
//! });
//! ```
//!
//! Le flux de données est à sens unique: adaptateur → store → (rendu,
//! export, liste). Rien d'autre ne mute le store que ses opérations
//! publiques; le rendu et l'export sont des consommateurs en lecture pure.

pub mod draw;
pub mod error;
pub mod export;
pub mod layers;
pub mod storage;
pub mod store;
pub mod sync;
pub mod types;

pub use draw::{fresh_feature_id, DrawAdapter, DrawEvent, DrawState, RawShapeKind};
pub use error::AoiError;
pub use export::{export_filename, export_snapshot, write_export};
pub use layers::LayerSet;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{FeatureStore, StoreObserver};
pub use sync::{overlay_for, Overlay, RenderSurface, RenderSync};
pub use types::{
    Feature, FeatureKind, FeatureProperties, Layer, LayerKind, MapState, DEFAULT_COLOR,
};
