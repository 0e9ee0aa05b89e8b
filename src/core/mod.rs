//! # Core Module
//!
//! The UI-agnostic filing engine. Data flows one way:
//! scanner -> catalog -> organize (cluster) -> reporter -> organize (move).
//!
//! ## Modules
//! - `scanner` - Expands path arguments into candidate files
//! - `metadata` - Reads capture time and GPS position from EXIF
//! - `geocode` - Turns a GPS position into a place label
//! - `catalog` - Tags candidates into photo records
//! - `organize` - Clusters records into folders and moves files
//! - `reporter` - Renders the proposed folders for review

pub mod catalog;
pub mod geocode;
pub mod metadata;
pub mod organize;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogBuilder, PhotoRecord};
pub use geocode::{PlaceLabeler, PlaceResolver, UNKNOWN_PLACE};
pub use metadata::{Coordinate, MetadataResolver, PhotoMetadata};
pub use organize::{Cluster, ClusterPlan, Clusterer, Mover};
