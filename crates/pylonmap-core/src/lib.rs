//! # pylonmap-core: Power Line Hierarchy to GeoJSON
//!
//! Turns the catalog objects of a power-grid asset export into a GeoJSON
//! `FeatureCollection`, keeping only the parts of the hierarchy that can be
//! drawn.
//!
//! ## Design Philosophy
//!
//! The export describes a fixed four-level hierarchy:
//! - **Power lines** own sections through an alternate key (not their ref)
//! - **Sections** own spans through the span's `parent`
//! - **Spans** connect exactly two supports
//! - **Supports** carry a latitude/longitude pair
//!
//! A level is emitted only when everything beneath it can be drawn: a support
//! needs both coordinates, a span needs two valid supports, a section needs one
//! valid span and a power line one valid section. Per-entity problems are
//! recorded in [`ConversionDiagnostics`] and never abort the run.
//!
//! ## Quick Start
//!
//! ```rust
//! use pylonmap_core::*;
//!
//! let names = SchemaNames::default();
//! let support = TaggedObject::new(&names.object_tag)
//!     .with_field(&names.reference, "A")
//!     .with_field(&names.discriminator, AssetKind::Support.discriminator())
//!     .with_child(
//!         TaggedObject::new(&names.characteristics)
//!             .with_child(
//!                 TaggedObject::new(&names.characteristic_row)
//!                     .with_field(&names.characteristic_id, LATITUDE_CHARACTERISTIC)
//!                     .with_field(&names.characteristic_value, "55.75N"),
//!             )
//!             .with_child(
//!                 TaggedObject::new(&names.characteristic_row)
//!                     .with_field(&names.characteristic_id, LONGITUDE_CHARACTERISTIC)
//!                     .with_field(&names.characteristic_value, "37.61E"),
//!             ),
//!     );
//!
//! let mut diagnostics = ConversionDiagnostics::new();
//! let outcome = convert_objects(
//!     &[support],
//!     &VoltageTable::new(),
//!     &ConversionOptions::default(),
//!     &names,
//!     &mut diagnostics,
//! );
//! assert_eq!(outcome.collection.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`document`] - Generic tagged-object tree produced by loaders
//! - [`model`] - Typed assets, refs and the flat ref → object document
//! - [`coordinates`] - Hemisphere-suffixed coordinate decoding
//! - [`classify`] / [`validity`] - Grouping and bottom-up validity
//! - [`features`] / [`geojson`] - Feature projection and the GeoJSON model
//! - [`pipeline`] - The whole in-memory conversion
//!
//! ## Integration with pylonmap-io
//!
//! File loading (quick-xml), atomic output writing and the run report live in
//! the `pylonmap-io` crate.

pub mod classify;
pub mod coordinates;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod features;
pub mod geojson;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod validity;
pub mod voltage;

pub use classify::{classify, Classification};
pub use coordinates::{Axis, CoordinatePair, GeoPoint};
pub use diagnostics::{
    ConversionDiagnostics, ConversionStats, DiagnosticIssue, FeatureCounts, Severity,
};
pub use document::TaggedObject;
pub use error::{PylonmapError, PylonmapResult};
pub use features::{type_tag, FeatureBuilder};
pub use geojson::{Feature, FeatureCollection, FeatureProperties, Geometry, Relation};
pub use model::{Asset, AssetKind, NetworkDocument, NetworkObject, ObjectRef};
pub use pipeline::{convert_objects, inspect_objects, ConversionOutcome, MissingCoordinates};
pub use schema::{
    ConversionOptions, PropertySchema, SchemaNames, LATITUDE_CHARACTERISTIC,
    LONGITUDE_CHARACTERISTIC,
};
pub use validity::{propagate, ValiditySets};
pub use voltage::{VoltageClass, VoltageTable};
