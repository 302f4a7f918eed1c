//! # pylonmap-io: Document Loading & GeoJSON Output
//!
//! File boundary of the converter: reads the XML network export and the
//! optional voltage class document, runs the in-memory pipeline from
//! `pylonmap-core`, and writes the resulting GeoJSON plus optional companions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pylonmap_core::{ConversionOptions, SchemaNames};
//! use pylonmap_io::{convert, ConversionRequest};
//!
//! fn main() -> anyhow::Result<()> {
//!     let request = ConversionRequest::new("lep.xml", "lep.geojson").with_voltage("voltage.xml");
//!     let summary = convert(&request, &ConversionOptions::default(), &SchemaNames::default())?;
//!     println!("{} features", summary.features.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Outputs
//!
//! | File | When | Content |
//! |------|------|---------|
//! | `--output` | always | GeoJSON `FeatureCollection`, pretty printed |
//! | `<output>.missing.txt` | `emit_missing_coordinates` | `<name>\t<ref>` per rejected support |
//! | `--report` | on request | run metadata and diagnostics as JSON |
//!
//! All of them are written atomically (temporary file + rename).
//!
//! ## Error Handling
//!
//! A missing or malformed network document aborts the run before any file is
//! touched. Everything else degrades locally and is reported through
//! [`pylonmap_core::ConversionDiagnostics`].

pub mod convert;
pub mod loader;
pub mod writer;


pub use convert::{convert, inspect, load_voltage_table, ConversionRequest, ConversionSummary};
pub use loader::{load_objects, parse_objects};
pub use writer::{
    default_missing_log_path, write_atomic, write_collection, write_missing_log, write_report,
    ConversionReport,
};
