//! File-level conversion entry points.
//!
//! Load → convert → write. The input document is loaded completely before
//! anything is written, so a load failure leaves every destination untouched.
//! An unreadable voltage side document is not fatal: it becomes an error
//! diagnostic and an empty voltage table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use pylonmap_core::{
    convert_objects, inspect_objects, ConversionDiagnostics, ConversionOptions, FeatureCounts,
    SchemaNames, VoltageTable,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::loader::load_objects;
use crate::writer::{
    default_missing_log_path, write_collection, write_missing_log, write_report, ConversionReport,
};

/// Paths for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub voltage: Option<PathBuf>,
    pub output: PathBuf,
    /// Overrides the default `<output>.missing.txt`
    pub missing_log: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    pub fn with_voltage(mut self, voltage: impl Into<PathBuf>) -> Self {
        self.voltage = Some(voltage.into());
        self
    }

    pub fn with_missing_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing_log = Some(path.into());
        self
    }

    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report = Some(path.into());
        self
    }

    pub fn missing_log_path(&self) -> PathBuf {
        self.missing_log
            .clone()
            .unwrap_or_else(|| default_missing_log_path(&self.output))
    }
}

/// What a finished conversion produced.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub output: PathBuf,
    pub features: FeatureCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_log: Option<PathBuf>,
    /// Supports dropped for lacking a usable coordinate pair
    pub missing_supports: usize,
    pub diagnostics: ConversionDiagnostics,
}

/// Load the voltage side document, degrading to an empty table on failure.
pub fn load_voltage_table(
    path: &Path,
    names: &SchemaNames,
    diagnostics: &mut ConversionDiagnostics,
) -> VoltageTable {
    match load_objects(path, &names.voltage_record_tag) {
        Ok(records) => {
            let table = VoltageTable::from_records(&records, names, diagnostics);
            info!("Loaded {} voltage classes from {}", table.len(), path.display());
            table
        }
        Err(err) => {
            warn!(
                "Voltage document {} unavailable, continuing without voltages: {}",
                path.display(),
                err
            );
            diagnostics.add_error(
                "voltage",
                &format!("voltage document {} unavailable: {}", path.display(), err),
            );
            VoltageTable::new()
        }
    }
}

/// Run the whole conversion for one request.
pub fn convert(
    request: &ConversionRequest,
    options: &ConversionOptions,
    names: &SchemaNames,
) -> Result<ConversionSummary> {
    info!("Converting {}", request.input.display());
    let objects = load_objects(&request.input, &names.object_tag)
        .with_context(|| format!("loading network document {}", request.input.display()))?;

    let mut diagnostics = ConversionDiagnostics::new();
    let voltages = match (&request.voltage, options.include_voltage) {
        (Some(path), true) => load_voltage_table(path, names, &mut diagnostics),
        _ => VoltageTable::new(),
    };
    diagnostics.stats.voltage_classes = voltages.len();

    let outcome = convert_objects(&objects, &voltages, options, names, &mut diagnostics);

    write_collection(&outcome.collection, &request.output)
        .with_context(|| format!("writing GeoJSON to {}", request.output.display()))?;

    let missing_log = if options.emit_missing_coordinates {
        let path = request.missing_log_path();
        write_missing_log(&outcome.missing_coordinates, &path)
            .with_context(|| format!("writing missing-coordinate log {}", path.display()))?;
        Some(path)
    } else {
        None
    };

    if let Some(report_path) = &request.report {
        let report = ConversionReport {
            generated_at: Utc::now(),
            pylonmap_version: env!("CARGO_PKG_VERSION"),
            input: &request.input,
            voltage: request.voltage.as_deref(),
            output: &request.output,
            property_schema: options.property_schema.name(),
            diagnostics: &diagnostics,
        };
        write_report(&report, report_path)
            .with_context(|| format!("writing report {}", report_path.display()))?;
    }

    let stats = &diagnostics.stats;
    let missing_supports = stats.supports.saturating_sub(stats.valid_supports);
    Ok(ConversionSummary {
        output: request.output.clone(),
        features: outcome.collection.counts(),
        missing_log,
        missing_supports,
        diagnostics,
    })
}

/// Load and analyse without writing anything.
pub fn inspect(
    input: &Path,
    voltage: Option<&Path>,
    names: &SchemaNames,
) -> Result<ConversionDiagnostics> {
    let objects = load_objects(input, &names.object_tag)
        .with_context(|| format!("loading network document {}", input.display()))?;

    let mut diagnostics = ConversionDiagnostics::new();
    if let Some(path) = voltage {
        let voltages = load_voltage_table(path, names, &mut diagnostics);
        diagnostics.stats.voltage_classes = voltages.len();
    }
    inspect_objects(&objects, names, &mut diagnostics);
    Ok(diagnostics)
}
