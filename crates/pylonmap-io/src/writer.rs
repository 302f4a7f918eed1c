//! Output writers with atomic commit.
//!
//! Every file is serialized into a temporary file next to its destination and
//! renamed into place only once the bytes are complete, so a failed run leaves
//! any previous output untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pylonmap_core::{ConversionDiagnostics, FeatureCollection, MissingCoordinates};
use serde::Serialize;
use tempfile::Builder;
use tracing::info;

/// Default companion path for the missing-coordinate log: `out.geojson` → `out.missing.txt`.
pub fn default_missing_log_path(output: &Path) -> PathBuf {
    output.with_extension("missing.txt")
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The result carries the permissions of the file it replaces, or those a
/// plain `fs::write` would create (0666 masked by the umask on Unix).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .with_context(|| format!("creating output directory {}", parent.display()))?;

    let mut builder = Builder::new();
    builder.prefix(".pylonmap");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder
        .tempfile_in(&parent)
        .with_context(|| format!("creating temporary file in {}", parent.display()))?;
    if let Ok(existing) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("copying permissions of {}", path.display()))?;
    }
    temp.write_all(bytes)
        .with_context(|| format!("writing temporary file for {}", path.display()))?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("atomic rename into {}", path.display()))?;
    Ok(())
}

/// Serialize a feature collection as pretty, UTF-8 GeoJSON.
pub fn write_collection(collection: &FeatureCollection, path: &Path) -> Result<()> {
    let json =
        serde_json::to_vec_pretty(collection).context("serializing feature collection to JSON")?;
    write_atomic(path, &json)?;
    info!(
        "Wrote {} features to {}",
        collection.len(),
        path.display()
    );
    Ok(())
}

/// One `<name>\t<ref>` line per rejected support.
pub fn write_missing_log(missing: &[MissingCoordinates], path: &Path) -> Result<()> {
    let mut text = String::new();
    for entry in missing {
        text.push_str(&entry.log_line());
        text.push('\n');
    }
    write_atomic(path, text.as_bytes())?;
    info!(
        "Listed {} supports without coordinates in {}",
        missing.len(),
        path.display()
    );
    Ok(())
}

/// Run report: paths, options and the collected diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub pylonmap_version: &'static str,
    pub input: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<&'a Path>,
    pub output: &'a Path,
    pub property_schema: &'static str,
    pub diagnostics: &'a ConversionDiagnostics,
}

pub fn write_report(report: &ConversionReport<'_>, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(report).context("serializing conversion report")?;
    write_atomic(path, &json)?;
    info!("Wrote conversion report to {}", path.display());
    Ok(())
}
