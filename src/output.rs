//! Output formatting and persistence for pipeline results.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::merge::{MergedDay, MergedRow};
use crate::analyzers::types::RfmRow;
use crate::report::DashboardReport;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &DashboardReport) {
    debug!("{:#?}", report);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes the merged daily/hourly table, replacing any existing file.
///
/// With `gzip` the CSV is compressed before it is written.
pub fn write_merged(path: &Path, merged: &[MergedDay], gzip: bool) -> Result<()> {
    let rows = merged.iter().map(MergedRow::from);
    write_csv(path, rows, gzip)?;
    info!(path = %path.display(), rows = merged.len(), gzip, "Merged table written");
    Ok(())
}

/// Writes scored RFM rows as CSV, replacing any existing file.
pub fn write_rfm(path: &Path, rows: &[RfmRow]) -> Result<()> {
    write_csv(path, rows.iter(), false)?;
    info!(path = %path.display(), rows = rows.len(), "RFM table written");
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>, gzip: bool) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        serialize_rows(&mut encoder, rows)?;
        encoder.finish()?;
    } else {
        let mut file = file;
        serialize_rows(&mut file, rows)?;
    }

    Ok(())
}

fn serialize_rows<W: Write, T: Serialize>(writer: W, rows: impl Iterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!(dir = %parent.display(), "Ensuring output directory");
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
