use crate::config;
use crate::models::ComboRecord;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Write the combo table to a CSV file, replacing any existing file.
///
/// Rows go to a temporary file next to `path` that is renamed over it only
/// after a successful flush, so a failed write leaves the old file intact.
pub fn save_combos(path: impl AsRef<Path>, records: &[ComboRecord]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in: {}", dir.display()))?;

    write_combos(&mut tmp, records)
        .with_context(|| format!("Failed to write combo table: {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace combo table: {}", path.display()))?;

    info!(path = %path.display(), rows = records.len(), "Saved combo table");
    Ok(())
}

/// Header row first (even with no records), then one row per combo, no index column
pub fn write_combos<W: Write>(writer: W, records: &[ComboRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(config::OUTPUT_HEADER)?;
    for record in records {
        wtr.write_record(&[
            record.low_strike.to_string(),
            record.mid_strike.to_string(),
            record.high_strike.to_string(),
            record.combo_value.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
