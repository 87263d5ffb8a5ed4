//! Filter, scan and select over one in-memory quote table.
//!
//! Each stage consumes the whole output of the previous one; nothing is kept
//! between runs.

use crate::config::ScanConfig;
use crate::models::{ComboRecord, Quote};
use crate::processor::{self, FilterStats};
use crate::{loader, rules, writer};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Non-fatal empty-result conditions. The run still completes and the
/// output table is written with its header only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanWarning {
    NoEligibleQuotes,
    NoTriplets,
    NoneBelowThreshold,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanWarning::NoEligibleQuotes => write!(f, "No quotes survived the same-day OTM call filter"),
            ScanWarning::NoTriplets => write!(f, "Fewer than three eligible quotes, no triplets formed"),
            ScanWarning::NoneBelowThreshold => write!(f, "No combo value below the threshold"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub stats: FilterStats,
    pub combos: Vec<ComboRecord>,
    pub selected: Vec<ComboRecord>,
    pub warnings: Vec<ScanWarning>,
}

pub fn run_pipeline(quotes: &[Quote], threshold: Decimal) -> ScanOutcome {
    let (eligible, stats) = processor::filter_quotes_with_stats(quotes);
    let combos = processor::scan_combos(eligible);
    let selected = rules::select_combos(&combos, threshold);

    let mut warnings = Vec::new();
    if stats.eligible == 0 {
        warnings.push(ScanWarning::NoEligibleQuotes);
    } else if combos.is_empty() {
        warnings.push(ScanWarning::NoTriplets);
    } else if selected.is_empty() {
        warnings.push(ScanWarning::NoneBelowThreshold);
    }
    for warning in &warnings {
        warn!(%warning, "Empty scan result");
    }

    info!(
        quotes = stats.total,
        eligible = stats.eligible,
        combos = combos.len(),
        selected = selected.len(),
        %threshold,
        "Butterfly scan finished"
    );

    ScanOutcome {
        stats,
        combos,
        selected,
        warnings,
    }
}

/// Load the input table, scan it and write the combo table.
///
/// The output file is only created once loading and scanning have succeeded,
/// so a malformed input never leaves a partial table behind.
pub fn scan_file(cfg: &ScanConfig) -> Result<ScanOutcome> {
    let quotes = loader::load_quotes(&cfg.input_path)?;
    let outcome = run_pipeline(&quotes, cfg.threshold);
    writer::save_combos(&cfg.output_path, &outcome.selected)?;

    if let Some(summary_path) = &cfg.summary_path {
        let report = ScanReport::new(&cfg.input_path, &cfg.output_path, cfg.threshold, &outcome);
        std::fs::write(summary_path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write run summary: {}", summary_path))?;
        info!(path = %summary_path, "Saved run summary");
    }

    Ok(outcome)
}

/// JSON summary of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub input_path: String,
    pub output_path: String,
    pub threshold: Decimal,
    pub filter: FilterStats,
    pub combos_scanned: usize,
    pub combos_selected: usize,
    pub warnings: Vec<ScanWarning>,
    pub generated_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn new(input_path: &str, output_path: &str, threshold: Decimal, outcome: &ScanOutcome) -> Self {
        Self {
            input_path: input_path.to_string(),
            output_path: output_path.to_string(),
            threshold,
            filter: outcome.stats,
            combos_scanned: outcome.combos.len(),
            combos_selected: outcome.selected.len(),
            warnings: outcome.warnings.clone(),
            generated_at: Utc::now(),
        }
    }
}
