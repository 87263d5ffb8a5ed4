use anyhow::Result;
use butterfly_scanner::{config, logging, pipeline, ScanConfig};
use clap::Parser;
use colored::Colorize;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "butterfly-scanner")]
#[command(about = "Scan same-day OTM call quotes for cheap butterfly spreads", long_about = None)]
struct Cli {
    /// Quote table CSV (falls back to BUTTERFLY_INPUT, then "example v2.csv")
    #[arg(short, long)]
    input: Option<String>,

    /// Combo table CSV to write (falls back to BUTTERFLY_OUTPUT, then "output.csv")
    #[arg(short, long)]
    output: Option<String>,

    /// Keep combos with a value strictly below this (falls back to BUTTERFLY_THRESHOLD, then 3.3)
    #[arg(short, long, value_parser = parse_threshold_arg, allow_negative_numbers = true)]
    threshold: Option<Decimal>,

    /// Also write a JSON run summary here
    #[arg(long)]
    summary: Option<String>,

    /// Directory for rotated JSON log files
    #[arg(long)]
    log_dir: Option<String>,

    /// Log to the console only
    #[arg(long)]
    no_log_file: bool,
}

fn parse_threshold_arg(raw: &str) -> Result<Decimal, String> {
    config::parse_threshold(raw).map_err(|e| e.to_string())
}

impl Cli {
    /// Command-line values win over environment variables and defaults
    fn into_config(self) -> Result<ScanConfig> {
        let mut cfg = ScanConfig::from_env()?;
        if let Some(input) = self.input {
            cfg.input_path = input;
        }
        if let Some(output) = self.output {
            cfg.output_path = output;
        }
        if let Some(threshold) = self.threshold {
            cfg.threshold = threshold;
        }
        if self.summary.is_some() {
            cfg.summary_path = self.summary;
        }
        if let Some(log_dir) = self.log_dir {
            cfg.log_dir = log_dir;
        }
        Ok(cfg)
    }
}

fn run(cfg: &ScanConfig) -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Butterfly Spread Scanner".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!("{} Input: {}", "→".cyan(), cfg.input_path.yellow());
    println!("{} Output: {}", "→".cyan(), cfg.output_path.yellow());
    println!("{} Threshold: {}", "→".cyan(), cfg.threshold.to_string().yellow());
    println!();

    let start_time = std::time::Instant::now();
    let outcome = pipeline::scan_file(cfg)?;
    let elapsed = start_time.elapsed();

    println!("{}", "=".repeat(60).blue());
    println!("{}", "Summary".cyan().bold());
    println!("{}", "=".repeat(60).blue());
    println!("{} Quotes loaded: {}", "✓".green(), outcome.stats.total);
    println!("{} Eligible same-day OTM calls: {}", "✓".green(), outcome.stats.eligible);
    println!("{} Triplets scanned: {}", "✓".green(), outcome.combos.len());
    println!("{} Below threshold: {}", "✓".green(), outcome.selected.len());
    for warning in &outcome.warnings {
        println!("{} {}", "⚠".yellow(), warning);
    }
    println!("{} Saved {} rows to {}", "✓".green(), outcome.selected.len(), cfg.output_path);
    if let Some(summary_path) = &cfg.summary_path {
        println!("{} Saved run summary to {}", "✓".green(), summary_path);
    }
    println!("{} Time taken: {:.3}s", "⏱".yellow(), elapsed.as_secs_f64());
    info!(elapsed_ms = elapsed.as_millis() as u64, "Run complete");

    println!();
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Done!".green().bold());
    println!("{}", "=".repeat(60).blue());

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let no_log_file = cli.no_log_file;
    let cfg = cli.into_config()?;
    cfg.validate()?;

    let log_dir = (!no_log_file).then(|| Path::new(&cfg.log_dir));
    logging::init_logging(log_dir)?;

    if let Err(e) = run(&cfg) {
        eprintln!("{} {:#}", "✗".red(), e);
        std::process::exit(1);
    }

    Ok(())
}
