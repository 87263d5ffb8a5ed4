use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use std::str::FromStr;

// -----------------------------------------------
// FILE PATHS
// -----------------------------------------------
pub const DEFAULT_INPUT_PATH: &str = "example v2.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "output.csv";
pub const DEFAULT_LOG_DIR: &str = "./logs";
pub const LOG_FILE_NAME: &str = "butterfly-scanner.log";

// -----------------------------------------------
// COMBO SELECTION
// -----------------------------------------------
/// 3.3
pub const DEFAULT_THRESHOLD: Decimal = Decimal::from_parts(33, 0, 0, false, 1);

// -----------------------------------------------
// INPUT TABLE SCHEMA
// -----------------------------------------------
pub const COL_QUOTE_DATETIME: &str = "quote_datetime";
pub const COL_EXPIRATION: &str = "expiration";
pub const COL_OPTION_TYPE: &str = "option_type";
pub const COL_STRIKE: &str = "strike";
pub const COL_BID: &str = "bid";
pub const COL_ASK: &str = "ask";
pub const COL_UNDERLYING_ASK: &str = "underlying_ask";

pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_QUOTE_DATETIME,
    COL_EXPIRATION,
    COL_OPTION_TYPE,
    COL_STRIKE,
    COL_BID,
    COL_ASK,
    COL_UNDERLYING_ASK,
];

// -----------------------------------------------
// OUTPUT TABLE SCHEMA
// -----------------------------------------------
pub const OUTPUT_HEADER: [&str; 4] = ["Low Strike", "Mid Strike", "High Strike", "Combo Value"];

// -----------------------------------------------
// ENVIRONMENT VARIABLES
// -----------------------------------------------
pub const ENV_INPUT: &str = "BUTTERFLY_INPUT";
pub const ENV_OUTPUT: &str = "BUTTERFLY_OUTPUT";
pub const ENV_THRESHOLD: &str = "BUTTERFLY_THRESHOLD";
pub const ENV_SUMMARY: &str = "BUTTERFLY_SUMMARY";
pub const ENV_LOG_DIR: &str = "BUTTERFLY_LOG_DIR";

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Get the quote table path from environment or default
pub fn get_input_path() -> String {
    std::env::var(ENV_INPUT).unwrap_or_else(|_| DEFAULT_INPUT_PATH.to_string())
}

/// Get the combo table path from environment or default
pub fn get_output_path() -> String {
    std::env::var(ENV_OUTPUT).unwrap_or_else(|_| DEFAULT_OUTPUT_PATH.to_string())
}

/// Get the selection threshold from environment or default.
/// A value that is set but unparseable is an error, not a silent fallback.
pub fn get_threshold() -> Result<Decimal> {
    match std::env::var(ENV_THRESHOLD) {
        Ok(raw) => parse_threshold(&raw),
        Err(_) => Ok(DEFAULT_THRESHOLD),
    }
}

/// Optional path for the JSON run summary
pub fn get_summary_path() -> Option<String> {
    std::env::var(ENV_SUMMARY).ok().filter(|p| !p.trim().is_empty())
}

/// Get the log directory from environment or default
pub fn get_log_dir() -> String {
    std::env::var(ENV_LOG_DIR).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string())
}

pub fn parse_threshold(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim())
        .with_context(|| format!("Invalid threshold '{}': expected a decimal number", raw))
}

/// Resolved settings for one scan run
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub input_path: String,
    pub output_path: String,
    pub threshold: Decimal,
    pub summary_path: Option<String>,
    pub log_dir: String,
}

impl ScanConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            input_path: get_input_path(),
            output_path: get_output_path(),
            threshold: get_threshold()?,
            summary_path: get_summary_path(),
            log_dir: get_log_dir(),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.input_path.trim().is_empty() {
            bail!("Input path must not be empty");
        }
        if self.output_path.trim().is_empty() {
            bail!("Output path must not be empty");
        }
        if self.input_path == self.output_path {
            bail!("Output path '{}' would overwrite the input table", self.output_path);
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_INPUT_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            threshold: DEFAULT_THRESHOLD,
            summary_path: None,
            log_dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}
