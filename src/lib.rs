pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod processor;
pub mod rules;
pub mod writer;

// Re-exports (public API)
pub use config::{ScanConfig, DEFAULT_THRESHOLD};
pub use error::DataFormatError;
pub use loader::{load_quotes, read_quotes};
pub use models::{ComboRecord, EligibleQuote, OptionType, Quote, RawQuoteRow};
pub use pipeline::{run_pipeline, scan_file, ScanOutcome, ScanReport, ScanWarning};
pub use processor::{
    combo_value,
    filter_quotes,
    filter_quotes_with_stats,
    is_call,
    is_eligible,
    is_out_of_the_money,
    is_same_day,
    scan_combos,
    sort_by_strike,
    FilterStats,
};
pub use rules::{is_below_threshold, select_combos};
pub use writer::{save_combos, write_combos};
