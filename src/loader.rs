use crate::config;
use crate::error::DataFormatError;
use crate::models::{Quote, RawQuoteRow};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Load and type every row of a quote table CSV file
pub fn load_quotes(path: impl AsRef<Path>) -> Result<Vec<Quote>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open quote table: {}", path.display()))?;

    let quotes = read_quotes(file)
        .with_context(|| format!("Failed to load quote table: {}", path.display()))?;

    info!(path = %path.display(), rows = quotes.len(), "Loaded quote table");
    Ok(quotes)
}

/// Read quotes from any CSV source with a header row.
///
/// Stops at the first bad row: a partially typed table is never returned.
/// Row-level failures surface as [`DataFormatError`] inside the returned error.
pub fn read_quotes<R: Read>(reader: R) -> Result<Vec<Quote>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DataFormatError::MalformedRow {
            row: 0,
            reason: format!("unreadable header row: {}", e),
        })?
        .clone();
    check_required_columns(&headers)?;
    debug!(columns = headers.len(), "Header row accepted");

    let mut quotes = Vec::new();
    for (idx, result) in rdr.deserialize::<RawQuoteRow>().enumerate() {
        let row = idx + 1;
        let raw = result.map_err(|e| DataFormatError::MalformedRow {
            row,
            reason: e.to_string(),
        })?;
        quotes.push(Quote::from_raw(row, &raw)?);
    }

    Ok(quotes)
}

/// Every required column must be present; extra columns are ignored
pub fn check_required_columns(headers: &StringRecord) -> Result<(), DataFormatError> {
    for column in config::REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataFormatError::missing_column(*column));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OptionType;

    const HEADER: &str = "underlying_symbol,quote_datetime,expiration,option_type,strike,bid,ask,underlying_ask";

    #[test]
    fn test_read_quotes_ignores_extra_columns() {
        let csv = format!(
            "{}\n^SPX,2023-06-16 09:31:00,2023-06-16,C,4450,1.20,1.35,4420.75\n^SPX,2023-06-16 09:31:00,2023-06-23,P,4400,3.10,3.30,4420.75\n",
            HEADER
        );
        let quotes = read_quotes(csv.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].option_type, OptionType::Call);
        assert_eq!(quotes[1].option_type, OptionType::Put);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "quote_datetime,expiration,option_type,strike,bid,ask\n";
        let err = read_quotes(csv.as_bytes()).unwrap_err();
        let format_err = err.downcast_ref::<DataFormatError>().unwrap();
        assert_eq!(format_err, &DataFormatError::missing_column("underlying_ask"));
    }

    #[test]
    fn test_first_bad_row_aborts_load() {
        let csv = format!(
            "{}\n^SPX,2023-06-16 09:31:00,2023-06-16,C,4450,1.20,1.35,4420.75\n^SPX,2023-06-16 09:31:00,not-a-date,C,4455,1.00,1.10,4420.75\n",
            HEADER
        );
        let err = read_quotes(csv.as_bytes()).unwrap_err();
        let format_err = err.downcast_ref::<DataFormatError>().unwrap();
        assert_eq!(format_err.row(), Some(2));
        assert!(format_err.to_string().contains("expiration"));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let csv = format!("{}\n^SPX,2023-06-16 09:31:00,2023-06-16,C\n", HEADER);
        let err = read_quotes(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataFormatError>(),
            Some(DataFormatError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_non_utf8_header_is_malformed_row_zero() {
        let mut csv = b"quote_datetime,expiration,option_type,strike,bid,ask,underlying_\xffask\n".to_vec();
        csv.extend_from_slice(b"2023-06-16 09:31:00,2023-06-16,C,4450,1.20,1.35,4420.75\n");
        let err = read_quotes(csv.as_slice()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataFormatError>(),
            Some(DataFormatError::MalformedRow { row: 0, .. })
        ));
    }

    #[test]
    fn test_oversized_mid_bid_fails_load_instead_of_scan() {
        let csv = format!(
            "{}\n^SPX,2023-06-16 09:31:00,2023-06-16,C,4450,1.20,1.35,4420.75\n^SPX,2023-06-16 09:31:00,2023-06-16,C,4455,79228162514264337593543950335,1.10,4420.75\n^SPX,2023-06-16 09:31:00,2023-06-16,C,4460,0.80,0.90,4420.75\n",
            HEADER
        );
        let err = read_quotes(csv.as_bytes()).unwrap_err();
        match err.downcast_ref::<DataFormatError>() {
            Some(DataFormatError::InvalidField { row, field, .. }) => {
                assert_eq!(*row, 2);
                assert_eq!(*field, "bid");
            }
            other => panic!("expected oversized bid error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let quotes = read_quotes(format!("{}\n", HEADER).as_bytes()).unwrap();
        assert!(quotes.is_empty());
    }
}
