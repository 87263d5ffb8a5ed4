use butterfly_scanner::{
    read_quotes,
    run_pipeline,
    scan_file,
    write_combos,
    DataFormatError,
    ScanConfig,
    ScanWarning,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use std::path::Path;

    const HEADER: &str = "underlying_symbol,quote_datetime,root,expiration,strike,option_type,bid,ask,underlying_bid,underlying_ask";

    // Six eligible calls plus rows each filter predicate rejects
    fn sample_table() -> String {
        let rows = [
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,110,C,0.5,0.6,94.9,95.0",
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,100,C,0.9,1.0,94.9,95.0",
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-23,102,C,0.9,1.0,94.9,95.0",
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,125,C,0.2,0.3,94.9,95.0",
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,90,P,0.1,0.2,94.9,95.0",
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,105,C,0.7,0.8,94.9,95.0",
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,115,C,0.4,0.5,94.9,95.0",
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,85,C,10.0,10.2,94.9,95.0",
            "^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,120,C,0.3,0.4,94.9,95.0",
        ];
        format!("{}\n{}\n", HEADER, rows.join("\n"))
    }

    fn config_for(dir: &Path, input: &str) -> ScanConfig {
        let input_path = dir.join("quotes.csv");
        fs::write(&input_path, input).unwrap();
        ScanConfig {
            input_path: input_path.to_string_lossy().into_owned(),
            output_path: dir.join("output.csv").to_string_lossy().into_owned(),
            ..ScanConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_two_butterflies() {
        let quotes = read_quotes(sample_table().as_bytes()).unwrap();
        let outcome = run_pipeline(&quotes, dec!(3.3));

        assert_eq!(outcome.stats.total, 9);
        assert_eq!(outcome.stats.rejected_date, 1);
        assert_eq!(outcome.stats.rejected_type, 1);
        assert_eq!(outcome.stats.rejected_moneyness, 1);
        assert_eq!(outcome.stats.eligible, 6);
        assert_eq!(outcome.combos.len(), 2);
        assert_eq!(outcome.selected.len(), 2);
        assert!(outcome.warnings.is_empty());

        let mut buf = Vec::new();
        write_combos(&mut buf, &outcome.selected).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Low Strike,Mid Strike,High Strike,Combo Value\n100,105,110,0.2\n115,120,125,0.2\n"
        );
    }

    #[test]
    fn test_threshold_at_combo_value_selects_nothing() {
        let quotes = read_quotes(sample_table().as_bytes()).unwrap();
        let outcome = run_pipeline(&quotes, dec!(0.2));
        assert_eq!(outcome.combos.len(), 2);
        assert!(outcome.selected.is_empty());
        assert_eq!(outcome.warnings, vec![ScanWarning::NoneBelowThreshold]);

        let outcome = run_pipeline(&quotes, dec!(0.21));
        assert_eq!(outcome.selected.len(), 2);
    }

    #[test]
    fn test_scan_file_is_byte_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_for(dir.path(), &sample_table());

        scan_file(&cfg).unwrap();
        let first = fs::read(&cfg.output_path).unwrap();
        scan_file(&cfg).unwrap();
        let second = fs::read(&cfg.output_path).unwrap();

        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_no_eligible_rows_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let table = format!(
            "{}\n^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,90,P,0.1,0.2,94.9,95.0\n",
            HEADER
        );
        let cfg = config_for(dir.path(), &table);

        let outcome = scan_file(&cfg).unwrap();
        assert_eq!(outcome.warnings, vec![ScanWarning::NoEligibleQuotes]);
        assert_eq!(
            fs::read_to_string(&cfg.output_path).unwrap(),
            "Low Strike,Mid Strike,High Strike,Combo Value\n"
        );
    }

    #[test]
    fn test_two_eligible_rows_form_no_triplet() {
        let table = format!(
            "{}\n^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,100,C,0.9,1.0,94.9,95.0\n^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,105,C,0.7,0.8,94.9,95.0\n",
            HEADER
        );
        let quotes = read_quotes(table.as_bytes()).unwrap();
        let outcome = run_pipeline(&quotes, dec!(3.3));
        assert!(outcome.combos.is_empty());
        assert_eq!(outcome.warnings, vec![ScanWarning::NoTriplets]);
    }

    #[test]
    fn test_bad_row_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let table = format!(
            "{}\n^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,100,C,0.9,1.0,94.9,95.0\n^SPX,2023-06-16 09:31:00,SPXW,2023-06-16,105,X,0.7,0.8,94.9,95.0\n",
            HEADER
        );
        let cfg = config_for(dir.path(), &table);

        let err = scan_file(&cfg).unwrap_err();
        match err.downcast_ref::<DataFormatError>() {
            Some(DataFormatError::InvalidField { row, field, .. }) => {
                assert_eq!(*row, 2);
                assert_eq!(*field, "option_type");
            }
            other => panic!("expected option_type error, got {:?}", other),
        }
        assert!(!Path::new(&cfg.output_path).exists());
    }

    #[test]
    fn test_summary_report_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_for(dir.path(), &sample_table());
        let summary_path = dir.path().join("summary.json");
        cfg.summary_path = Some(summary_path.to_string_lossy().into_owned());

        scan_file(&cfg).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
        assert_eq!(json["combos_selected"], 2);
        assert_eq!(json["filter"]["eligible"], 6);
        assert_eq!(json["threshold"], "3.3");
    }
}
