use crate::models::ComboRecord;
use rust_decimal::Decimal;

/// Keep combos strictly below the threshold, in input order
pub fn select_combos(records: &[ComboRecord], threshold: Decimal) -> Vec<ComboRecord> {
    records
        .iter()
        .filter(|record| is_below_threshold(record, threshold))
        .cloned()
        .collect()
}

pub fn is_below_threshold(record: &ComboRecord, threshold: Decimal) -> bool {
    record.combo_value < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: Decimal) -> ComboRecord {
        ComboRecord {
            low_strike: Decimal::from(100),
            mid_strike: Decimal::from(105),
            high_strike: Decimal::from(110),
            combo_value: value,
        }
    }

    #[test]
    fn test_negative_values_are_selected() {
        let records = vec![record(Decimal::new(-15, 1))];
        assert_eq!(select_combos(&records, Decimal::ZERO).len(), 1);
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert!(select_combos(&[], Decimal::ONE).is_empty());
    }
}
