use crate::models::{ComboRecord, EligibleQuote, OptionType, Quote};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-predicate rejection counts for one filter pass. A row is counted
/// against the first predicate it fails (date, then type, then moneyness).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub total: usize,
    pub rejected_date: usize,
    pub rejected_type: usize,
    pub rejected_moneyness: usize,
    pub eligible: usize,
}

/// Quote date and expiration fall on the same calendar day
pub fn is_same_day(quote: &Quote) -> bool {
    quote.quote_date() == quote.expiration_date()
}

pub fn is_call(quote: &Quote) -> bool {
    quote.option_type == OptionType::Call
}

/// Call strike above the underlying ask
pub fn is_out_of_the_money(quote: &Quote) -> bool {
    quote.strike > quote.underlying_ask
}

pub fn is_eligible(quote: &Quote) -> bool {
    is_same_day(quote) && is_call(quote) && is_out_of_the_money(quote)
}

/// Keep same-day, out-of-the-money calls in their input order
pub fn filter_quotes(quotes: &[Quote]) -> Vec<EligibleQuote<'_>> {
    filter_quotes_with_stats(quotes).0
}

pub fn filter_quotes_with_stats(quotes: &[Quote]) -> (Vec<EligibleQuote<'_>>, FilterStats) {
    let mut stats = FilterStats {
        total: quotes.len(),
        ..FilterStats::default()
    };

    let eligible: Vec<EligibleQuote<'_>> = quotes
        .iter()
        .enumerate()
        .filter(|(_, quote)| {
            if !is_same_day(quote) {
                stats.rejected_date += 1;
                false
            } else if !is_call(quote) {
                stats.rejected_type += 1;
                false
            } else if !is_out_of_the_money(quote) {
                stats.rejected_moneyness += 1;
                false
            } else {
                true
            }
        })
        .map(|(position, quote)| EligibleQuote::new(quote, position))
        .collect();

    stats.eligible = eligible.len();
    debug!(
        total = stats.total,
        rejected_date = stats.rejected_date,
        rejected_type = stats.rejected_type,
        rejected_moneyness = stats.rejected_moneyness,
        eligible = stats.eligible,
        "Quote filter finished"
    );

    (eligible, stats)
}

/// Sort ascending by strike; equal strikes keep input order
pub fn sort_by_strike(quotes: &mut [EligibleQuote<'_>]) {
    quotes.sort_by(|a, b| {
        a.strike()
            .cmp(&b.strike())
            .then_with(|| a.position().cmp(&b.position()))
    });
}

/// Long call butterfly cost: buy the wings at ask, sell two bodies at bid
pub fn combo_value(low: &EligibleQuote<'_>, mid: &EligibleQuote<'_>, high: &EligibleQuote<'_>) -> Decimal {
    low.ask() - Decimal::TWO * mid.bid() + high.ask()
}

/// Build one combo per consecutive, non-overlapping strike triplet.
/// Up to two trailing quotes that cannot complete a triplet are dropped.
pub fn scan_combos(mut quotes: Vec<EligibleQuote<'_>>) -> Vec<ComboRecord> {
    sort_by_strike(&mut quotes);

    let dropped = quotes.len() % 3;
    if dropped > 0 {
        debug!(dropped, "Trailing quotes do not complete a triplet");
    }

    quotes
        .par_chunks_exact(3)
        .map(|triplet| {
            let (low, mid, high) = (&triplet[0], &triplet[1], &triplet[2]);
            ComboRecord {
                low_strike: low.strike(),
                mid_strike: mid.strike(),
                high_strike: high.strike(),
                combo_value: combo_value(low, mid, high),
            }
        })
        .collect()
}
