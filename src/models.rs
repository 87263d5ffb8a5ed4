use crate::config;
use crate::error::DataFormatError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Call => "C",
            Self::Put => "P",
        }
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "C" | "CALL" => Ok(Self::Call),
            "P" | "PUT" => Ok(Self::Put),
            other => Err(format!("unrecognized option type code '{}'", other)),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// One row of the quote table exactly as read, before any typing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuoteRow {
    pub quote_datetime: String,
    pub expiration: String,
    pub option_type: String,
    pub strike: String,
    pub bid: String,
    pub ask: String,
    pub underlying_ask: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub quote_timestamp: NaiveDateTime,
    pub expiration: NaiveDateTime,
    pub option_type: OptionType,
    pub strike: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub underlying_ask: Decimal,
}

impl Quote {
    /// Convert a raw row into a typed quote. `row` is the 1-based data row
    /// number used in error messages.
    pub fn from_raw(row: usize, raw: &RawQuoteRow) -> Result<Self, DataFormatError> {
        let quote_timestamp = parse_datetime(&raw.quote_datetime)
            .map_err(|reason| DataFormatError::invalid_field(row, config::COL_QUOTE_DATETIME, &raw.quote_datetime, reason))?;
        let expiration = parse_datetime(&raw.expiration)
            .map_err(|reason| DataFormatError::invalid_field(row, config::COL_EXPIRATION, &raw.expiration, reason))?;
        let option_type = OptionType::from_str(&raw.option_type)
            .map_err(|reason| DataFormatError::invalid_field(row, config::COL_OPTION_TYPE, &raw.option_type, reason))?;

        let strike = parse_decimal(row, config::COL_STRIKE, &raw.strike)?;
        let bid = parse_price(row, config::COL_BID, &raw.bid)?;
        let ask = parse_price(row, config::COL_ASK, &raw.ask)?;
        let underlying_ask = parse_decimal(row, config::COL_UNDERLYING_ASK, &raw.underlying_ask)?;

        Ok(Self {
            quote_timestamp,
            expiration,
            option_type,
            strike,
            bid,
            ask,
            underlying_ask,
        })
    }

    pub fn quote_date(&self) -> NaiveDate {
        self.quote_timestamp.date()
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration.date()
    }
}

/// Read-only view of a quote that passed every eligibility predicate.
/// `position` is the quote's index in the filter input and breaks strike ties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EligibleQuote<'a> {
    quote: &'a Quote,
    position: usize,
}

impl<'a> EligibleQuote<'a> {
    pub(crate) fn new(quote: &'a Quote, position: usize) -> Self {
        Self { quote, position }
    }

    pub fn quote(&self) -> &'a Quote {
        self.quote
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn strike(&self) -> Decimal {
        self.quote.strike
    }

    pub fn bid(&self) -> Decimal {
        self.quote.bid
    }

    pub fn ask(&self) -> Decimal {
        self.quote.ask
    }
}

/// One butterfly triplet and its net price proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboRecord {
    #[serde(rename = "Low Strike")]
    pub low_strike: Decimal,

    #[serde(rename = "Mid Strike")]
    pub mid_strike: Decimal,

    #[serde(rename = "High Strike")]
    pub high_strike: Decimal,

    #[serde(rename = "Combo Value")]
    pub combo_value: Decimal,
}

// Offset-naive layouts first; the source table carries no zone.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a quote table date-time. A trailing UTC offset is accepted but only
/// the wall-clock reading is kept, so both columns stay on the same clock.
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Err("empty value".to_string());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt.naive_local());
    }

    Err("unrecognized date-time format".to_string())
}

fn parse_decimal(row: usize, field: &'static str, raw: &str) -> Result<Decimal, DataFormatError> {
    let s = raw.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| DataFormatError::invalid_field(row, field, raw, e.to_string()))
}

/// Largest bid or ask accepted. Combo values add two asks and subtract two
/// bids, which stays inside `Decimal` range only below a quarter of `MAX`.
pub fn max_price() -> Decimal {
    Decimal::MAX / Decimal::from(4)
}

fn parse_price(row: usize, field: &'static str, raw: &str) -> Result<Decimal, DataFormatError> {
    let value = parse_decimal(row, field, raw)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DataFormatError::invalid_field(row, field, raw, "price must not be negative"));
    }
    if value > max_price() {
        return Err(DataFormatError::invalid_field(row, field, raw, "price too large to price a combo"));
    }
    Ok(value)
}
