//! Adapts transaction records from files into [`Transaction`] values.
//!
//! Whatever upstream parser produced the records, they arrive here as JSON
//! arrays or CSV tables with `date`, `amount` and `description` fields. Bad
//! or missing values degrade to "no date", `0` and `""` rather than errors.

use std::path::Path;

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CashflowError, Result};
use crate::models::{MonthlySummary, Transaction};

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// `YYYY-MM-DD` first, then `MM/DD/YYYY`. The year must have four digits.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let four_digit_year = |year: Option<&str>| year.is_some_and(|y| y.len() == 4);
    if four_digit_year(raw.split('-').next()) {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
    }
    if four_digit_year(raw.rsplit('/').next()) {
        return NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok();
    }
    None
}

/// Lenient money parsing: strips `$`, commas and quotes; `(12.50)` is negative.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '"' | '$'))
        .collect();
    let cleaned = cleaned.trim();
    let value = match cleaned.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => -inner.trim().parse::<f64>().unwrap_or(0.0),
        None => cleaned.parse().unwrap_or(0.0),
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// Any JSON value is accepted; shapes that are neither number nor string
// land in `Other` and read as "missing".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AmountField {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl AmountField {
    fn value(&self) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => *n,
            Self::Number(_) | Self::Other(_) => 0.0,
            Self::Text(s) => parse_amount(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DateField {
    Text(String),
    Other(IgnoredAny),
}

impl DateField {
    fn value(&self) -> Option<NaiveDate> {
        match self {
            Self::Text(s) => parse_date(s),
            Self::Other(_) => None,
        }
    }
}

/// A record as handed over by the upstream parser, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    date: Option<DateField>,
    #[serde(default)]
    amount: Option<AmountField>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RawTransaction {
    pub fn new(date: Option<&str>, amount: Option<f64>, description: Option<&str>) -> Self {
        Self {
            date: date.map(|d| DateField::Text(d.to_string())),
            amount: amount.map(AmountField::Number),
            description: description.map(str::to_string),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date.as_ref().and_then(DateField::value)
    }

    pub fn amount(&self) -> f64 {
        self.amount.as_ref().map_or(0.0, AmountField::value)
    }
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        Transaction {
            date: raw.date(),
            amount: raw.amount(),
            description: raw.description.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

enum InputFormat {
    Json,
    Csv,
}

fn detect_format(path: &Path) -> Result<InputFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "json" => Ok(InputFormat::Json),
        "csv" => Ok(InputFormat::Csv),
        _ => Err(CashflowError::UnknownFormat(path.display().to_string())),
    }
}

pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let raw = match detect_format(path)? {
        InputFormat::Json => read_json_records(path)?,
        InputFormat::Csv => read_csv_records(path)?,
    };
    let txns: Vec<Transaction> = raw.into_iter().map(Transaction::from).collect();
    let undated = txns.iter().filter(|t| t.date.is_none()).count();
    debug!(path = %path.display(), records = txns.len(), undated, "read transaction file");
    Ok(txns)
}

fn read_json_records(path: &Path) -> Result<Vec<RawTransaction>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Column positions are looked up by header name, case-insensitively, so
/// extra columns and any ordering are fine.
fn read_csv_records(path: &Path) -> Result<Vec<RawTransaction>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(std::io::BufReader::new(file));

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (date_col, amount_col, desc_col) = (column("date"), column("amount"), column("description"));

    let field = |record: &csv::StringRecord, col: Option<usize>| {
        col.and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(RawTransaction {
            date: field(&record, date_col).map(DateField::Text),
            amount: field(&record, amount_col).map(AmountField::Text),
            description: field(&record, desc_col),
        });
    }
    Ok(rows)
}

/// Manually entered statement months, as a JSON array.
pub fn load_monthly_summaries(path: &Path) -> Result<Vec<MonthlySummary>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
