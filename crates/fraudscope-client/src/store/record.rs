use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Both halves must be present; a lone latitude or longitude is no point.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

/// Cells of the source row a record came from, with that source's header.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub headers: Arc<[String]>,
    pub cells: Vec<String>,
}

impl SourceRow {
    /// Original text of `column`; `None` when the source has no such column
    /// or the row is short.
    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.headers.iter().position(|header| header == column)?;
        self.cells.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub amount: f64,
    /// Set when `amount` was blank, unparseable, or negative and became 0.
    pub amount_coerced: bool,
    pub is_fraud: bool,
    pub merchant: Option<String>,
    pub category: Option<String>,
    pub region_code: Option<String>,
    pub city: Option<String>,
    pub customer_location: Option<GeoPoint>,
    pub merchant_location: Option<GeoPoint>,
    pub card_number: Option<String>,
    pub transaction_id: Option<String>,
    /// Absent for records built in memory rather than loaded from CSV.
    pub source_row: Option<SourceRow>,
}

impl TransactionRecord {
    pub fn label(&self) -> u8 {
        u8::from(self.is_fraud)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|value| value.date())
    }
}
