//! CSV export of a filtered view.
//!
//! Loaded records are written back with every column of their source and the
//! original cell text. Output is a pure function of the view, so exporting
//! the same view twice is byte-identical.

use std::fs;
use std::path::Path;

use crate::filter::FilteredView;
use crate::store::columns;
use crate::store::{GeoPoint, TransactionRecord};
use crate::{ClientError, ClientResult};

pub const EXPORT_FILE_NAME: &str = "filtered_fraud_data.csv";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header for stores built in memory, whose records carry no source row.
pub const FALLBACK_HEADER: [&str; 13] = [
    columns::TIMESTAMP,
    columns::CARD_NUMBER,
    columns::MERCHANT,
    columns::CATEGORY,
    columns::AMOUNT,
    columns::CITY,
    columns::REGION,
    columns::LAT,
    columns::LONG,
    columns::MERCH_LAT,
    columns::MERCH_LONG,
    columns::LABEL,
    columns::TRANSACTION_ID,
];

/// The store's source columns, or `FALLBACK_HEADER` when it has none.
pub fn export_columns(view: &FilteredView<'_>) -> Vec<String> {
    let columns = view.store().columns();
    if columns.is_empty() {
        return FALLBACK_HEADER.iter().map(|name| (*name).to_string()).collect();
    }
    columns.to_vec()
}

pub fn to_csv_bytes(view: &FilteredView<'_>) -> ClientResult<Vec<u8>> {
    let header = export_columns(view);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&header)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    for record in view.iter() {
        let row = header
            .iter()
            .map(|column| export_cell(record, column))
            .collect::<Vec<String>>();
        writer
            .write_record(&row)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))
}

pub fn to_csv_string(view: &FilteredView<'_>) -> ClientResult<String> {
    let bytes = to_csv_bytes(view)?;
    String::from_utf8(bytes).map_err(|error| ClientError::internal_serialization(&error.to_string()))
}

/// Writes the view to `path`, creating parent directories; returns the row count.
pub fn write_csv(view: &FilteredView<'_>, path: &Path) -> ClientResult<usize> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|error| ClientError::artifact_write_failed(parent, &error.to_string()))?;
    }
    let bytes = to_csv_bytes(view)?;
    fs::write(path, bytes)
        .map_err(|error| ClientError::artifact_write_failed(path, &error.to_string()))?;
    log::info!("exported {} rows to {}", view.len(), path.display());
    Ok(view.len())
}

/// A column missing from the record's own source is written empty.
fn export_cell(record: &TransactionRecord, column: &str) -> String {
    if let Some(row) = &record.source_row {
        return row.get(column).unwrap_or_default().to_string();
    }

    match column {
        columns::TIMESTAMP => record
            .timestamp
            .map(|value| value.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
        columns::CARD_NUMBER => text(record.card_number.as_deref()),
        columns::MERCHANT => text(record.merchant.as_deref()),
        columns::CATEGORY => text(record.category.as_deref()),
        columns::AMOUNT => record.amount.to_string(),
        columns::CITY => text(record.city.as_deref()),
        columns::REGION => text(record.region_code.as_deref()),
        columns::LAT => coordinate(record.customer_location, |point| point.lat),
        columns::LONG => coordinate(record.customer_location, |point| point.lon),
        columns::MERCH_LAT => coordinate(record.merchant_location, |point| point.lat),
        columns::MERCH_LONG => coordinate(record.merchant_location, |point| point.lon),
        columns::LABEL => record.label().to_string(),
        columns::TRANSACTION_ID => text(record.transaction_id.as_deref()),
        _ => String::new(),
    }
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn coordinate(point: Option<GeoPoint>, part: fn(GeoPoint) -> f64) -> String {
    point.map(|value| part(value).to_string()).unwrap_or_default()
}
