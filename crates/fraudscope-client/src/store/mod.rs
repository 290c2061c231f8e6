pub mod bounds;
pub mod columns;
pub(crate) mod normalize;
pub mod record;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use bounds::{BoundsOptions, StoreBounds};
pub use record::{GeoPoint, SourceRow, TransactionRecord};

use crate::table::RawTable;
use crate::{ClientError, ClientResult};

/// What to do when one of several sources cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePolicy {
    #[default]
    RequireAll,
    AllowPartial,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadWarning {
    pub code: String,
    pub message: String,
    pub source: Option<String>,
    pub columns: Vec<String>,
}

impl LoadWarning {
    fn configuration_mismatch(source: &str, missing: Vec<String>) -> Self {
        Self {
            code: "configuration_mismatch".to_string(),
            message: format!(
                "Source `{source}` is missing {} expected column(s); loading continues without them.",
                missing.len()
            ),
            source: Some(source.to_string()),
            columns: missing,
        }
    }

    fn source_unavailable(error: &ClientError) -> Self {
        let source = error
            .data
            .as_ref()
            .and_then(|data| data.get("source"))
            .and_then(|value| value.as_str())
            .map(str::to_string);
        Self {
            code: "source_unavailable".to_string(),
            message: error.message.clone(),
            source,
            columns: Vec::new(),
        }
    }

    fn empty_result() -> Self {
        Self {
            code: "empty_result".to_string(),
            message: "No transactions were loaded from the configured sources.".to_string(),
            source: None,
            columns: Vec::new(),
        }
    }
}

/// Normalized, read-only transaction table.
///
/// Nothing mutates a store after `load`, so one instance can be shared across
/// sessions (for example behind an `Arc`) without synchronization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<TransactionRecord>,
    columns: Vec<String>,
}

impl RecordStore {
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        let columns = source_columns(&records);
        Self { records, columns }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Union of the loaded sources' headers in first-seen order; empty when
    /// no record carries a source row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, index: usize) -> Option<&TransactionRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn bounds(&self, options: BoundsOptions) -> StoreBounds {
        bounds::compute(self, options)
    }
}

fn source_columns(records: &[TransactionRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    let mut last_headers: Option<&Arc<[String]>> = None;
    for row in records.iter().filter_map(|record| record.source_row.as_ref()) {
        // Rows of one source share a header allocation.
        if last_headers.is_some_and(|seen| Arc::ptr_eq(seen, &row.headers)) {
            continue;
        }
        for header in row.headers.iter() {
            if !columns.contains(header) {
                columns.push(header.clone());
            }
        }
        last_headers = Some(&row.headers);
    }
    columns
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub store: RecordStore,
    pub warnings: Vec<LoadWarning>,
}

impl LoadOutcome {
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

pub fn load(sources: &[PathBuf], policy: SourcePolicy) -> ClientResult<LoadOutcome> {
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for path in sources {
        let source_name = path.display().to_string();
        let table = match RawTable::read_path(path) {
            Ok(table) => table,
            Err(error) if policy == SourcePolicy::AllowPartial => {
                log::warn!("skipping source {source_name}: {}", error.message);
                warnings.push(LoadWarning::source_unavailable(&error));
                continue;
            }
            Err(error) => return Err(error),
        };

        let normalized = normalize_table(&source_name, &table)?;
        log::info!(
            "loaded {} transactions from {source_name}",
            normalized.records.len()
        );
        records.extend(normalized.records);
        warnings.extend(normalized.warning);
    }

    if records.is_empty() {
        log::warn!("record store is empty after loading {} source(s)", sources.len());
        warnings.push(LoadWarning::empty_result());
    }

    Ok(LoadOutcome {
        store: RecordStore::from_records(records),
        warnings,
    })
}

#[derive(Debug, Clone)]
pub struct NormalizedSource {
    pub records: Vec<TransactionRecord>,
    pub warning: Option<LoadWarning>,
}

/// Normalizes one source on its own so bad cells never leak into another source.
pub fn normalize_table(source_name: &str, table: &RawTable) -> ClientResult<NormalizedSource> {
    let Some(label_index) = table.column_index(columns::LABEL) else {
        return Err(ClientError::schema_error(
            source_name,
            columns::LABEL,
            "every aggregation depends on the fraud label",
        ));
    };

    let warning = missing_expected_columns(table).map(|missing| {
        log::warn!(
            "source {source_name} is missing expected columns: {}",
            missing.join(", ")
        );
        LoadWarning::configuration_mismatch(source_name, missing)
    });

    let combined_index = table.column_index(columns::TIMESTAMP);
    let split_date_index = table.column_index(columns::SPLIT_DATE);
    let split_time_index = table.column_index(columns::SPLIT_TIME);
    let amount_index = table.column_index(columns::AMOUNT);
    let merchant_index = table.column_index(columns::MERCHANT);
    let category_index = table.column_index(columns::CATEGORY);
    let region_index = table.column_index(columns::REGION);
    let city_index = table.column_index(columns::CITY);
    let lat_index = table.column_index(columns::LAT);
    let long_index = table.column_index(columns::LONG);
    let merch_lat_index = table.column_index(columns::MERCH_LAT);
    let merch_long_index = table.column_index(columns::MERCH_LONG);
    let card_index = table.column_index(columns::CARD_NUMBER);
    let transaction_index = table.column_index(columns::TRANSACTION_ID);

    let headers: Arc<[String]> = table.headers.clone().into();
    let mut records = Vec::with_capacity(table.rows.len());
    for (row_index, row) in table.rows.iter().enumerate() {
        let raw_label = RawTable::cell(row, Some(label_index)).unwrap_or("");
        let Some(is_fraud) = normalize::coerce_label(raw_label) else {
            return Err(ClientError::invalid_label(
                source_name,
                row_index + 1,
                raw_label,
            ));
        };

        let timestamp = if combined_index.is_some() {
            normalize::parse_timestamp(RawTable::cell(row, combined_index))
        } else {
            normalize::parse_split_timestamp(
                RawTable::cell(row, split_date_index),
                RawTable::cell(row, split_time_index),
            )
        };
        let (amount, amount_coerced) =
            normalize::coerce_amount(RawTable::cell(row, amount_index));

        records.push(TransactionRecord {
            timestamp,
            amount,
            amount_coerced,
            is_fraud,
            merchant: normalize::normalize_optional(RawTable::cell(row, merchant_index)),
            category: normalize::normalize_optional(RawTable::cell(row, category_index)),
            region_code: normalize::normalize_optional(RawTable::cell(row, region_index)),
            city: normalize::normalize_optional(RawTable::cell(row, city_index)),
            customer_location: GeoPoint::from_parts(
                normalize::coerce_coordinate(RawTable::cell(row, lat_index)),
                normalize::coerce_coordinate(RawTable::cell(row, long_index)),
            ),
            merchant_location: GeoPoint::from_parts(
                normalize::coerce_coordinate(RawTable::cell(row, merch_lat_index)),
                normalize::coerce_coordinate(RawTable::cell(row, merch_long_index)),
            ),
            card_number: normalize::normalize_optional(RawTable::cell(row, card_index)),
            transaction_id: normalize::normalize_optional(RawTable::cell(
                row,
                transaction_index,
            )),
            source_row: Some(SourceRow {
                headers: Arc::clone(&headers),
                cells: row.clone(),
            }),
        });
    }

    Ok(NormalizedSource { records, warning })
}

fn missing_expected_columns(table: &RawTable) -> Option<Vec<String>> {
    let has_split_timestamp =
        table.has_column(columns::SPLIT_DATE) && table.has_column(columns::SPLIT_TIME);
    let missing = columns::expected_column_names()
        .into_iter()
        .filter(|name| !table.has_column(name))
        .filter(|name| !(*name == columns::TIMESTAMP && has_split_timestamp))
        .map(str::to_string)
        .collect::<Vec<String>>();

    if missing.is_empty() {
        None
    } else {
        Some(missing)
    }
}
