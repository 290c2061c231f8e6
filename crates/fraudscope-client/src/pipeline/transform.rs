use std::collections::BTreeMap;
use std::path::Path;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg64Mcg;
use serde::Serialize;

use crate::config::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_SIZE};
use crate::pipeline::artifact_path;
use crate::store::columns::{self, INDEX_COLUMN_NAMES};
use crate::store::normalize::coerce_label;
use crate::table::RawTable;
use crate::validation::require_passed;
use crate::{ClientError, ClientResult};

pub const CLEANED_FILE: &str = "cleaned.csv";
pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";
const ID_COLUMN: &str = "id";
const MERCHANT_MARKER: &str = "fraud_";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOptions {
    pub test_size: f64,
    pub seed: u64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SPLIT_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitTables {
    pub train: RawTable,
    pub test: RawTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformSummary {
    pub data_path: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_frauds: usize,
    pub test_frauds: usize,
    pub cleaned_path: String,
    pub train_path: String,
    pub test_path: String,
}

/// Validation-gated stage: clean `data_path`, split it, write three CSVs.
pub fn run(
    data_path: &Path,
    root_dir: &Path,
    status_file: &Path,
    options: SplitOptions,
) -> ClientResult<TransformSummary> {
    require_passed(status_file)?;

    log::info!("loading {}", data_path.display());
    let raw = RawTable::read_path(data_path)?;
    log::info!("raw data: {} rows x {} columns", raw.rows.len(), raw.headers.len());

    let source_name = data_path.display().to_string();
    let cleaned = apply_transformations(&source_name, &raw)?;
    log::info!(
        "cleaned data: {} rows x {} columns",
        cleaned.rows.len(),
        cleaned.headers.len()
    );
    let split = stratified_split(&source_name, &cleaned, options)?;

    let cleaned_path = artifact_path(root_dir, CLEANED_FILE);
    let train_path = artifact_path(root_dir, TRAIN_FILE);
    let test_path = artifact_path(root_dir, TEST_FILE);
    for (table, path) in [
        (&cleaned, &cleaned_path),
        (&split.train, &train_path),
        (&split.test, &test_path),
    ] {
        table.write_path(path)?;
        log::info!("saved {}", path.display());
    }

    Ok(TransformSummary {
        data_path: source_name.clone(),
        rows: cleaned.rows.len(),
        columns: cleaned.headers.clone(),
        train_rows: split.train.rows.len(),
        test_rows: split.test.rows.len(),
        train_frauds: count_frauds(&source_name, &split.train)?,
        test_frauds: count_frauds(&source_name, &split.test)?,
        cleaned_path: display(&cleaned_path),
        train_path: display(&train_path),
        test_path: display(&test_path),
    })
}

/// Renames the unnamed index column to `id`, strips the `fraud_` marker from
/// merchant names, and replaces the combined timestamp with trailing
/// `trans_date` and `trans_time` columns.
pub fn apply_transformations(source_name: &str, table: &RawTable) -> ClientResult<RawTable> {
    let mut headers = table.headers.clone();
    if let Some(position) = headers
        .iter()
        .position(|header| INDEX_COLUMN_NAMES.contains(&header.as_str()))
    {
        headers[position] = ID_COLUMN.to_string();
    }

    let merchant_index = table.column_index(columns::MERCHANT);
    let Some(timestamp_index) = table.column_index(columns::TIMESTAMP) else {
        return Err(ClientError::schema_error(
            source_name,
            columns::TIMESTAMP,
            "the column is required to derive `trans_date` and `trans_time`",
        ));
    };

    headers.remove(timestamp_index);
    let kept_width = headers.len();
    headers.push(columns::SPLIT_DATE.to_string());
    headers.push(columns::SPLIT_TIME.to_string());

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let stamp = RawTable::cell(row, Some(timestamp_index)).unwrap_or_default();
            let (date, time) = stamp.split_once(' ').unwrap_or((stamp, ""));

            let mut cells = row
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    if Some(index) == merchant_index {
                        value.replace(MERCHANT_MARKER, "")
                    } else {
                        value.clone()
                    }
                })
                .collect::<Vec<String>>();
            if timestamp_index < cells.len() {
                cells.remove(timestamp_index);
            }
            cells.resize(kept_width, String::new());
            cells.push(date.to_string());
            cells.push(time.to_string());
            cells
        })
        .collect();

    Ok(RawTable { headers, rows })
}

/// Deterministic split that keeps the fraud ratio in both partitions.
///
/// The test partition holds `ceil(test_size * rows)` rows, shared between the
/// label strata by largest remainder. Rows keep source order in each output.
pub fn stratified_split(
    source_name: &str,
    table: &RawTable,
    options: SplitOptions,
) -> ClientResult<SplitTables> {
    let labels = row_labels(source_name, table)?;
    let mut strata: BTreeMap<bool, Vec<usize>> = BTreeMap::new();
    for (row, label) in labels.iter().enumerate() {
        strata.entry(*label).or_default().push(row);
    }

    let sizes = strata.values().map(Vec::len).collect::<Vec<usize>>();
    let test_counts = allocate_test_counts(&sizes, options.test_size);

    let mut rng = Pcg64Mcg::seed_from_u64(options.seed);
    let mut in_test = vec![false; table.rows.len()];
    for (members, test_count) in strata.values_mut().zip(test_counts) {
        members.shuffle(&mut rng);
        for row in members.iter().take(test_count) {
            in_test[*row] = true;
        }
    }

    let mut train = RawTable {
        headers: table.headers.clone(),
        rows: Vec::new(),
    };
    let mut test = train.clone();
    for (row, cells) in table.rows.iter().enumerate() {
        if in_test[row] {
            test.rows.push(cells.clone());
        } else {
            train.rows.push(cells.clone());
        }
    }

    log::info!(
        "split {} rows into {} train / {} test",
        table.rows.len(),
        train.rows.len(),
        test.rows.len()
    );
    Ok(SplitTables { train, test })
}

fn allocate_test_counts(sizes: &[usize], test_size: f64) -> Vec<usize> {
    let total = sizes.iter().sum::<usize>();
    if total == 0 {
        return vec![0; sizes.len()];
    }
    let target = ((total as f64 * test_size).ceil() as usize).min(total);

    let mut counts = Vec::with_capacity(sizes.len());
    let mut remainders = Vec::with_capacity(sizes.len());
    for (index, size) in sizes.iter().enumerate() {
        let exact = target as f64 * *size as f64 / total as f64;
        counts.push(exact.floor() as usize);
        remainders.push((index, exact - exact.floor()));
    }

    remainders.sort_by(|left, right| right.1.total_cmp(&left.1));
    let mut leftover = target.saturating_sub(counts.iter().sum::<usize>());
    for (index, _) in remainders {
        if leftover == 0 {
            break;
        }
        if counts[index] < sizes[index] {
            counts[index] += 1;
            leftover -= 1;
        }
    }
    counts
}

fn row_labels(source_name: &str, table: &RawTable) -> ClientResult<Vec<bool>> {
    let Some(label_index) = table.column_index(columns::LABEL) else {
        return Err(ClientError::schema_error(
            source_name,
            columns::LABEL,
            "the column is required to stratify the split",
        ));
    };

    table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let raw = RawTable::cell(cells, Some(label_index)).unwrap_or_default();
            coerce_label(raw).ok_or_else(|| ClientError::invalid_label(source_name, row + 1, raw))
        })
        .collect()
}

fn count_frauds(source_name: &str, table: &RawTable) -> ClientResult<usize> {
    Ok(row_labels(source_name, table)?
        .into_iter()
        .filter(|label| *label)
        .count())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::{SplitOptions, allocate_test_counts, apply_transformations, stratified_split};
    use crate::table::RawTable;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn labelled_table(labels: &[u8]) -> RawTable {
        RawTable {
            headers: strings(&["id", "is_fraud"]),
            rows: labels
                .iter()
                .enumerate()
                .map(|(row, label)| vec![row.to_string(), label.to_string()])
                .collect(),
        }
    }

    #[test]
    fn cleans_index_merchant_and_timestamp() {
        let table = RawTable {
            headers: strings(&["Unnamed: 0", "trans_date_trans_time", "merchant", "is_fraud"]),
            rows: vec![strings(&["0", "2019-01-01 00:00:18", "fraud_Rippin, Kub and Mann", "0"])],
        };
        let cleaned = apply_transformations("train.csv", &table);
        assert!(cleaned.is_ok());
        if let Ok(cleaned) = cleaned {
            assert_eq!(
                cleaned.headers,
                strings(&["id", "merchant", "is_fraud", "trans_date", "trans_time"])
            );
            assert_eq!(
                cleaned.rows[0],
                strings(&["0", "Rippin, Kub and Mann", "0", "2019-01-01", "00:00:18"])
            );
        }
    }

    #[test]
    fn missing_timestamp_column_is_a_schema_error() {
        let table = labelled_table(&[0, 1]);
        let cleaned = apply_transformations("train.csv", &table);
        assert!(cleaned.is_err());
        if let Err(error) = cleaned {
            assert_eq!(error.code, "schema_error");
        }
    }

    #[test]
    fn allocation_follows_largest_remainder() {
        assert_eq!(allocate_test_counts(&[15, 5], 0.2), vec![3, 1]);
        assert_eq!(allocate_test_counts(&[8, 2], 0.2), vec![2, 0]);
        assert_eq!(allocate_test_counts(&[], 0.2), Vec::<usize>::new());
    }

    #[test]
    fn split_is_stratified_ordered_and_seeded() {
        let mut labels = vec![0_u8; 15];
        labels.extend([1_u8; 5]);
        let table = labelled_table(&labels);

        let first = stratified_split("train.csv", &table, SplitOptions::default());
        let second = stratified_split("train.csv", &table, SplitOptions::default());
        assert!(first.is_ok());
        if let (Ok(first), Ok(second)) = (first, second) {
            assert_eq!(first, second);
            assert_eq!(first.train.rows.len(), 16);
            assert_eq!(first.test.rows.len(), 4);
            let test_frauds = first
                .test
                .rows
                .iter()
                .filter(|row| row[1] == "1")
                .count();
            assert_eq!(test_frauds, 1);

            let ids = first
                .train
                .rows
                .iter()
                .filter_map(|row| row[0].parse::<usize>().ok())
                .collect::<Vec<usize>>();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            assert_eq!(ids, sorted);
        }
    }

    #[test]
    fn unusable_label_names_the_row() {
        let mut table = labelled_table(&[0, 1]);
        table.rows[1][1] = "maybe".to_string();
        let split = stratified_split("train.csv", &table, SplitOptions::default());
        assert!(split.is_err());
        if let Err(error) = split {
            assert_eq!(error.code, "schema_error");
            assert!(error.message.contains("row 2"));
        }
    }
}
