use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use ulid::Ulid;

use crate::pipeline::artifact_path;
use crate::stats::{mean, quantile_sorted, ratio_or_zero, sample_std, sorted_copy};
use crate::store::columns;
use crate::store::normalize::coerce_label;
use crate::table::RawTable;
use crate::{ClientError, ClientResult};

pub const DESCRIBE_FILE: &str = "eda_describe.csv";
pub const MISSING_FILE: &str = "eda_missing.csv";
pub const METRICS_FILE: &str = "eda_metrics.json";

const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMetrics {
    pub rows: usize,
    pub columns: usize,
    pub total_missing_values: usize,
    pub fraud_count: usize,
    pub fraud_percentage: f64,
    pub unique_merchants: usize,
}

/// Summary of one numeric column. `std` needs at least two values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub metrics: DatasetMetrics,
    pub describe: Vec<ColumnDescription>,
    pub missing: Vec<MissingCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRun {
    pub run_id: String,
    pub data_path: String,
    pub run_dir: String,
    pub describe_path: String,
    pub missing_path: String,
    pub metrics_path: String,
    pub profile: DatasetProfile,
}

#[derive(Serialize)]
struct MetricsArtifact<'a> {
    run_id: &'a str,
    data_path: &'a str,
    #[serde(flatten)]
    metrics: &'a DatasetMetrics,
}

/// Profiles `data_path` and writes the three artifacts under `<root_dir>/<run_id>/`.
pub fn run(data_path: &Path, root_dir: &Path) -> ClientResult<StatsRun> {
    let table = RawTable::read_path(data_path)?;
    let source_name = data_path.display().to_string();
    let profile = profile(&source_name, &table)?;

    let run_id = format!("run_{}", Ulid::new());
    let run_dir = root_dir.join(&run_id);
    let describe_path = artifact_path(&run_dir, DESCRIBE_FILE);
    let missing_path = artifact_path(&run_dir, MISSING_FILE);
    let metrics_path = artifact_path(&run_dir, METRICS_FILE);

    describe_table(&profile.describe).write_path(&describe_path)?;
    missing_table(&profile.missing).write_path(&missing_path)?;
    write_metrics(
        &metrics_path,
        &MetricsArtifact {
            run_id: &run_id,
            data_path: &source_name,
            metrics: &profile.metrics,
        },
    )?;
    log::info!(
        "profiled {} rows of {} into {}",
        profile.metrics.rows,
        source_name,
        run_dir.display()
    );

    Ok(StatsRun {
        run_id,
        data_path: source_name,
        run_dir: display(&run_dir),
        describe_path: display(&describe_path),
        missing_path: display(&missing_path),
        metrics_path: display(&metrics_path),
        profile,
    })
}

/// Dataset-level metrics plus per-column description and missing counts.
///
/// A cell is missing when it is blank or absent from a short row. A column
/// is numeric when every non-missing cell parses as a number.
pub fn profile(source_name: &str, table: &RawTable) -> ClientResult<DatasetProfile> {
    let row_count = table.rows.len();
    let mut missing = Vec::with_capacity(table.headers.len());
    let mut describe = Vec::new();

    for (index, header) in table.headers.iter().enumerate() {
        let present = table
            .rows
            .iter()
            .filter_map(|row| RawTable::cell(row, Some(index)))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect::<Vec<&str>>();
        missing.push(MissingCount {
            column: header.clone(),
            missing: row_count - present.len(),
        });
        if let Some(description) = describe_column(header, &present) {
            describe.push(description);
        }
    }

    let fraud_count = count_frauds(source_name, table)?;
    let unique_merchants = match table.column_index(columns::MERCHANT) {
        Some(index) => table
            .rows
            .iter()
            .filter_map(|row| RawTable::cell(row, Some(index)))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect::<HashSet<&str>>()
            .len(),
        None => 0,
    };

    let metrics = DatasetMetrics {
        rows: row_count,
        columns: table.headers.len(),
        total_missing_values: missing.iter().map(|entry| entry.missing).sum(),
        fraud_count,
        fraud_percentage: ratio_or_zero(fraud_count as u64, row_count as u64) * 100.0,
        unique_merchants,
    };

    Ok(DatasetProfile {
        metrics,
        describe,
        missing,
    })
}

fn describe_column(header: &str, present: &[&str]) -> Option<ColumnDescription> {
    let values = present
        .iter()
        .map(|value| value.parse::<f64>().ok().filter(|number| number.is_finite()))
        .collect::<Option<Vec<f64>>>()?;
    let sorted = sorted_copy(&values);

    Some(ColumnDescription {
        column: header.to_string(),
        count: values.len(),
        mean: mean(&values)?,
        std: sample_std(&values),
        min: *sorted.first()?,
        q25: quantile_sorted(&sorted, 0.25)?,
        q50: quantile_sorted(&sorted, 0.5)?,
        q75: quantile_sorted(&sorted, 0.75)?,
        max: *sorted.last()?,
    })
}

fn count_frauds(source_name: &str, table: &RawTable) -> ClientResult<usize> {
    let Some(label_index) = table.column_index(columns::LABEL) else {
        return Err(ClientError::schema_error(
            source_name,
            columns::LABEL,
            "the column is required for fraud metrics",
        ));
    };

    let mut frauds = 0;
    for (row, cells) in table.rows.iter().enumerate() {
        let raw = RawTable::cell(cells, Some(label_index)).unwrap_or_default();
        match coerce_label(raw) {
            Some(true) => frauds += 1,
            Some(false) => {}
            None => return Err(ClientError::invalid_label(source_name, row + 1, raw)),
        }
    }
    Ok(frauds)
}

/// Statistic names down the first column, one column per described field.
fn describe_table(describe: &[ColumnDescription]) -> RawTable {
    let mut headers = vec![String::new()];
    headers.extend(describe.iter().map(|entry| entry.column.clone()));

    let rows = DESCRIBE_ROWS
        .iter()
        .enumerate()
        .map(|(position, name)| {
            let mut row = vec![(*name).to_string()];
            row.extend(describe.iter().map(|entry| {
                let value = match position {
                    0 => Some(entry.count as f64),
                    1 => Some(entry.mean),
                    2 => entry.std,
                    3 => Some(entry.min),
                    4 => Some(entry.q25),
                    5 => Some(entry.q50),
                    6 => Some(entry.q75),
                    _ => Some(entry.max),
                };
                value.map(|number| number.to_string()).unwrap_or_default()
            }));
            row
        })
        .collect();

    RawTable { headers, rows }
}

fn missing_table(missing: &[MissingCount]) -> RawTable {
    RawTable {
        headers: vec!["column".to_string(), "missing".to_string()],
        rows: missing
            .iter()
            .map(|entry| vec![entry.column.clone(), entry.missing.to_string()])
            .collect(),
    }
}

fn write_metrics(path: &Path, artifact: &MetricsArtifact<'_>) -> ClientResult<()> {
    let body = serde_json::to_string_pretty(artifact)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    fs::write(path, body).map_err(|error| ClientError::artifact_write_failed(path, &error.to_string()))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
