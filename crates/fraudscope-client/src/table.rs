use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use crate::{ClientError, ClientResult};

/// Untyped CSV table: trimmed header names plus string cells.
///
/// Rows may be shorter than the header; missing cells read as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn read_path(path: &Path) -> ClientResult<Self> {
        let file = File::open(path)
            .map_err(|error| ClientError::source_unavailable(path, &error.to_string()))?;
        Self::from_reader(file).map_err(|detail| ClientError::source_unavailable(path, &detail))
    }

    /// Any row that is not valid UTF-8 fails the whole table, so callers treat
    /// the source as unreadable rather than loading part of it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|error| format!("CSV header row is missing or unreadable: {error}"))?
            .iter()
            .map(|value| value.trim().to_string())
            .collect::<Vec<String>>();

        let mut rows = Vec::new();
        for (index, result_row) in reader.records().enumerate() {
            let record = result_row
                .map_err(|error| format!("CSV row {} is malformed: {error}", index + 1))?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<String>>());
        }

        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell<'a>(row: &'a [String], index: Option<usize>) -> Option<&'a str> {
        row.get(index?).map(String::as_str)
    }

    pub fn write_path(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|error| ClientError::artifact_write_failed(parent, &error.to_string()))?;
        }

        let bytes = self
            .to_csv_bytes()
            .map_err(|detail| ClientError::artifact_write_failed(path, &detail))?;
        fs::write(path, bytes)
            .map_err(|error| ClientError::artifact_write_failed(path, &error.to_string()))
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, String> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer
            .write_record(&self.headers)
            .map_err(|error| error.to_string())?;
        for row in &self.rows {
            writer.write_record(row).map_err(|error| error.to_string())?;
        }
        writer.into_inner().map_err(|error| error.to_string())
    }
}
