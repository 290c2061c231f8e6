//! Column-membership check of a dataset header against the declared schema,
//! plus the status artifact that gates the transformation stage.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::store::columns::{EXPECTED_COLUMNS, is_index_column};
use crate::table::RawTable;
use crate::{ClientError, ClientResult};

const STATUS_PREFIX: &str = "Validation status:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub ok: bool,
    /// Expected columns absent from the record schema, in schema order.
    pub missing: Vec<String>,
    /// Record columns the schema does not declare, in header order.
    pub unexpected: Vec<String>,
}

/// Pure membership comparison; column types are not inspected.
pub fn validate(record_schema: &[&str], expected_schema: &[&str]) -> ValidationResult {
    let missing = expected_schema
        .iter()
        .copied()
        .filter(|name| !record_schema.contains(name))
        .map(str::to_string)
        .collect::<Vec<String>>();
    let unexpected = record_schema
        .iter()
        .copied()
        .filter(|name| !expected_schema.contains(name))
        .map(str::to_string)
        .collect::<Vec<String>>();

    ValidationResult {
        ok: missing.is_empty() && unexpected.is_empty(),
        missing,
        unexpected,
    }
}

/// Checks a table header, ignoring a leading unnamed index column.
pub fn validate_table(table: &RawTable) -> ValidationResult {
    let record_schema = table
        .headers
        .iter()
        .map(String::as_str)
        .filter(|name| !is_index_column(name))
        .collect::<Vec<&str>>();
    let expected = EXPECTED_COLUMNS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<&str>>();
    validate(&record_schema, &expected)
}

pub fn write_status(path: &Path, ok: bool) -> ClientResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|error| ClientError::artifact_write_failed(parent, &error.to_string()))?;
    }
    let body = format!("{STATUS_PREFIX} {}\n", status_word(ok));
    fs::write(path, body).map_err(|error| ClientError::artifact_write_failed(path, &error.to_string()))
}

/// `true` only when the artifact exists and records a passing run.
pub fn read_status(path: &Path) -> bool {
    let Ok(body) = fs::read_to_string(path) else {
        return false;
    };
    body.trim()
        .strip_prefix(STATUS_PREFIX)
        .map(str::trim)
        .is_some_and(|word| word.eq_ignore_ascii_case("true"))
}

/// Fails with `validation_gate_closed` unless the status artifact passed.
pub fn require_passed(path: &Path) -> ClientResult<()> {
    if read_status(path) {
        return Ok(());
    }
    Err(ClientError::validation_gate_closed(path))
}

fn status_word(ok: bool) -> &'static str {
    if ok { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{read_status, require_passed, validate, validate_table, write_status};
    use crate::store::columns::expected_column_names;
    use crate::table::RawTable;

    #[test]
    fn reports_missing_and_unexpected_columns() {
        let result = validate(&["amt", "is_fraud", "extra"], &["amt", "is_fraud", "state"]);
        assert!(!result.ok);
        assert_eq!(result.missing, vec!["state".to_string()]);
        assert_eq!(result.unexpected, vec!["extra".to_string()]);

        let same = validate(&["b", "a"], &["a", "b"]);
        assert!(same.ok);
    }

    #[test]
    fn table_check_ignores_index_column() {
        let mut headers = vec!["Unnamed: 0".to_string()];
        headers.extend(expected_column_names().into_iter().map(str::to_string));
        let table = RawTable {
            headers,
            rows: Vec::new(),
        };
        assert!(validate_table(&table).ok);
    }

    #[test]
    fn status_round_trips_through_artifact() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let path = dir.path().join("data_validation").join("status.txt");
            assert!(!read_status(&path));
            assert!(require_passed(&path).is_err());

            assert!(write_status(&path, true).is_ok());
            assert_eq!(
                fs::read_to_string(&path).ok().as_deref(),
                Some("Validation status: True\n")
            );
            assert!(read_status(&path));
            assert!(require_passed(&path).is_ok());

            assert!(write_status(&path, false).is_ok());
            assert!(!read_status(&path));
        }
    }
}
