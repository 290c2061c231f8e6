use std::path::PathBuf;

use crate::ClientResult;
use crate::commands::common::resolve_config;
use crate::config::AppConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ValidateData;
use crate::table::RawTable;
use crate::validation::{validate_table, write_status};

#[derive(Debug, Default)]
pub struct ValidateRunOptions<'a> {
    pub config: Option<&'a AppConfig>,
    pub data_path: Option<PathBuf>,
}

pub fn run(data_path: Option<PathBuf>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ValidateRunOptions {
        config: None,
        data_path,
    })
}

/// A failed check is still a successful command: the result and the status
/// artifact both record `ok: false`.
#[doc(hidden)]
pub fn run_with_options(options: ValidateRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let resolved = resolve_config(options.config)?;
    let config = &*resolved;

    let data_path = options
        .data_path
        .unwrap_or_else(|| config.validation.data_path.clone());
    let status_file = &config.validation.status_file;

    let table = RawTable::read_path(&data_path)?;
    let result = validate_table(&table);
    if result.ok {
        log::info!("{} matches the expected schema", data_path.display());
    } else {
        log::warn!(
            "{} failed schema validation: missing [{}], unexpected [{}]",
            data_path.display(),
            result.missing.join(", "),
            result.unexpected.join(", ")
        );
    }
    write_status(status_file, result.ok)?;

    let data = ValidateData {
        data_path: data_path.display().to_string(),
        status_file: status_file.display().to_string(),
        ok: result.ok,
        missing: result.missing,
        unexpected: result.unexpected,
    };
    success("validate", data)
}
