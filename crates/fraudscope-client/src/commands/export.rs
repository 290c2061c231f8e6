use std::path::PathBuf;

use crate::ClientResult;
use crate::commands::common::{
    FilterArgs, bounds_options, build_selections, load_store, resolve_config, resolve_sources,
    warning_contracts,
};
use crate::config::AppConfig;
use crate::contracts::envelope::{SuccessEnvelope, success_with_warnings};
use crate::contracts::types::ExportData;
use crate::export::{EXPORT_FILE_NAME, write_csv};
use crate::filter::{FilterSpec, evaluate};

const COMMAND: &str = "export";

#[derive(Debug, Default)]
pub struct ExportRunOptions<'a> {
    pub config: Option<&'a AppConfig>,
    pub sources: Vec<PathBuf>,
    pub filters: FilterArgs,
    /// Defaults to `<artifacts_root>/filtered_fraud_data.csv`.
    pub output: Option<PathBuf>,
}

pub fn run(filters: FilterArgs, output: Option<PathBuf>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ExportRunOptions {
        filters,
        output,
        ..ExportRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ExportRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let resolved = resolve_config(options.config)?;
    let config = &*resolved;

    let selections = build_selections(&options.filters, COMMAND)?;
    let sources = resolve_sources(config, &options.sources);
    let outcome = load_store(config, &sources)?;

    let bounds = outcome.store.bounds(bounds_options(config));
    let spec = FilterSpec::from_selections(&bounds, selections);
    let view = evaluate(&outcome.store, &spec);

    let path = options
        .output
        .unwrap_or_else(|| config.artifacts_root.join(EXPORT_FILE_NAME));
    let rows = write_csv(&view, &path)?;

    let data = ExportData {
        path: path.display().to_string(),
        rows,
        store_rows: outcome.store.len(),
        filters: spec,
    };
    success_with_warnings(COMMAND, data, warning_contracts(&outcome.warnings))
}
