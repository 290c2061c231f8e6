use std::path::PathBuf;

use crate::ClientResult;
use crate::commands::common::resolve_config;
use crate::config::AppConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::pipeline::stats;

#[derive(Debug, Default)]
pub struct StatsRunOptions<'a> {
    pub config: Option<&'a AppConfig>,
    pub data_path: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
}

pub fn run(data_path: Option<PathBuf>) -> ClientResult<SuccessEnvelope> {
    run_with_options(StatsRunOptions {
        data_path,
        ..StatsRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: StatsRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let resolved = resolve_config(options.config)?;
    let config = &*resolved;

    let data_path = options
        .data_path
        .unwrap_or_else(|| config.stats.data_path.clone());
    let root_dir = options
        .root_dir
        .unwrap_or_else(|| config.stats.root_dir.clone());

    let report = stats::run(&data_path, &root_dir)?;
    success("stats", report)
}
