use std::path::PathBuf;

use crate::ClientResult;
use crate::commands::common::resolve_config;
use crate::config::AppConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::pipeline::transform::{self, SplitOptions};

#[derive(Debug, Default)]
pub struct TransformRunOptions<'a> {
    pub config: Option<&'a AppConfig>,
    pub data_path: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
}

pub fn run(data_path: Option<PathBuf>) -> ClientResult<SuccessEnvelope> {
    run_with_options(TransformRunOptions {
        data_path,
        ..TransformRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: TransformRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let resolved = resolve_config(options.config)?;
    let config = &*resolved;

    let settings = &config.transformation;
    let data_path = options
        .data_path
        .unwrap_or_else(|| settings.data_path.clone());
    let root_dir = options
        .root_dir
        .unwrap_or_else(|| settings.root_dir.clone());

    let summary = transform::run(
        &data_path,
        &root_dir,
        &config.validation.status_file,
        SplitOptions {
            test_size: settings.test_size,
            seed: settings.seed,
        },
    )?;
    success("transform", summary)
}
