use std::ffi::OsString;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::aggregate::entity::DEFAULT_ENTITY_LIMIT;
use crate::store::SourcePolicy;
use crate::store::bounds::{DEFAULT_AMOUNT_UPPER_QUANTILE, DEFAULT_MERCHANT_OPTION_LIMIT};
use crate::{ClientError, ClientResult};

pub const CONFIG_PATH_ENV: &str = "FRAUDSCOPE_CONFIG";
const ENV_PREFIX: &str = "FRAUDSCOPE";
const ENV_SEPARATOR: &str = "__";
const LOCAL_CONFIG_FILE: &str = "fraudscope.yaml";
const HOME_CONFIG_DIR: &str = ".fraudscope";
const HOME_CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_SNAPSHOT_ROWS: usize = 200;
pub const DEFAULT_TEST_SIZE: f64 = 0.2;
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Settings for every command, built once at startup and passed down.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts_root: PathBuf,
    pub dashboard: DashboardConfig,
    pub validation: ValidationConfig,
    pub transformation: TransformationConfig,
    pub stats: StatsConfig,
    /// File the settings were read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: Vec<PathBuf>,
    pub source_policy: SourcePolicy,
    pub entity_limit: usize,
    pub snapshot_rows: usize,
    pub merchant_option_limit: usize,
    pub amount_upper_quantile: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub data_path: PathBuf,
    pub status_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformationConfig {
    pub data_path: PathBuf,
    pub root_dir: PathBuf,
    pub test_size: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub data_path: PathBuf,
    pub root_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts_root: PathBuf::from("artifacts"),
            dashboard: DashboardConfig::default(),
            validation: ValidationConfig::default(),
            transformation: TransformationConfig::default(),
            stats: StatsConfig::default(),
            source: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                PathBuf::from("data/fraud_part1.csv"),
                PathBuf::from("data/fraud_part2.csv"),
                PathBuf::from("data/fraud_part3.csv"),
            ],
            source_policy: SourcePolicy::RequireAll,
            entity_limit: DEFAULT_ENTITY_LIMIT,
            snapshot_rows: DEFAULT_SNAPSHOT_ROWS,
            merchant_option_limit: DEFAULT_MERCHANT_OPTION_LIMIT,
            amount_upper_quantile: DEFAULT_AMOUNT_UPPER_QUANTILE,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("artifacts/data_ingestion/data/fraud_train.csv"),
            status_file: PathBuf::from("artifacts/data_validation/status.txt"),
        }
    }
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("artifacts/data_ingestion/data/fraud_train.csv"),
            root_dir: PathBuf::from("artifacts/data_transformation"),
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SPLIT_SEED,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("artifacts/data_ingestion/data/fraud_test.csv"),
            root_dir: PathBuf::from("artifacts/eda"),
        }
    }
}

impl AppConfig {
    /// Loads defaults, then the first config file found, then
    /// `FRAUDSCOPE__SECTION__KEY` environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> ClientResult<Self> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV);
        let path = resolve_config_path(
            explicit_path,
            env_path,
            Path::new("."),
            home::home_dir().as_deref(),
        );
        Self::load_from(path.as_deref(), true)
    }

    /// Loads from one optional file; `with_env` toggles environment overrides.
    pub fn load_from(path: Option<&Path>, with_env: bool) -> ClientResult<Self> {
        let mut builder = Config::builder();
        if let Some(file) = path {
            if !file.is_file() {
                return Err(ClientError::config_invalid(
                    Some(file),
                    "the file does not exist",
                ));
            }
            builder = builder.add_source(File::from(file).required(true));
        }
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("dashboard.sources"),
            );
        }

        let settings = builder
            .build()
            .map_err(|error| ClientError::config_invalid(path, &error.to_string()))?;
        let mut loaded = settings
            .try_deserialize::<AppConfig>()
            .map_err(|error| ClientError::config_invalid(path, &error.to_string()))?;
        loaded.source = path.map(Path::to_path_buf);
        loaded.check(path)?;

        log::debug!(
            "configuration loaded from {}",
            path.map_or_else(|| "defaults".to_string(), |value| value.display().to_string())
        );
        Ok(loaded)
    }

    fn check(&self, path: Option<&Path>) -> ClientResult<()> {
        let test_size = self.transformation.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(ClientError::config_invalid(
                path,
                &format!("transformation.test_size must be between 0 and 1, got {test_size}"),
            ));
        }
        let quantile = self.dashboard.amount_upper_quantile;
        if !(quantile > 0.0 && quantile <= 1.0) {
            return Err(ClientError::config_invalid(
                path,
                &format!("dashboard.amount_upper_quantile must be in (0, 1], got {quantile}"),
            ));
        }
        if self.dashboard.entity_limit == 0 {
            return Err(ClientError::config_invalid(
                path,
                "dashboard.entity_limit must be at least 1",
            ));
        }
        Ok(())
    }
}

/// First match wins: explicit path, `FRAUDSCOPE_CONFIG`, `./fraudscope.yaml`,
/// then `~/.fraudscope/config.yaml`. The last two only count if they exist.
pub fn resolve_config_path(
    explicit_path: Option<&Path>,
    env_path: Option<OsString>,
    working_dir: &Path,
    home_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }

    let local = working_dir.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    home_dir
        .map(|home| home.join(HOME_CONFIG_DIR).join(HOME_CONFIG_FILE))
        .filter(|candidate| candidate.is_file())
}
