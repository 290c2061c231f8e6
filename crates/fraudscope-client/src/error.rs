use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const CONFIG_HELP_COMMAND: &str = "fraudscope --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `fraudscope {cmd} --help` for usage."),
            None => "Run `fraudscope --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn source_unavailable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "source_unavailable",
            &format!("Could not read transaction source `{location}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Set `dashboard.source_policy: allow_partial` to continue without it.".to_string(),
            ],
        )
        .with_data(json!({
            "source": location,
        }))
    }

    pub fn schema_error(source: &str, field: &str, detail: &str) -> Self {
        Self::new(
            "schema_error",
            &format!("Source `{source}` is missing mandatory field `{field}`: {detail}"),
            vec![
                format!("Add a `{field}` column with 0/1 values to `{source}`."),
                "Run `fraudscope validate` to compare headers with the expected schema."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "source": source,
            "field": field,
        }))
    }

    pub fn invalid_label(source: &str, row: usize, received: &str) -> Self {
        Self::new(
            "schema_error",
            &format!(
                "Source `{source}` row {row} has an unusable `is_fraud` value \"{received}\"."
            ),
            vec!["Every row needs an `is_fraud` value of 0 or 1.".to_string()],
        )
        .with_data(json!({
            "source": source,
            "field": "is_fraud",
            "row": row,
            "received": received,
        }))
    }

    pub fn config_invalid(path: Option<&Path>, detail: &str) -> Self {
        let location = path.map(|value| value.display().to_string());
        let message = match &location {
            Some(value) => format!("Configuration at `{value}` could not be loaded: {detail}"),
            None => format!("Configuration could not be loaded: {detail}"),
        };
        Self::new(
            "config_invalid",
            &message,
            vec![
                "Fix the reported key in the configuration file or FRAUDSCOPE__* variables."
                    .to_string(),
                format!("Run `{CONFIG_HELP_COMMAND}` to review configuration options."),
            ],
        )
        .with_data(json!({
            "config_path": location,
        }))
    }

    pub fn validation_gate_closed(status_file: &Path) -> Self {
        let location = status_file.display().to_string();
        Self::new(
            "validation_gate_closed",
            &format!("Schema validation has not passed (status file `{location}`)."),
            vec![
                "Run `fraudscope validate` and fix any missing or unexpected columns.".to_string(),
                "Then rerun `fraudscope transform`.".to_string(),
            ],
        )
        .with_data(json!({
            "status_file": location,
        }))
    }

    pub fn artifact_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "artifact_write_failed",
            &format!("Could not write artifact `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or point `artifacts_root` at a writable directory."
            )],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
