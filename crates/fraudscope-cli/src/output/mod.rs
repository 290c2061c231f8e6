mod dashboard_text;
mod error_text;
mod format;
mod json;
mod mode;
mod pipeline_text;

use std::io;

use fraudscope_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

/// Errors go to stdout too, so `--json` callers always get one parseable document.
pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    let body = match success.command.as_str() {
        "dashboard" => dashboard_text::render_dashboard(&success.data)?,
        "export" => pipeline_text::render_export(&success.data)?,
        "validate" => pipeline_text::render_validate(&success.data)?,
        "transform" => pipeline_text::render_transform(&success.data)?,
        "stats" => pipeline_text::render_stats(&success.data)?,
        _ => {
            return Err(io::Error::other(format!(
                "unsupported text output command `{}`",
                success.command
            )));
        }
    };
    if success.warnings.is_empty() {
        return Ok(body);
    }

    let mut lines = vec![body, String::new(), "Warnings:".to_string()];
    for warning in &success.warnings {
        let mut line = format!("  - [{}] {}", warning.code, warning.message);
        if !warning.columns.is_empty() {
            line.push_str(&format!(" ({})", warning.columns.join(", ")));
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use fraudscope_client::SuccessEnvelope;
    use fraudscope_client::contracts::envelope::WarningContract;
    use serde_json::json;

    use super::render_text_success;

    #[test]
    fn warnings_follow_the_body() {
        let success = SuccessEnvelope {
            ok: true,
            command: "export".to_string(),
            version: "0.1.0".to_string(),
            data: json!({ "path": "out.csv", "rows": 1, "store_rows": 1 }),
            warnings: vec![WarningContract {
                code: "configuration_mismatch".to_string(),
                message: "part3.csv lacks expected columns".to_string(),
                source: Some("part3.csv".to_string()),
                columns: vec!["merch_lat".to_string(), "merch_long".to_string()],
            }],
        };
        let rendered = render_text_success(&success);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Exported 1 of 1 transactions"));
            assert!(text.contains(
                "  - [configuration_mismatch] part3.csv lacks expected columns (merch_lat, merch_long)"
            ));
        }
    }

    #[test]
    fn unknown_command_is_an_output_error() {
        let success = SuccessEnvelope {
            ok: true,
            command: "serve".to_string(),
            version: "0.1.0".to_string(),
            data: json!({}),
            warnings: Vec::new(),
        };
        assert!(render_text_success(&success).is_err());
    }
}
