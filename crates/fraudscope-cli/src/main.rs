mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use fraudscope_client::ClientError;
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "fraudscope - credit card fraud exploration and data pipeline

Usage:
  fraudscope <command>

Start here:
  fraudscope dashboard
  fraudscope validate
  fraudscope --help
";

const TOP_LEVEL_HELP: &str = "fraudscope - credit card fraud exploration and data pipeline

USAGE: fraudscope [--config <path>] <command>

Explore transactions:
  fraudscope dashboard                                  Every view over all configured sources
  fraudscope dashboard --label fraud-only --region NY   Narrow the view with filters
  fraudscope export --output filtered.csv               Save the filtered rows as CSV

Prepare a dataset:
  1. fraudscope validate                                Check columns against the expected schema
  2. fraudscope transform                               Clean and split into train/test files
  3. fraudscope stats                                   Write summary statistics artifacts

Configuration:
  --config <path>, $FRAUDSCOPE_CONFIG, ./fraudscope.yaml or ~/.fraudscope/config.yaml,
  then FRAUDSCOPE__<SECTION>__<KEY> environment overrides.

Every command accepts --json for machine-readable output.
Run `fraudscope <command> --help` for command usage.
";

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            log::debug!("command failed with {}", error.code);
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        kind => {
            let command_hint = if matches!(
                kind,
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
            ) {
                command_path_from_args(raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint);
            let mode = infer_requested_output_mode(raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(ExitCode::from(1))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage block so the recovery steps are the only guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<&'static str> {
    raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .find_map(|value| match value.as_str() {
            "dashboard" => Some("dashboard"),
            "export" => Some("export"),
            "validate" => Some("validate"),
            "transform" => Some("transform"),
            "stats" => Some("stats"),
            _ => None,
        })
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_") || error.code == "artifact_write_failed"
}

#[cfg(test)]
mod tests {
    use fraudscope_client::ClientError;

    use super::{
        command_path_from_args, infer_requested_output_mode, is_internal_error,
        strip_clap_boilerplate,
    };
    use crate::output::OutputMode;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn strips_usage_block() {
        let message = "error: invalid value 'x' for '--label'\n\nUsage: fraudscope dashboard";
        assert_eq!(
            strip_clap_boilerplate(message),
            "error: invalid value 'x' for '--label'"
        );
    }

    #[test]
    fn command_hint_skips_global_flags() {
        assert_eq!(
            command_path_from_args(&args(&["fraudscope", "--json", "export", "--bogus"])),
            Some("export")
        );
        assert_eq!(
            command_path_from_args(&args(&["fraudscope", "--config", "a.yaml", "stats"])),
            Some("stats")
        );
        assert_eq!(command_path_from_args(&args(&["fraudscope", "serve"])), None);
    }

    #[test]
    fn json_flag_anywhere_selects_json_errors() {
        assert_eq!(
            infer_requested_output_mode(&args(&["fraudscope", "stats", "--json", "--bogus"])),
            OutputMode::Json
        );
        assert_eq!(
            infer_requested_output_mode(&args(&["fraudscope", "stats"])),
            OutputMode::Text
        );
    }

    #[test]
    fn write_failures_are_internal() {
        let write = ClientError::artifact_write_failed(std::path::Path::new("/ro/out.csv"), "denied");
        assert!(is_internal_error(&write));
        assert!(!is_internal_error(&ClientError::invalid_argument("bad")));
    }
}
