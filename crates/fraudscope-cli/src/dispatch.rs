use fraudscope_client::commands;
use fraudscope_client::commands::dashboard::DashboardRunOptions;
use fraudscope_client::commands::export::ExportRunOptions;
use fraudscope_client::commands::stats::StatsRunOptions;
use fraudscope_client::commands::transform::TransformRunOptions;
use fraudscope_client::commands::validate::ValidateRunOptions;
use fraudscope_client::config::AppConfig;
use fraudscope_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    let config = AppConfig::load(cli.config.as_deref())?;
    dispatch_with_config(&cli.command, &config)
}

fn dispatch_with_config(command: &Commands, config: &AppConfig) -> ClientResult<SuccessEnvelope> {
    match command {
        Commands::Dashboard {
            filters,
            granularity,
            layers,
            ..
        } => commands::dashboard::run_with_options(DashboardRunOptions {
            config: Some(config),
            sources: filters.sources.clone(),
            filters: filters.to_filter_args(),
            granularity: granularity.clone(),
            layers: layers.clone(),
        }),
        Commands::Export {
            filters, output, ..
        } => commands::export::run_with_options(ExportRunOptions {
            config: Some(config),
            sources: filters.sources.clone(),
            filters: filters.to_filter_args(),
            output: output.clone(),
        }),
        Commands::Validate { data_path, .. } => {
            commands::validate::run_with_options(ValidateRunOptions {
                config: Some(config),
                data_path: data_path.clone(),
            })
        }
        Commands::Transform {
            data_path,
            root_dir,
            ..
        } => commands::transform::run_with_options(TransformRunOptions {
            config: Some(config),
            data_path: data_path.clone(),
            root_dir: root_dir.clone(),
        }),
        Commands::Stats {
            data_path,
            root_dir,
            ..
        } => commands::stats::run_with_options(StatsRunOptions {
            config: Some(config),
            data_path: data_path.clone(),
            root_dir: root_dir.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use fraudscope_client::config::AppConfig;

    use super::dispatch_with_config;
    use crate::cli::parse_from;

    const HEADER: &str = "trans_date_trans_time,cc_num,merchant,category,amt,first,last,gender,street,city,state,zip,lat,long,city_pop,job,dob,trans_num,unix_time,merch_lat,merch_long,is_fraud";

    fn write_source(dir: &Path) -> String {
        let path = dir.join("fraud.csv");
        let body = format!(
            "{HEADER}\n\
             21/06/2020 12:14,2703186189652095,fraud_Rippin Kub and Mann,misc_net,4.97,Jennifer,Banks,F,561 Perry Cove,Moravian Falls,NC,28654,36.0788,-81.1781,3495,Psychologist,09/03/1988,0b242abb,1371816865,36.011293,-82.048315,0\n\
             22/06/2020 01:30,630423337322,fraud_Heller Gutmann and Zieme,grocery_pos,107.23,Stephanie,Gill,F,43039 Riley Greens,Orient,WA,99160,48.8878,-118.2105,149,Teacher,21/06/1978,1f76529f,1371816873,49.159047,-118.186462,1\n"
        );
        let written = fs::write(&path, body);
        assert!(written.is_ok());
        path.display().to_string()
    }

    #[test]
    fn dispatches_to_expected_command_names() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let source = write_source(dir.path());
            let config = AppConfig {
                artifacts_root: dir.path().join("artifacts"),
                ..AppConfig::default()
            };

            let cases: [(Vec<&str>, &str); 2] = [
                (vec!["fraudscope", "dashboard", "--source", &source], "dashboard"),
                (vec!["fraudscope", "export", "--source", &source], "export"),
            ];
            for (args, expected_command) in cases {
                let parsed = parse_from(args);
                assert!(parsed.is_ok());
                if let Ok(cli) = parsed {
                    let response = dispatch_with_config(&cli.command, &config);
                    assert!(response.is_ok());
                    if let Ok(success) = response {
                        assert_eq!(success.command, expected_command);
                    }
                }
            }
            assert!(dir.path().join("artifacts/filtered_fraud_data.csv").is_file());
        }
    }

    #[test]
    fn missing_dataset_surfaces_client_error() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let missing = dir.path().join("absent.csv").display().to_string();
            let parsed = parse_from(["fraudscope", "stats", "--data-path", &missing]);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch_with_config(&cli.command, &AppConfig::default());
                assert!(response.is_err());
            }
        }
    }
}
