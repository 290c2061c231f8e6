mod support;

use std::fs;
use std::path::{Path, PathBuf};

use fraudscope_client::commands::stats::{self, StatsRunOptions};
use fraudscope_client::commands::transform::{self, TransformRunOptions};
use fraudscope_client::commands::validate::{self, ValidateRunOptions};
use fraudscope_client::config::AppConfig;
use fraudscope_client::table::RawTable;
use support::logging::init_logging;

const HEADER: &str = ",trans_date_trans_time,cc_num,merchant,category,amt,first,last,gender,street,city,state,zip,lat,long,city_pop,job,dob,trans_num,unix_time,merch_lat,merch_long,is_fraud";

fn training_rows() -> Vec<String> {
    (0..20)
        .map(|index| {
            let is_fraud = u8::from(index % 5 == 0);
            format!(
                "{index},2019-01-{day:02} 0{hour}:15:00,4{index:015},fraud_Merchant {group},shopping_net,{amount}.50,Ann,Lee,F,1 Main St,Elgin,IL,60120,42.03,-88.28,{pop},Nurse,1980-01-01,t{index:04},13253{index:05},42.1,-88.3,{is_fraud}",
                day = 1 + index % 9,
                hour = index % 10,
                group = index % 4,
                amount = 10 + index * 3,
                pop = 1000 + index,
            )
        })
        .collect()
}

fn write_dataset(dir: &Path, header: &str) -> PathBuf {
    let mut body = format!("{header}\n");
    for row in training_rows() {
        body.push_str(&row);
        body.push('\n');
    }
    let path = dir.join("ingest/fraud_train.csv");
    if let Some(parent) = path.parent() {
        assert!(fs::create_dir_all(parent).is_ok());
    }
    assert!(fs::write(&path, body).is_ok());
    path
}

fn pipeline_config(dir: &Path, data_path: &Path) -> AppConfig {
    let mut config = AppConfig {
        artifacts_root: dir.join("artifacts"),
        ..AppConfig::default()
    };
    config.validation.data_path = data_path.to_path_buf();
    config.validation.status_file = dir.join("artifacts/data_validation/status.txt");
    config.transformation.data_path = data_path.to_path_buf();
    config.transformation.root_dir = dir.join("artifacts/data_transformation");
    config.stats.data_path = data_path.to_path_buf();
    config.stats.root_dir = dir.join("artifacts/eda");
    config
}

#[test]
fn validated_dataset_flows_through_every_stage() {
    init_logging();
    let dir = tempfile::tempdir();
    assert!(dir.is_ok());
    if let Ok(dir) = dir {
        let data_path = write_dataset(dir.path(), HEADER);
        let config = pipeline_config(dir.path(), &data_path);

        let validated = validate::run_with_options(ValidateRunOptions {
            config: Some(&config),
            data_path: None,
        });
        assert!(validated.is_ok());
        if let Ok(envelope) = validated {
            assert_eq!(envelope.data["ok"], true);
        }
        let status = fs::read_to_string(&config.validation.status_file);
        assert_eq!(status.ok().as_deref(), Some("Validation status: True\n"));

        let transformed = transform::run_with_options(TransformRunOptions {
            config: Some(&config),
            ..TransformRunOptions::default()
        });
        assert!(transformed.is_ok());
        if let Ok(envelope) = transformed {
            let data = &envelope.data;
            assert_eq!(data["rows"], 20);
            assert_eq!(data["test_rows"], 4);
            assert_eq!(data["train_rows"], 16);
            assert_eq!(data["test_frauds"], 1);
            assert_eq!(data["train_frauds"], 3);
        }

        let root = &config.transformation.root_dir;
        let cleaned = RawTable::read_path(&root.join("cleaned.csv"));
        let train = RawTable::read_path(&root.join("train.csv"));
        let test = RawTable::read_path(&root.join("test.csv"));
        assert!(cleaned.is_ok() && train.is_ok() && test.is_ok());
        if let (Ok(cleaned), Ok(train), Ok(test)) = (cleaned, train, test) {
            assert_eq!(cleaned.headers[0], "id");
            assert!(!cleaned.has_column("trans_date_trans_time"));
            assert_eq!(
                &cleaned.headers[cleaned.headers.len() - 2..],
                &["trans_date".to_string(), "trans_time".to_string()]
            );
            let merchant = cleaned.column_index("merchant");
            assert!(
                cleaned
                    .rows
                    .iter()
                    .all(|row| !RawTable::cell(row, merchant).unwrap_or("").contains("fraud_"))
            );
            assert_eq!(train.rows.len() + test.rows.len(), cleaned.rows.len());
            assert_eq!(train.headers, cleaned.headers);
        }

        let profiled = stats::run_with_options(StatsRunOptions {
            config: Some(&config),
            ..StatsRunOptions::default()
        });
        assert!(profiled.is_ok());
        if let Ok(envelope) = profiled {
            let data = &envelope.data;
            let metrics = &data["profile"]["metrics"];
            assert_eq!(metrics["rows"], 20);
            assert_eq!(metrics["fraud_count"], 4);
            assert_eq!(metrics["fraud_percentage"], 20.0);
            assert_eq!(metrics["unique_merchants"], 4);
            assert!(data["run_id"].as_str().is_some_and(|id| id.starts_with("run_")));
            for key in ["describe_path", "missing_path", "metrics_path"] {
                let path = data[key].as_str().map(PathBuf::from);
                assert!(path.is_some_and(|value| value.is_file()));
            }
        }
    }
}

#[test]
fn repeated_transforms_produce_identical_splits() {
    init_logging();
    let dir = tempfile::tempdir();
    assert!(dir.is_ok());
    if let Ok(dir) = dir {
        let data_path = write_dataset(dir.path(), HEADER);
        let config = pipeline_config(dir.path(), &data_path);
        assert!(
            validate::run_with_options(ValidateRunOptions {
                config: Some(&config),
                data_path: None,
            })
            .is_ok()
        );

        let mut outputs = Vec::new();
        for name in ["first", "second"] {
            let root_dir = dir.path().join(name);
            let result = transform::run_with_options(TransformRunOptions {
                config: Some(&config),
                root_dir: Some(root_dir.clone()),
                ..TransformRunOptions::default()
            });
            assert!(result.is_ok());
            outputs.push(fs::read_to_string(root_dir.join("test.csv")).ok());
        }
        assert!(outputs[0].is_some());
        assert_eq!(outputs[0], outputs[1]);
    }
}

#[test]
fn failed_validation_closes_the_gate() {
    init_logging();
    let dir = tempfile::tempdir();
    assert!(dir.is_ok());
    if let Ok(dir) = dir {
        let data_path = write_dataset(dir.path(), &HEADER.replace(",job,", ",occupation,"));
        let config = pipeline_config(dir.path(), &data_path);

        let validated = validate::run_with_options(ValidateRunOptions {
            config: Some(&config),
            data_path: None,
        });
        assert!(validated.is_ok());
        if let Ok(envelope) = validated {
            assert_eq!(envelope.data["ok"], false);
            assert_eq!(envelope.data["missing"][0], "job");
            assert_eq!(envelope.data["unexpected"][0], "occupation");
        }
        let status = fs::read_to_string(&config.validation.status_file);
        assert_eq!(status.ok().as_deref(), Some("Validation status: False\n"));

        let transformed = transform::run_with_options(TransformRunOptions {
            config: Some(&config),
            ..TransformRunOptions::default()
        });
        assert!(transformed.is_err());
        if let Err(error) = transformed {
            assert_eq!(error.code, "validation_gate_closed");
        }
        assert!(!config.transformation.root_dir.join("train.csv").exists());
    }
}

#[test]
fn missing_dataset_reports_source_unavailable() {
    init_logging();
    let dir = tempfile::tempdir();
    assert!(dir.is_ok());
    if let Ok(dir) = dir {
        let config = pipeline_config(dir.path(), &dir.path().join("absent.csv"));
        let result = stats::run_with_options(StatsRunOptions {
            config: Some(&config),
            ..StatsRunOptions::default()
        });
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "source_unavailable");
        }
    }
}
