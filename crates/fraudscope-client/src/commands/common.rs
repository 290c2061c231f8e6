use std::borrow::Cow;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::contracts::envelope::WarningContract;
use crate::contracts::types::SnapshotRow;
use crate::filter::{FilterSelections, FilteredView, LabelMode};
use crate::store::{self, BoundsOptions, LoadOutcome, LoadWarning};
use crate::{ClientError, ClientResult};

const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filter selections as typed on the command line, before parsing.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub regions: Vec<String>,
    pub merchants: Vec<String>,
    pub label: Option<String>,
    pub exclude_coerced_amounts: bool,
}

/// Parses raw arguments; an inverted range is kept as given and simply
/// matches nothing.
pub fn build_selections(args: &FilterArgs, command: &str) -> ClientResult<FilterSelections> {
    let date_start = match args.from.as_deref() {
        Some(value) => Some(parse_iso_date(value, "from", command)?),
        None => None,
    };
    let date_end = match args.to.as_deref() {
        Some(value) => Some(parse_iso_date(value, "to", command)?),
        None => None,
    };
    for (flag, value) in [("min-amount", args.min_amount), ("max-amount", args.max_amount)] {
        if let Some(amount) = value
            && !amount.is_finite()
        {
            return Err(ClientError::invalid_argument_for_command(
                &format!("Invalid --{flag} value `{amount}`: expected a finite number."),
                Some(command),
            ));
        }
    }
    let label_mode = match args.label.as_deref() {
        Some(value) => LabelMode::parse(value).ok_or_else(|| {
            ClientError::invalid_argument_for_command(
                &format!(
                    "Invalid --label value `{value}`: expected `both`, `fraud-only`, or `non-fraud-only`."
                ),
                Some(command),
            )
        })?,
        None => LabelMode::Both,
    };

    Ok(FilterSelections {
        date_start,
        date_end,
        amount_min: args.min_amount,
        amount_max: args.max_amount,
        regions: args.regions.clone(),
        merchants: args.merchants.clone(),
        label_mode,
        exclude_coerced_amounts: args.exclude_coerced_amounts,
    })
}

pub fn parse_iso_date(value: &str, field: &str, command: &str) -> ClientResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("Invalid --{field} date `{value}`: expected YYYY-MM-DD."),
            Some(command),
        )
    })
}

/// Uses the caller's configuration, or loads it from the default locations.
pub(crate) fn resolve_config(config: Option<&AppConfig>) -> ClientResult<Cow<'_, AppConfig>> {
    match config {
        Some(value) => Ok(Cow::Borrowed(value)),
        None => AppConfig::load(None).map(Cow::Owned),
    }
}

/// Command-line sources win over the configured list.
pub(crate) fn resolve_sources(config: &AppConfig, overrides: &[PathBuf]) -> Vec<PathBuf> {
    if overrides.is_empty() {
        return config.dashboard.sources.clone();
    }
    overrides.to_vec()
}

pub(crate) fn load_store(config: &AppConfig, sources: &[PathBuf]) -> ClientResult<LoadOutcome> {
    if sources.is_empty() {
        return Err(ClientError::invalid_argument_with_recovery(
            "No transaction sources are configured.",
            vec![
                "Pass one or more `--source <path>` flags.".to_string(),
                "Or set `dashboard.sources` in the configuration file.".to_string(),
            ],
        ));
    }
    store::load(sources, config.dashboard.source_policy)
}

pub(crate) fn bounds_options(config: &AppConfig) -> BoundsOptions {
    BoundsOptions {
        amount_upper_quantile: config.dashboard.amount_upper_quantile,
        merchant_option_limit: config.dashboard.merchant_option_limit,
    }
}

pub(crate) fn warning_contracts(warnings: &[LoadWarning]) -> Vec<WarningContract> {
    warnings
        .iter()
        .map(|warning| WarningContract {
            code: warning.code.clone(),
            message: warning.message.clone(),
            source: warning.source.clone(),
            columns: warning.columns.clone(),
        })
        .collect()
}

pub(crate) fn snapshot_rows(view: &FilteredView<'_>, limit: usize) -> Vec<SnapshotRow> {
    view.iter()
        .take(limit)
        .map(|record| SnapshotRow {
            timestamp: record
                .timestamp
                .map(|value| value.format(SNAPSHOT_TIMESTAMP_FORMAT).to_string()),
            merchant: record.merchant.clone(),
            category: record.category.clone(),
            amount: record.amount,
            city: record.city.clone(),
            region: record.region_code.clone(),
            is_fraud: record.is_fraud,
        })
        .collect()
}

pub(crate) fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|path| path.display().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::{FilterArgs, build_selections};
    use crate::filter::LabelMode;

    #[test]
    fn parses_filter_arguments() {
        let args = FilterArgs {
            from: Some("2023-01-05".to_string()),
            to: Some("2023-01-01".to_string()),
            label: Some("fraud-only".to_string()),
            regions: vec!["NY".to_string()],
            ..FilterArgs::default()
        };
        let selections = build_selections(&args, "dashboard");
        assert!(selections.is_ok());
        if let Ok(selections) = selections {
            assert!(selections.date_start > selections.date_end);
            assert_eq!(selections.label_mode, LabelMode::FraudOnly);
            assert_eq!(selections.regions, vec!["NY".to_string()]);
        }
    }

    #[test]
    fn rejects_malformed_values() {
        let bad_date = FilterArgs {
            from: Some("01/05/2023".to_string()),
            ..FilterArgs::default()
        };
        let result = build_selections(&bad_date, "export");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
            assert!(error.message.contains("--from"));
        }

        let bad_label = FilterArgs {
            label: Some("fraud".to_string()),
            ..FilterArgs::default()
        };
        assert!(build_selections(&bad_label, "dashboard").is_err());

        let bad_amount = FilterArgs {
            max_amount: Some(f64::NAN),
            ..FilterArgs::default()
        };
        assert!(build_selections(&bad_amount, "dashboard").is_err());
    }
}
