use std::path::PathBuf;

use crate::aggregate::{DashboardOptions, GeoLayer, Granularity, compute_dashboard};
use crate::commands::common::{
    FilterArgs, bounds_options, build_selections, display_paths, load_store, resolve_config,
    resolve_sources, snapshot_rows, warning_contracts,
};
use crate::config::AppConfig;
use crate::contracts::envelope::{SuccessEnvelope, success_with_warnings};
use crate::contracts::types::DashboardData;
use crate::filter::{FilterSelections, FilterSpec};
use crate::store::RecordStore;
use crate::{ClientError, ClientResult};

const COMMAND: &str = "dashboard";

#[derive(Debug, Default)]
pub struct DashboardRunOptions<'a> {
    pub config: Option<&'a AppConfig>,
    pub sources: Vec<PathBuf>,
    pub filters: FilterArgs,
    pub granularity: Option<String>,
    pub layers: Vec<String>,
}

pub fn run(filters: FilterArgs) -> ClientResult<SuccessEnvelope> {
    run_with_options(DashboardRunOptions {
        filters,
        ..DashboardRunOptions::default()
    })
}

/// One load plus one full recomputation for the given selection.
///
/// An empty store is not an error: the result is marked `halted` and carries
/// an `empty_result` warning.
#[doc(hidden)]
pub fn run_with_options(options: DashboardRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let resolved = resolve_config(options.config)?;
    let config = &*resolved;

    let granularity = parse_granularity(options.granularity.as_deref())?;
    let layers = parse_layers(&options.layers)?;
    let selections = build_selections(&options.filters, COMMAND)?;

    let sources = resolve_sources(config, &options.sources);
    let outcome = load_store(config, &sources)?;
    let warnings = warning_contracts(&outcome.warnings);
    let halted = outcome.is_empty();

    let data = build_data(
        &outcome.store,
        config,
        selections,
        DashboardOptions {
            granularity,
            layers,
            entity_limit: config.dashboard.entity_limit,
        },
        display_paths(&sources),
        halted,
    );
    success_with_warnings(COMMAND, data, warnings)
}

fn build_data(
    store: &RecordStore,
    config: &AppConfig,
    selections: FilterSelections,
    options: DashboardOptions,
    sources: Vec<String>,
    halted: bool,
) -> DashboardData {
    let bounds = store.bounds(bounds_options(config));
    let spec = FilterSpec::from_selections(&bounds, selections);
    let snapshot = compute_dashboard(store, &spec, &options);

    DashboardData {
        sources,
        store_rows: store.len(),
        view_rows: snapshot.view.len(),
        halted,
        snapshot: snapshot_rows(&snapshot.view, config.dashboard.snapshot_rows),
        bounds,
        filters: spec,
        granularity: options.granularity.as_str().to_string(),
        layers: options.layers,
        kpis: snapshot.kpis,
        timeline: snapshot.timeline,
        distribution: snapshot.distribution,
        regions: snapshot.regions,
        entities: snapshot.entities,
        patterns: snapshot.patterns,
        geo: snapshot.geo,
    }
}

fn parse_granularity(value: Option<&str>) -> ClientResult<Granularity> {
    match value {
        Some(raw) => Granularity::parse(raw).ok_or_else(|| {
            ClientError::invalid_argument_for_command(
                &format!("Invalid --granularity value `{raw}`: expected `day`, `week`, or `month`."),
                Some(COMMAND),
            )
        }),
        None => Ok(Granularity::Day),
    }
}

fn parse_layers(values: &[String]) -> ClientResult<Vec<GeoLayer>> {
    if values.is_empty() {
        return Ok(GeoLayer::default_layers());
    }
    values
        .iter()
        .map(|raw| {
            GeoLayer::parse(raw).ok_or_else(|| {
                let names = GeoLayer::ALL
                    .iter()
                    .map(|layer| format!("`{}`", layer.as_str()))
                    .collect::<Vec<String>>()
                    .join(", ");
                ClientError::invalid_argument_for_command(
                    &format!("Invalid --layer value `{raw}`: expected one of {names}."),
                    Some(COMMAND),
                )
            })
        })
        .collect()
}
