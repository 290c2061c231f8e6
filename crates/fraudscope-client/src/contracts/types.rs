use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{
    CountSummary, EntityBreakdown, GeoLayer, GeoSummary, Kpis, LabelDistribution,
    TemporalPatterns, TimeBucket,
};
use crate::filter::FilterSpec;
use crate::store::StoreBounds;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub sources: Vec<String>,
    pub store_rows: usize,
    pub view_rows: usize,
    /// Set when the store is empty and nothing past the header was computed.
    pub halted: bool,
    pub bounds: StoreBounds,
    pub filters: FilterSpec,
    pub granularity: String,
    pub layers: Vec<GeoLayer>,
    pub kpis: Kpis,
    pub timeline: Vec<TimeBucket>,
    pub distribution: Vec<LabelDistribution>,
    pub regions: BTreeMap<String, CountSummary>,
    pub entities: EntityBreakdown,
    pub patterns: TemporalPatterns,
    pub geo: GeoSummary,
    pub snapshot: Vec<SnapshotRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub timestamp: Option<String>,
    pub merchant: Option<String>,
    pub category: Option<String>,
    pub amount: f64,
    pub city: Option<String>,
    pub region: Option<String>,
    pub is_fraud: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportData {
    pub path: String,
    pub rows: usize,
    pub store_rows: usize,
    pub filters: FilterSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateData {
    pub data_path: String,
    pub status_file: String,
    pub ok: bool,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}
