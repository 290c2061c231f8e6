//! Derived views over one `FilteredView`.
//!
//! Every function here is pure and reads the view only, so they can run in
//! any order against the same view and agree with each other.

pub mod distribution;
pub mod entity;
pub mod geo;
pub mod kpi;
pub mod patterns;
pub mod regional;
pub mod temporal;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::filter::{FilterSpec, FilteredView, evaluate};
use crate::stats::ratio_or_zero;
use crate::store::{RecordStore, TransactionRecord};

pub use distribution::LabelDistribution;
pub use entity::EntityBreakdown;
pub use geo::{GeoLayer, GeoSummary};
pub use kpi::Kpis;
pub use patterns::TemporalPatterns;
pub use temporal::{Granularity, TimeBucket};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CountSummary {
    pub total: u64,
    pub frauds: u64,
    /// `frauds / total`, reported as 0 when `total` is 0.
    pub fraud_rate: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
    pub(crate) total: u64,
    pub(crate) frauds: u64,
    pub(crate) amount_sum: f64,
}

impl Tally {
    pub(crate) fn add(&mut self, record: &TransactionRecord) {
        self.total += 1;
        self.frauds += u64::from(record.label());
        self.amount_sum += record.amount;
    }

    pub(crate) fn summary(&self) -> CountSummary {
        CountSummary {
            total: self.total,
            frauds: self.frauds,
            fraud_rate: ratio_or_zero(self.frauds, self.total),
        }
    }

    pub(crate) fn avg_amount(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.amount_sum / self.total as f64
    }
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub granularity: Granularity,
    pub layers: Vec<GeoLayer>,
    pub entity_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            layers: GeoLayer::default_layers(),
            entity_limit: entity::DEFAULT_ENTITY_LIMIT,
        }
    }
}

/// One full recomputation: a single filter pass fanned out to every view.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot<'a> {
    pub view: FilteredView<'a>,
    pub kpis: Kpis,
    pub timeline: Vec<TimeBucket>,
    pub distribution: Vec<LabelDistribution>,
    pub regions: BTreeMap<String, CountSummary>,
    pub entities: EntityBreakdown,
    pub patterns: TemporalPatterns,
    pub geo: GeoSummary,
}

pub fn compute_dashboard<'a>(
    store: &'a RecordStore,
    spec: &FilterSpec,
    options: &DashboardOptions,
) -> DashboardSnapshot<'a> {
    let view = evaluate(store, spec);

    DashboardSnapshot {
        kpis: kpi::summarize(&view),
        timeline: temporal::aggregate(&view, options.granularity),
        distribution: distribution::aggregate(&view),
        regions: regional::aggregate(&view),
        entities: entity::aggregate(&view, options.entity_limit),
        patterns: patterns::aggregate(&view),
        geo: geo::aggregate(&view, &options.layers),
        view,
    }
}

#[cfg(test)]
pub(crate) mod testkit {
    use chrono::NaiveDate;

    use crate::store::{GeoPoint, TransactionRecord};

    pub(crate) fn record(
        date: (i32, u32, u32),
        hour: u32,
        amount: f64,
        is_fraud: bool,
        region: Option<&str>,
    ) -> TransactionRecord {
        TransactionRecord {
            timestamp: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .and_then(|value| value.and_hms_opt(hour, 0, 0)),
            amount,
            amount_coerced: false,
            is_fraud,
            merchant: Some("Kirlin and Sons".to_string()),
            category: Some("grocery_pos".to_string()),
            region_code: region.map(str::to_string),
            city: Some("Moravian Falls".to_string()),
            customer_location: Some(GeoPoint {
                lat: 36.0788,
                lon: -81.1781,
            }),
            merchant_location: None,
            card_number: None,
            transaction_id: None,
            source_row: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testkit::record;
    use super::{DashboardOptions, compute_dashboard};
    use crate::filter::FilterSpec;
    use crate::store::RecordStore;

    #[test]
    fn snapshot_views_agree_on_counts() {
        let mut records = vec![
            record((2023, 1, 1), 9, 50.0, false, Some("CA")),
            record((2023, 1, 2), 23, 9999.0, true, Some("CA")),
            record((2023, 2, 1), 0, 20.0, false, None),
        ];
        records[1].timestamp = None;
        let store = RecordStore::from_records(records);

        let snapshot =
            compute_dashboard(&store, &FilterSpec::unrestricted(), &DashboardOptions::default());
        assert_eq!(snapshot.view.len(), 2);
        assert_eq!(snapshot.kpis.transactions, 2);
        let timeline_total = snapshot
            .timeline
            .iter()
            .map(|bucket| bucket.total)
            .sum::<u64>();
        assert_eq!(timeline_total, 2);
        let region_total = snapshot
            .regions
            .values()
            .map(|summary| summary.total)
            .sum::<u64>();
        assert_eq!(region_total, 1);
    }

    #[test]
    fn empty_view_yields_zeroed_summaries() {
        let store = RecordStore::default();
        let snapshot =
            compute_dashboard(&store, &FilterSpec::unrestricted(), &DashboardOptions::default());
        assert!(snapshot.view.is_empty());
        assert_eq!(snapshot.kpis.fraud_rate_pct, 0.0);
        assert_eq!(snapshot.kpis.avg_amount, 0.0);
        assert!(snapshot.timeline.is_empty());
        assert!(snapshot.regions.is_empty());
        assert!(snapshot.distribution.is_empty());
        assert!(snapshot.geo.layers.is_empty());
    }
}
