use std::collections::HashSet;

use serde::Serialize;

use crate::aggregate::Tally;
use crate::filter::FilteredView;

/// Header figures for the current view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub transactions: u64,
    pub frauds: u64,
    pub fraud_rate_pct: f64,
    pub avg_amount: f64,
    pub unique_merchants: usize,
}

pub fn summarize(view: &FilteredView<'_>) -> Kpis {
    let mut tally = Tally::default();
    let mut merchants: HashSet<&str> = HashSet::new();
    for record in view.iter() {
        tally.add(record);
        if let Some(merchant) = record.merchant.as_deref() {
            merchants.insert(merchant);
        }
    }

    let counts = tally.summary();
    Kpis {
        transactions: counts.total,
        frauds: counts.frauds,
        fraud_rate_pct: counts.fraud_rate * 100.0,
        avg_amount: tally.avg_amount(),
        unique_merchants: merchants.len(),
    }
}
