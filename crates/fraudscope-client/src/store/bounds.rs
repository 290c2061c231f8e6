use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::{quantile_sorted, sorted_copy};
use crate::store::RecordStore;

pub const DEFAULT_AMOUNT_UPPER_QUANTILE: f64 = 0.995;
pub const DEFAULT_MERCHANT_OPTION_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct BoundsOptions {
    pub amount_upper_quantile: f64,
    pub merchant_option_limit: usize,
}

impl Default for BoundsOptions {
    fn default() -> Self {
        Self {
            amount_upper_quantile: DEFAULT_AMOUNT_UPPER_QUANTILE,
            merchant_option_limit: DEFAULT_MERCHANT_OPTION_LIMIT,
        }
    }
}

/// Whole-store extents that seed filter defaults and widget ranges.
///
/// `amount_default_max` is the upper quantile so a handful of extreme amounts
/// do not stretch the default range; `amount_ceiling` stays the true maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreBounds {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
    pub amount_min: f64,
    pub amount_default_max: f64,
    pub amount_ceiling: f64,
    pub region_options: Vec<String>,
    pub merchant_options: Vec<String>,
}

pub(crate) fn compute(store: &RecordStore, options: BoundsOptions) -> StoreBounds {
    let records = store.records();

    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;
    for date in records.iter().filter_map(|record| record.date()) {
        earliest = Some(earliest.map_or(date, |current| current.min(date)));
        latest = Some(latest.map_or(date, |current| current.max(date)));
    }

    let amounts = sorted_copy(
        &records
            .iter()
            .map(|record| record.amount)
            .collect::<Vec<f64>>(),
    );
    let amount_min = amounts.first().copied().unwrap_or(0.0);
    let amount_ceiling = amounts.last().copied().unwrap_or(0.0);
    let amount_default_max =
        quantile_sorted(&amounts, options.amount_upper_quantile).unwrap_or(amount_ceiling);

    let region_options = records
        .iter()
        .filter_map(|record| record.region_code.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect::<Vec<String>>();
    let merchant_options = records
        .iter()
        .filter_map(|record| record.merchant.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .take(options.merchant_option_limit)
        .collect::<Vec<String>>();

    StoreBounds {
        earliest,
        latest,
        amount_min,
        amount_default_max,
        amount_ceiling,
        region_options,
        merchant_options,
    }
}
