use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::Tally;
use crate::filter::FilteredView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    /// Start of the period containing `date`; weeks run Monday through Sunday.
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Self::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeBucket {
    pub period_start: NaiveDate,
    pub total: u64,
    pub frauds: u64,
    pub fraud_rate: f64,
    pub avg_amount: f64,
}

/// Sparse and chronological: periods without records are absent, not zero.
pub fn aggregate(view: &FilteredView<'_>, granularity: Granularity) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    for record in view.iter() {
        let Some(date) = record.date() else {
            continue;
        };
        buckets
            .entry(granularity.truncate(date))
            .or_default()
            .add(record);
    }

    buckets
        .into_iter()
        .map(|(period_start, tally)| {
            let counts = tally.summary();
            TimeBucket {
                period_start,
                total: counts.total,
                frauds: counts.frauds,
                fraud_rate: counts.fraud_rate,
                avg_amount: tally.avg_amount(),
            }
        })
        .collect()
}
