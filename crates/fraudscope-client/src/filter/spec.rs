use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::StoreBounds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelMode {
    #[default]
    Both,
    FraudOnly,
    NonFraudOnly,
}

impl LabelMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::FraudOnly => "fraud-only",
            Self::NonFraudOnly => "non-fraud-only",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "both" => Some(Self::Both),
            "fraud-only" => Some(Self::FraudOnly),
            "non-fraud-only" => Some(Self::NonFraudOnly),
            _ => None,
        }
    }

    pub const fn admits(self, is_fraud: bool) -> bool {
        match self {
            Self::Both => true,
            Self::FraudOnly => is_fraud,
            Self::NonFraudOnly => !is_fraud,
        }
    }
}

/// Inclusive on both ends. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Inclusive on both ends. `min > max` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    pub fn contains(&self, amount: f64) -> bool {
        self.min <= amount && amount <= self.max
    }
}

/// Raw widget values; `None` and empty lists fall back to store-derived defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelections {
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub regions: Vec<String>,
    pub merchants: Vec<String>,
    pub label_mode: LabelMode,
    pub exclude_coerced_amounts: bool,
}

/// The user's current selection as a plain value.
///
/// An empty `regions` or `merchants` set means "no restriction", never
/// "exclude everything".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    pub dates: DateRange,
    pub amounts: AmountRange,
    pub regions: BTreeSet<String>,
    pub merchants: BTreeSet<String>,
    pub label_mode: LabelMode,
    pub exclude_coerced_amounts: bool,
}

impl FilterSpec {
    pub fn from_selections(bounds: &StoreBounds, selections: FilterSelections) -> Self {
        let default_start = bounds.earliest.unwrap_or(NaiveDate::MIN);
        let default_end = bounds.latest.unwrap_or(NaiveDate::MAX);

        Self {
            dates: DateRange {
                start: selections.date_start.unwrap_or(default_start),
                end: selections.date_end.unwrap_or(default_end),
            },
            amounts: AmountRange {
                min: selections.amount_min.unwrap_or(bounds.amount_min),
                max: selections.amount_max.unwrap_or(bounds.amount_default_max),
            },
            regions: clean_set(selections.regions),
            merchants: clean_set(selections.merchants),
            label_mode: selections.label_mode,
            exclude_coerced_amounts: selections.exclude_coerced_amounts,
        }
    }

    /// Admits every record that has a timestamp.
    pub fn unrestricted() -> Self {
        Self {
            dates: DateRange {
                start: NaiveDate::MIN,
                end: NaiveDate::MAX,
            },
            amounts: AmountRange {
                min: f64::NEG_INFINITY,
                max: f64::INFINITY,
            },
            regions: BTreeSet::new(),
            merchants: BTreeSet::new(),
            label_mode: LabelMode::Both,
            exclude_coerced_amounts: false,
        }
    }

    pub fn allows_region(&self, region_code: Option<&str>) -> bool {
        allows_member(&self.regions, region_code)
    }

    pub fn allows_merchant(&self, merchant: Option<&str>) -> bool {
        allows_member(&self.merchants, merchant)
    }
}

fn allows_member(allowed: &BTreeSet<String>, value: Option<&str>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    value.is_some_and(|candidate| allowed.contains(candidate))
}

fn clean_set(values: Vec<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{FilterSelections, FilterSpec, LabelMode};
    use crate::store::StoreBounds;

    fn bounds() -> StoreBounds {
        StoreBounds {
            earliest: NaiveDate::from_ymd_opt(2023, 1, 1),
            latest: NaiveDate::from_ymd_opt(2023, 2, 1),
            amount_min: 20.0,
            amount_default_max: 500.0,
            amount_ceiling: 9999.0,
            region_options: vec!["CA".to_string(), "NY".to_string()],
            merchant_options: Vec::new(),
        }
    }

    #[test]
    fn defaults_come_from_store_bounds() {
        let spec = FilterSpec::from_selections(&bounds(), FilterSelections::default());
        assert_eq!(Some(spec.dates.start), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(Some(spec.dates.end), NaiveDate::from_ymd_opt(2023, 2, 1));
        assert_eq!(spec.amounts.min, 20.0);
        assert_eq!(spec.amounts.max, 500.0);
        assert!(spec.regions.is_empty());
        assert_eq!(spec.label_mode, LabelMode::Both);
    }

    #[test]
    fn inverted_ranges_are_kept_as_given() {
        let spec = FilterSpec::from_selections(
            &bounds(),
            FilterSelections {
                date_start: NaiveDate::from_ymd_opt(2023, 3, 1),
                date_end: NaiveDate::from_ymd_opt(2023, 1, 1),
                ..FilterSelections::default()
            },
        );
        assert!(spec.dates.start > spec.dates.end);
        if let Some(date) = NaiveDate::from_ymd_opt(2023, 2, 1) {
            assert!(!spec.dates.contains(date));
        }
    }

    #[test]
    fn empty_sets_allow_everything_including_nulls() {
        let spec = FilterSpec::from_selections(&bounds(), FilterSelections::default());
        assert!(spec.allows_region(Some("TX")));
        assert!(spec.allows_region(None));

        let restricted = FilterSpec::from_selections(
            &bounds(),
            FilterSelections {
                regions: vec!["CA".to_string(), " ".to_string()],
                ..FilterSelections::default()
            },
        );
        assert_eq!(restricted.regions.len(), 1);
        assert!(restricted.allows_region(Some("CA")));
        assert!(!restricted.allows_region(Some("NY")));
        assert!(!restricted.allows_region(None));
    }

    #[test]
    fn equal_selections_build_equal_specs() {
        let left = FilterSpec::from_selections(&bounds(), FilterSelections::default());
        let right = FilterSpec::from_selections(&bounds(), FilterSelections::default());
        assert_eq!(left, right);
    }

    #[test]
    fn label_mode_parses_cli_names() {
        assert_eq!(LabelMode::parse("fraud-only"), Some(LabelMode::FraudOnly));
        assert_eq!(LabelMode::parse("non-fraud-only"), Some(LabelMode::NonFraudOnly));
        assert_eq!(LabelMode::parse("nope"), None);
        assert!(LabelMode::NonFraudOnly.admits(false));
        assert!(!LabelMode::FraudOnly.admits(false));
    }
}
