use serde::Serialize;

use crate::filter::FilteredView;
use crate::stats::{quantile_sorted, sorted_copy};

const FENCE_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDistribution {
    pub is_fraud: bool,
    /// Ascending amounts of the group, kept for downstream quantile work.
    #[serde(skip_serializing)]
    pub amounts: Vec<f64>,
    pub summary: BoxSummary,
}

/// Non-fraud group first, then fraud; a label with no records is left out.
pub fn aggregate(view: &FilteredView<'_>) -> Vec<LabelDistribution> {
    let mut legit = Vec::new();
    let mut fraud = Vec::new();
    for record in view.iter() {
        if record.is_fraud {
            fraud.push(record.amount);
        } else {
            legit.push(record.amount);
        }
    }

    [(false, legit), (true, fraud)]
        .into_iter()
        .filter_map(|(is_fraud, amounts)| {
            let sorted = sorted_copy(&amounts);
            let summary = box_summary(&sorted)?;
            Some(LabelDistribution {
                is_fraud,
                amounts: sorted,
                summary,
            })
        })
        .collect()
}

/// Five-number summary plus points beyond 1.5 x IQR; `sorted` must be ascending.
pub fn box_summary(sorted: &[f64]) -> Option<BoxSummary> {
    let min = *sorted.first()?;
    let max = *sorted.last()?;
    let q1 = quantile_sorted(sorted, 0.25)?;
    let median = quantile_sorted(sorted, 0.5)?;
    let q3 = quantile_sorted(sorted, 0.75)?;
    let spread = q3 - q1;
    let lower_fence = q1 - FENCE_MULTIPLIER * spread;
    let upper_fence = q3 + FENCE_MULTIPLIER * spread;
    let outliers = sorted
        .iter()
        .copied()
        .filter(|value| *value < lower_fence || *value > upper_fence)
        .collect::<Vec<f64>>();

    Some(BoxSummary {
        count: sorted.len(),
        min,
        q1,
        median,
        q3,
        max,
        lower_fence,
        upper_fence,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::{aggregate, box_summary};
    use crate::aggregate::testkit::record;
    use crate::filter::{FilterSpec, evaluate};
    use crate::store::RecordStore;

    #[test]
    fn flags_points_beyond_the_fences() {
        let summary = box_summary(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        assert!(summary.is_some());
        if let Some(value) = summary {
            assert_eq!(value.min, 1.0);
            assert_eq!(value.q1, 2.25);
            assert_eq!(value.median, 3.5);
            assert_eq!(value.q3, 4.75);
            assert_eq!(value.max, 100.0);
            assert_eq!(value.outliers, vec![100.0]);
        }
        assert!(box_summary(&[]).is_none());
    }

    #[test]
    fn groups_by_label_with_sorted_amounts() {
        let store = RecordStore::from_records(vec![
            record((2023, 1, 1), 1, 30.0, false, None),
            record((2023, 1, 1), 1, 10.0, false, None),
            record((2023, 1, 1), 1, 700.0, true, None),
        ]);
        let view = evaluate(&store, &FilterSpec::unrestricted());
        let groups = aggregate(&view);

        assert_eq!(groups.len(), 2);
        assert!(!groups[0].is_fraud);
        assert_eq!(groups[0].amounts, vec![10.0, 30.0]);
        assert!(groups[1].is_fraud);
        assert_eq!(groups[1].summary.count, 1);
        assert_eq!(groups[1].summary.median, 700.0);
    }
}
