use std::collections::BTreeMap;

use crate::aggregate::{CountSummary, Tally};
use crate::filter::FilteredView;

/// Counts per region code; records without a region are not counted.
pub fn aggregate(view: &FilteredView<'_>) -> BTreeMap<String, CountSummary> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    for record in view.iter() {
        let Some(region) = record.region_code.as_ref() else {
            continue;
        };
        tallies.entry(region.clone()).or_default().add(record);
    }

    tallies
        .into_iter()
        .map(|(region, tally)| (region, tally.summary()))
        .collect()
}
