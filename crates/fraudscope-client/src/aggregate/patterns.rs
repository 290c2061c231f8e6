use chrono::{Datelike, Timelike, Weekday};
use serde::Serialize;

use crate::filter::FilteredView;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub non_fraud: u64,
    pub fraud: u64,
}

impl LabelCounts {
    fn add(&mut self, is_fraud: bool) {
        if is_fraud {
            self.fraud += 1;
        } else {
            self.non_fraud += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.non_fraud + self.fraud
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    #[serde(flatten)]
    pub counts: LabelCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayCount {
    pub weekday: String,
    #[serde(flatten)]
    pub counts: LabelCounts,
}

/// Hour-of-day and weekday histograms split by label.
///
/// Both domains are fixed (0..=23, Monday..Sunday) and always fully present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalPatterns {
    pub hours: Vec<HourCount>,
    pub weekdays: Vec<WeekdayCount>,
}

pub fn aggregate(view: &FilteredView<'_>) -> TemporalPatterns {
    let mut hours = [LabelCounts::default(); 24];
    let mut weekdays = [LabelCounts::default(); 7];

    for record in view.iter() {
        let Some(timestamp) = record.timestamp else {
            continue;
        };
        if let Some(slot) = hours.get_mut(timestamp.hour() as usize) {
            slot.add(record.is_fraud);
        }
        if let Some(slot) = weekdays.get_mut(timestamp.weekday().num_days_from_monday() as usize) {
            slot.add(record.is_fraud);
        }
    }

    TemporalPatterns {
        hours: hours
            .iter()
            .enumerate()
            .map(|(hour, counts)| HourCount {
                hour: hour as u32,
                counts: *counts,
            })
            .collect(),
        weekdays: WEEKDAYS
            .iter()
            .zip(weekdays.iter())
            .map(|(weekday, counts)| WeekdayCount {
                weekday: weekday_name(*weekday).to_string(),
                counts: *counts,
            })
            .collect(),
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::aggregate;
    use crate::aggregate::testkit::record;
    use crate::filter::{FilterSpec, evaluate};
    use crate::store::RecordStore;

    #[test]
    fn counts_hours_and_weekdays_by_label() {
        // 2023-01-01 is a Sunday, 2023-01-02 a Monday.
        let store = RecordStore::from_records(vec![
            record((2023, 1, 1), 23, 1.0, true, None),
            record((2023, 1, 2), 23, 1.0, false, None),
            record((2023, 1, 2), 3, 1.0, false, None),
        ]);
        let view = evaluate(&store, &FilterSpec::unrestricted());
        let patterns = aggregate(&view);

        assert_eq!(patterns.hours.len(), 24);
        assert_eq!(patterns.hours[23].counts.fraud, 1);
        assert_eq!(patterns.hours[23].counts.non_fraud, 1);
        assert_eq!(patterns.hours[3].counts.total(), 1);
        assert_eq!(patterns.hours[0].counts.total(), 0);

        assert_eq!(patterns.weekdays.len(), 7);
        assert_eq!(patterns.weekdays[0].weekday, "Monday");
        assert_eq!(patterns.weekdays[0].counts.non_fraud, 2);
        assert_eq!(patterns.weekdays[6].weekday, "Sunday");
        assert_eq!(patterns.weekdays[6].counts.fraud, 1);
    }
}
