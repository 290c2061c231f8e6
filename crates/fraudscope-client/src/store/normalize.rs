use chrono::{NaiveDate, NaiveDateTime};

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

pub(crate) fn parse_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    let candidate = normalize_optional(value)?;
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&candidate, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Joins the split `trans_date` / `trans_time` pair back into one timestamp.
pub(crate) fn parse_split_timestamp(
    date: Option<&str>,
    time: Option<&str>,
) -> Option<NaiveDateTime> {
    let date_part = normalize_optional(date)?;
    match normalize_optional(time) {
        Some(time_part) => parse_timestamp(Some(&format!("{date_part} {time_part}"))),
        None => parse_timestamp(Some(&date_part)),
    }
}

/// Returns the amount and whether it had to be coerced to zero.
pub(crate) fn coerce_amount(value: Option<&str>) -> (f64, bool) {
    let Some(candidate) = normalize_optional(value) else {
        return (0.0, true);
    };
    match candidate.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => (amount, false),
        _ => (0.0, true),
    }
}

/// `None` means the cell cannot be read as a 0/1 label.
pub(crate) fn coerce_label(value: &str) -> Option<bool> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(integer != 0);
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Some(number.trunc() != 0.0),
        _ => None,
    }
}

pub(crate) fn coerce_coordinate(value: Option<&str>) -> Option<f64> {
    let candidate = normalize_optional(value)?;
    candidate
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::{
        coerce_amount, coerce_coordinate, coerce_label, parse_split_timestamp, parse_timestamp,
    };

    #[test]
    fn parses_dataset_timestamp_formats() {
        let parsed = parse_timestamp(Some("2019-01-01 00:00:18"));
        assert!(parsed.is_some());
        if let Some(value) = parsed {
            assert_eq!(Some(value.date()), NaiveDate::from_ymd_opt(2019, 1, 1));
            assert_eq!(value.second(), 18);
        }

        let day_first = parse_timestamp(Some("21/06/2020 12:14"));
        assert!(day_first.is_some());
        if let Some(value) = day_first {
            assert_eq!(value.hour(), 12);
        }

        assert!(parse_timestamp(Some("2023-01-02")).is_some());
    }

    #[test]
    fn unparseable_timestamps_become_none() {
        assert!(parse_timestamp(Some("yesterday")).is_none());
        assert!(parse_timestamp(Some("")).is_none());
        assert!(parse_timestamp(None).is_none());
        assert!(parse_timestamp(Some("2019-13-01 00:00:00")).is_none());
    }

    #[test]
    fn split_timestamp_recombines_date_and_time() {
        let parsed = parse_split_timestamp(Some("2019-01-01"), Some("13:05:00"));
        assert!(parsed.is_some());
        if let Some(value) = parsed {
            assert_eq!(value.hour(), 13);
        }
        assert!(parse_split_timestamp(Some("2019-01-01"), None).is_some());
        assert!(parse_split_timestamp(None, Some("13:05:00")).is_none());
    }

    #[test]
    fn amount_coercion_zeroes_bad_values() {
        assert_eq!(coerce_amount(Some("42.15")), (42.15, false));
        assert_eq!(coerce_amount(Some(" 0 ")), (0.0, false));
        assert_eq!(coerce_amount(Some("n/a")), (0.0, true));
        assert_eq!(coerce_amount(Some("-3")), (0.0, true));
        assert_eq!(coerce_amount(None), (0.0, true));
        assert_eq!(coerce_amount(Some("inf")), (0.0, true));
    }

    #[test]
    fn label_coercion_accepts_numeric_and_boolean_text() {
        assert_eq!(coerce_label("1"), Some(true));
        assert_eq!(coerce_label("0"), Some(false));
        assert_eq!(coerce_label("1.0"), Some(true));
        assert_eq!(coerce_label("True"), Some(true));
        assert_eq!(coerce_label(""), None);
        assert_eq!(coerce_label("fraud"), None);
    }

    #[test]
    fn coordinates_null_out_instead_of_failing() {
        assert_eq!(coerce_coordinate(Some("36.0788")), Some(36.0788));
        assert_eq!(coerce_coordinate(Some("north")), None);
        assert_eq!(coerce_coordinate(None), None);
    }
}
