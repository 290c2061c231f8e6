use std::io;

use serde_json::Value;

use super::format::{
    self, Column, array_field, f64_field, format_count, format_money, format_rate, str_field,
    u64_field,
};

const TIMELINE_TAIL: usize = 14;
const TEXT_ENTITY_ROWS: usize = 10;
const TEXT_SNAPSHOT_ROWS: usize = 10;

pub fn render_dashboard(data: &Value) -> io::Result<String> {
    let kpis = data
        .get("kpis")
        .ok_or_else(|| io::Error::other("dashboard output requires kpis"))?;

    if data.get("halted").and_then(Value::as_bool).unwrap_or(false) {
        return Ok([
            "No transactions loaded.",
            "",
            "None of the configured sources produced any rows. Check the paths with",
            "`--source <path>` or `dashboard.sources` and run the command again.",
        ]
        .join("\n"));
    }

    let width = format::terminal_width();
    let mut lines = vec![heading(data), String::new(), "Overview:".to_string()];
    lines.extend(format::key_value_rows(
        &[
            ("Transactions:", format_count(u64_field(kpis, "transactions"))),
            ("Frauds:", format_count(u64_field(kpis, "frauds"))),
            (
                "Fraud rate:",
                format!("{:.2}%", f64_field(kpis, "fraud_rate_pct")),
            ),
            ("Average amount:", format_money(f64_field(kpis, "avg_amount"))),
            (
                "Merchants:",
                format_count(u64_field(kpis, "unique_merchants")),
            ),
        ],
        2,
    ));

    if u64_field(data, "view_rows") == 0 {
        lines.push(String::new());
        lines.push("No transactions match the current filters.".to_string());
        return Ok(lines.join("\n"));
    }

    push_timeline(&mut lines, data, width);
    push_distribution(&mut lines, data, width);
    push_regions(&mut lines, data, width);
    push_entities(&mut lines, data, width);
    push_patterns(&mut lines, data, width);
    push_geo(&mut lines, data);
    push_snapshot(&mut lines, data, width);

    Ok(lines.join("\n"))
}

fn heading(data: &Value) -> String {
    let filters = data.get("filters").unwrap_or(&Value::Null);
    let dates = filters.get("dates").unwrap_or(&Value::Null);
    let label = str_field(filters, "label_mode");
    let mut text = format!(
        "Fraud dashboard: {} of {} transactions, {} to {}",
        format_count(u64_field(data, "view_rows")),
        format_count(u64_field(data, "store_rows")),
        str_field(dates, "start"),
        str_field(dates, "end"),
    );
    if !label.is_empty() && label != "both" {
        text.push_str(&format!(" ({label})"));
    }
    text
}

fn push_section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
}

fn push_timeline(lines: &mut Vec<String>, data: &Value, width: usize) {
    let buckets = array_field(data, "timeline");
    let skipped = buckets.len().saturating_sub(TIMELINE_TAIL);
    push_section(
        lines,
        &format!("Timeline by {}:", str_field(data, "granularity")),
    );
    if skipped > 0 {
        lines.push(format!("  ({skipped} earlier periods not shown)"));
    }

    let rows = buckets
        .iter()
        .skip(skipped)
        .map(|bucket| {
            vec![
                str_field(bucket, "period_start").to_string(),
                format_count(u64_field(bucket, "total")),
                format_count(u64_field(bucket, "frauds")),
                format_rate(f64_field(bucket, "fraud_rate")),
                format_money(f64_field(bucket, "avg_amount")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Period"),
            Column::right("Total"),
            Column::right("Frauds"),
            Column::right("Rate"),
            Column::right("Avg Amount"),
        ],
        &rows,
        width,
        "Period",
    ));
}

fn push_distribution(lines: &mut Vec<String>, data: &Value, width: usize) {
    push_section(lines, "Amount distribution:");
    let rows = array_field(data, "distribution")
        .iter()
        .map(|group| {
            let summary = group.get("summary").unwrap_or(&Value::Null);
            let label = if group.get("is_fraud").and_then(Value::as_bool) == Some(true) {
                "fraud"
            } else {
                "non-fraud"
            };
            vec![
                label.to_string(),
                format_count(u64_field(summary, "count")),
                format_money(f64_field(summary, "min")),
                format_money(f64_field(summary, "q1")),
                format_money(f64_field(summary, "median")),
                format_money(f64_field(summary, "q3")),
                format_money(f64_field(summary, "max")),
                format_count(array_field(summary, "outliers").len() as u64),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Label"),
            Column::right("Count"),
            Column::right("Min"),
            Column::right("Q1"),
            Column::right("Median"),
            Column::right("Q3"),
            Column::right("Max"),
            Column::right("Outliers"),
        ],
        &rows,
        width,
        "Group",
    ));
}

fn push_regions(lines: &mut Vec<String>, data: &Value, width: usize) {
    let Some(regions) = data.get("regions").and_then(Value::as_object) else {
        return;
    };
    push_section(lines, "Fraud by region:");

    let mut ranked = regions.iter().collect::<Vec<(&String, &Value)>>();
    ranked.sort_by(|left, right| {
        u64_field(right.1, "frauds")
            .cmp(&u64_field(left.1, "frauds"))
            .then_with(|| left.0.cmp(right.0))
    });
    let rows = ranked
        .into_iter()
        .map(|(code, summary)| {
            vec![
                code.clone(),
                format_count(u64_field(summary, "total")),
                format_count(u64_field(summary, "frauds")),
                format_rate(f64_field(summary, "fraud_rate")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Region"),
            Column::right("Total"),
            Column::right("Frauds"),
            Column::right("Rate"),
        ],
        &rows,
        width,
        "Region",
    ));
}

fn push_entities(lines: &mut Vec<String>, data: &Value, width: usize) {
    let entities = data.get("entities").unwrap_or(&Value::Null);
    let pairs = array_field(entities, "rows");
    if pairs.is_empty() {
        return;
    }
    push_section(
        lines,
        &format!(
            "Top merchants and categories ({} distinct pairs):",
            format_count(u64_field(entities, "distinct_pairs"))
        ),
    );

    let rows = pairs
        .iter()
        .take(TEXT_ENTITY_ROWS)
        .map(|pair| {
            vec![
                str_field(pair, "category").to_string(),
                str_field(pair, "merchant").to_string(),
                format_count(u64_field(pair, "count")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Category"),
            Column::left("Merchant"),
            Column::right("Count"),
        ],
        &rows,
        width,
        "Pair",
    ));
}

fn push_patterns(lines: &mut Vec<String>, data: &Value, width: usize) {
    let patterns = data.get("patterns").unwrap_or(&Value::Null);
    push_section(lines, "Activity by weekday:");

    let rows = array_field(patterns, "weekdays")
        .iter()
        .map(|day| {
            vec![
                str_field(day, "weekday").to_string(),
                format_count(u64_field(day, "non_fraud")),
                format_count(u64_field(day, "fraud")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Weekday"),
            Column::right("Non-fraud"),
            Column::right("Fraud"),
        ],
        &rows,
        width,
        "Weekday",
    ));

    let busiest = array_field(patterns, "hours")
        .iter()
        .max_by_key(|hour| (u64_field(hour, "fraud"), std::cmp::Reverse(u64_field(hour, "hour"))));
    if let Some(hour) = busiest
        && u64_field(hour, "fraud") > 0
    {
        lines.push(format!(
            "  Peak fraud hour: {:02}:00 ({} frauds)",
            u64_field(hour, "hour"),
            format_count(u64_field(hour, "fraud"))
        ));
    }
}

fn push_geo(lines: &mut Vec<String>, data: &Value) {
    let geo = data.get("geo").unwrap_or(&Value::Null);
    let center = geo.get("center").unwrap_or(&Value::Null);
    push_section(lines, "Map:");
    lines.push(format!(
        "  Center:  {:.4}, {:.4}",
        f64_field(center, "lat"),
        f64_field(center, "lon")
    ));
    let layers = array_field(geo, "layers");
    if layers.is_empty() {
        lines.push("  No located transactions for the selected layers.".to_string());
    }
    for layer in layers {
        lines.push(format!(
            "  {}:  {} points",
            str_field(layer, "layer"),
            format_count(array_field(layer, "points").len() as u64)
        ));
    }
}

fn push_snapshot(lines: &mut Vec<String>, data: &Value, width: usize) {
    let snapshot = array_field(data, "snapshot");
    if snapshot.is_empty() {
        return;
    }
    push_section(lines, "Sample transactions:");

    let rows = snapshot
        .iter()
        .take(TEXT_SNAPSHOT_ROWS)
        .map(|row| {
            vec![
                str_field(row, "timestamp").to_string(),
                str_field(row, "merchant").to_string(),
                format_money(f64_field(row, "amount")),
                str_field(row, "region").to_string(),
                if row.get("is_fraud").and_then(Value::as_bool) == Some(true) {
                    "yes".to_string()
                } else {
                    "no".to_string()
                },
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Time"),
            Column::left("Merchant"),
            Column::right("Amount"),
            Column::left("Region"),
            Column::left("Fraud"),
        ],
        &rows,
        width,
        "Transaction",
    ));
}
