use std::io;

use serde_json::Value;

use super::format::{
    self, Column, array_field, f64_field, format_count, str_field, u64_field,
};

pub fn render_validate(data: &Value) -> io::Result<String> {
    let ok = data
        .get("ok")
        .and_then(Value::as_bool)
        .ok_or_else(|| io::Error::other("validate output requires ok"))?;

    let mut lines = vec![
        if ok {
            "Schema validation passed.".to_string()
        } else {
            "Schema validation failed.".to_string()
        },
        String::new(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Dataset:", str_field(data, "data_path").to_string()),
            ("Status file:", str_field(data, "status_file").to_string()),
        ],
        2,
    ));

    for (title, key) in [
        ("Missing columns:", "missing"),
        ("Unexpected columns:", "unexpected"),
    ] {
        let names = array_field(data, key);
        if names.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(title.to_string());
        lines.extend(
            names
                .iter()
                .filter_map(Value::as_str)
                .map(|name| format!("  - {name}")),
        );
    }

    if !ok {
        lines.push(String::new());
        lines.push("`fraudscope transform` stays blocked until this check passes.".to_string());
    }
    Ok(lines.join("\n"))
}

pub fn render_transform(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_u64)
        .ok_or_else(|| io::Error::other("transform output requires rows"))?;

    let mut lines = vec![
        format!(
            "Transformed {} rows from {}.",
            format_count(rows),
            str_field(data, "data_path")
        ),
        String::new(),
        "Split:".to_string(),
    ];
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Set"),
            Column::right("Rows"),
            Column::right("Frauds"),
            Column::left("File"),
        ],
        &[
            vec![
                "train".to_string(),
                format_count(u64_field(data, "train_rows")),
                format_count(u64_field(data, "train_frauds")),
                str_field(data, "train_path").to_string(),
            ],
            vec![
                "test".to_string(),
                format_count(u64_field(data, "test_rows")),
                format_count(u64_field(data, "test_frauds")),
                str_field(data, "test_path").to_string(),
            ],
        ],
        format::terminal_width(),
        "Set",
    ));
    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[
            ("Cleaned data:", str_field(data, "cleaned_path").to_string()),
            (
                "Columns:",
                format_count(array_field(data, "columns").len() as u64),
            ),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

pub fn render_stats(data: &Value) -> io::Result<String> {
    let metrics = data
        .get("profile")
        .and_then(|profile| profile.get("metrics"))
        .ok_or_else(|| io::Error::other("stats output requires profile metrics"))?;

    let mut lines = vec![
        format!(
            "Profiled {} ({}).",
            str_field(data, "data_path"),
            str_field(data, "run_id")
        ),
        String::new(),
        "Metrics:".to_string(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Rows:", format_count(u64_field(metrics, "rows"))),
            ("Columns:", format_count(u64_field(metrics, "columns"))),
            (
                "Missing values:",
                format_count(u64_field(metrics, "total_missing_values")),
            ),
            ("Frauds:", format_count(u64_field(metrics, "fraud_count"))),
            (
                "Fraud share:",
                format!("{:.2}%", f64_field(metrics, "fraud_percentage")),
            ),
            (
                "Merchants:",
                format_count(u64_field(metrics, "unique_merchants")),
            ),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push("Artifacts:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Describe:", str_field(data, "describe_path").to_string()),
            ("Missing:", str_field(data, "missing_path").to_string()),
            ("Metrics:", str_field(data, "metrics_path").to_string()),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

pub fn render_export(data: &Value) -> io::Result<String> {
    let path = data
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("export output requires path"))?;

    Ok(format!(
        "Exported {} of {} transactions to {path}.",
        format_count(u64_field(data, "rows")),
        format_count(u64_field(data, "store_rows")),
    ))
}
