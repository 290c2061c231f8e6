use std::cmp;

use serde_json::Value;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub const fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);
    cmp::max(from_env, 40)
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Aligned table, or one labelled block per row when the table would not
/// fit in `max_width`.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let widths = natural_column_widths(columns, rows);
    let table_width = INDENT
        + widths.iter().sum::<usize>()
        + COLUMN_GAP * columns.len().saturating_sub(1);
    if table_width > max_width {
        return render_blocks(columns, rows, block_label);
    }

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_row(columns, &header, &widths)];
    output.extend(rows.iter().map(|row| format_row(columns, row, &widths)));
    output
}

fn natural_column_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = columns
        .iter()
        .map(|column| column.name.chars().count())
        .collect::<Vec<usize>>();

    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(slot) = widths.get_mut(index) {
                *slot = cmp::max(*slot, value.chars().count());
            }
        }
    }

    widths
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let rendered = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, width))| {
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            match column.align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            }
        })
        .collect::<Vec<String>>()
        .join(&" ".repeat(COLUMN_GAP));
    format!("{}{}", " ".repeat(INDENT), rendered.trim_end())
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);

    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", row_index + 1));
        for (column_index, label) in labels.iter().enumerate() {
            let value = row.get(column_index).map(String::as_str).unwrap_or("");
            output.push(format!("    {label:<label_width$}  {value}"));
        }
    }
    output
}

pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn u64_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

pub fn f64_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

pub fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_money(value: f64) -> String {
    format!("${value:.2}")
}

/// `ratio` is a 0..1 fraction.
pub fn format_rate(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::{
        Column, format_count, format_money, format_rate, key_value_rows, render_table_or_blocks,
    };

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(
            &[
                ("Rows:", "100".to_string()),
                ("Fraud rate:", "0.52%".to_string()),
            ],
            2,
        );

        assert_eq!(rows[0], "  Rows:        100");
        assert_eq!(rows[1], "  Fraud rate:  0.52%");
    }

    #[test]
    fn table_aligns_columns() {
        let columns = [Column::left("Region"), Column::right("Frauds")];
        let rows = vec![
            vec!["NY".to_string(), "12".to_string()],
            vec!["CA".to_string(), "7".to_string()],
        ];

        let rendered = render_table_or_blocks(&columns, &rows, 80, "Region");
        assert_eq!(rendered[0], "  Region  Frauds");
        assert_eq!(rendered[1], "  NY          12");
        assert_eq!(rendered[2], "  CA           7");
    }

    #[test]
    fn narrow_width_falls_back_to_blocks() {
        let columns = [Column::left("Merchant"), Column::right("Count")];
        let rows = vec![vec!["Kirlin and Sons".to_string(), "3".to_string()]];

        let rendered = render_table_or_blocks(&columns, &rows, 10, "Entity");
        assert_eq!(rendered[0], "  Entity 1:");
        assert_eq!(rendered[1], "    Merchant:  Kirlin and Sons");
        assert_eq!(rendered[2], "    Count:     3");
    }

    #[test]
    fn numbers_render_for_people() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(1234), "1,234");
        assert_eq!(format_count(1_296_675), "1,296,675");
        assert_eq!(format_money(4.5), "$4.50");
        assert_eq!(format_rate(0.0052), "0.52%");
    }
}
