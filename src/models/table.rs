//! Tabular view of a metric series

use chrono::NaiveDate;

use super::series::MetricSeries;
use crate::utils::{html_escape, Table};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// One row per (date, value) pair of the loaded series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    rows: Vec<TableRow>,
}

impl DataTable {
    /// Build the table in series order, or most-recent-first
    pub fn from_series(series: &MetricSeries, newest_first: bool) -> Self {
        let mut rows: Vec<TableRow> = series
            .points()
            .iter()
            .map(|p| TableRow { date: p.date, value: p.value })
            .collect();

        if newest_first {
            // stable, so equal dates keep their relative order
            rows.sort_by(|a, b| b.date.cmp(&a.date));
        }

        Self { rows }
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `<tr>` rows for the table body
    pub fn to_html(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                format!(
                    "<tr><td>{}</td><td>{}</td></tr>",
                    row.date.format("%Y-%m-%d"),
                    html_escape(&format_value(row.value))
                )
            })
            .collect()
    }

    /// Aligned plain-text rendering for the terminal
    pub fn to_text(&self) -> String {
        let mut table = Table::new(vec!["Date", "Value"]);
        for row in &self.rows {
            let date = row.date.format("%Y-%m-%d").to_string();
            let value = format_value(row.value);
            table.add_row(vec![date.as_str(), value.as_str()]);
        }
        table.render()
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}
