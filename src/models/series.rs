//! Time-series models

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::utils::DashboardError;

/// A single (date, value) pair; the value may be missing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// An ordered metric series as supplied by the backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    points: Vec<MetricPoint>,
}

impl MetricSeries {
    /// Build a series from the parallel `dates`/`values` columns of the wire form
    pub fn from_columns(dates: &[String], values: &[Option<f64>]) -> Result<Self, DashboardError> {
        if dates.len() != values.len() {
            return Err(DashboardError::Payload(format!(
                "{} dates but {} values",
                dates.len(),
                values.len()
            )));
        }

        let points = dates
            .iter()
            .zip(values)
            .map(|(date, value)| {
                Ok(MetricPoint {
                    date: parse_date(date)?,
                    value: *value,
                })
            })
            .collect::<Result<Vec<_>, DashboardError>>()?;

        Ok(Self { points })
    }

    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Parse a backend date
///
/// Accepts `YYYY-MM-DD`, ISO date-times and the RFC 2822 form Flask uses
/// when it serializes timestamps (`Mon, 01 Jan 2024 00:00:00 GMT`).
pub fn parse_date(raw: &str) -> Result<NaiveDate, DashboardError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Ok(dt.date_naive());
    }

    Err(DashboardError::Payload(format!("Unrecognized date '{}'", raw)))
}
