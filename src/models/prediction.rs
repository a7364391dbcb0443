//! Prediction models

use chrono::NaiveDate;

/// Historical close for one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

/// Predicted median and confidence bounds for one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedPoint {
    pub date: NaiveDate,
    pub median: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Historical and predicted series as received, nulls included
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionDataset {
    pub historical: Vec<HistoricalPoint>,
    pub predicted: Vec<PredictedPoint>,
}

/// Padded y-axis bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Everything the prediction chart needs, already merged onto one axis
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPlot {
    /// Union of all dates in both filtered series, ascending
    pub domain: Vec<NaiveDate>,
    pub range: ValueRange,
    pub historical: Vec<(NaiveDate, f64)>,
    pub median: Vec<(NaiveDate, f64)>,
    pub upper: Vec<(NaiveDate, f64)>,
    pub lower: Vec<(NaiveDate, f64)>,
}
