use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of GET /get_metrics/{category}
///
/// `metrics` is kept as raw JSON so a non-sequence value can be reported as
/// a shape error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of GET /get_chart_data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataResponse {
    #[serde(default)]
    pub dates: Option<Vec<String>>,
    #[serde(default)]
    pub values: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One historical row from /predict_and_plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Close", default)]
    pub close: Option<f64>,
}

/// One predicted row from /predict_and_plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Predicted_Median", default)]
    pub predicted_median: Option<f64>,
    #[serde(rename = "Lower_Bound", default)]
    pub lower_bound: Option<f64>,
    #[serde(rename = "Upper_Bound", default)]
    pub upper_bound: Option<f64>,
}

/// Body of GET /predict_and_plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub historical: Option<Vec<HistoricalRecord>>,
    #[serde(default)]
    pub predicted: Option<Vec<PredictedRecord>>,
}

/// Body of GET /get_tft_predictions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TftResponse {
    #[serde(default)]
    pub dates: Option<Vec<String>>,
    #[serde(default)]
    pub actual: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub predicted: Option<Vec<Option<f64>>>,
}

/// Body of GET /load_data and POST /update_data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Error response from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Comprehensive error type for API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
