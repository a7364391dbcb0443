use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{
    ApiError, ChartDataResponse, ErrorResponse, MetricsResponse, PredictionResponse,
    StatusResponse, TftResponse,
};

/// HTTP client for the dashboard backend
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http_client: HttpClient,
    base_url: String,
}

impl DashboardClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:5000";

    /// Create a new client against `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        // The backend answers errors as {"error": "..."}
        let message = serde_json::from_str::<ErrorResponse>(&body_text)
            .ok()
            .and_then(|e| e.error.or(e.message))
            .unwrap_or(body_text);

        match status_code {
            400 => ApiError::BadRequest(message),
            404 => ApiError::NotFound(message),
            500..=599 => {
                warn!("Server error {}: {}", status_code, message);
                ApiError::ServerError(status_code, message)
            }
            _ => ApiError::HttpError(status_code, message),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let mut request = self.http_client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    /// GET a raw HTML fragment such as /navbar or /footer
    pub async fn get_fragment(&self, path: &str) -> Result<String, ApiError> {
        let url = self.url(path);
        debug!("GET {}", url);

        self.send(self.http_client.get(&url))
            .await?
            .text()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to read body: {}", e)))
    }

    /// GET /get_metrics/{category}
    pub async fn get_metrics(&self, category: &str) -> Result<MetricsResponse, ApiError> {
        self.get_json(&format!("get_metrics/{}", category), &[]).await
    }

    /// GET /get_chart_data?category=..&metric=..
    pub async fn get_chart_data(
        &self,
        category: &str,
        metric: &str,
    ) -> Result<ChartDataResponse, ApiError> {
        self.get_json(
            "get_chart_data",
            &[("category", category.to_string()), ("metric", metric.to_string())],
        )
        .await
    }

    /// GET /predict_and_plot
    ///
    /// # Arguments
    /// * `lengths` - `Some((max_encoder_length, max_prediction_length))` for the
    ///   parameterized form, `None` for the combined form
    pub async fn predict_and_plot(
        &self,
        lengths: Option<(u32, u32)>,
    ) -> Result<PredictionResponse, ApiError> {
        let query = match lengths {
            Some((encoder, prediction)) => vec![
                ("max_encoder_length", encoder.to_string()),
                ("max_prediction_length", prediction.to_string()),
            ],
            None => Vec::new(),
        };
        self.get_json("predict_and_plot", &query).await
    }

    /// GET /get_tft_predictions
    pub async fn get_tft_predictions(&self) -> Result<TftResponse, ApiError> {
        self.get_json("get_tft_predictions", &[]).await
    }

    /// GET /load_data
    pub async fn load_data(&self) -> Result<StatusResponse, ApiError> {
        self.get_json("load_data", &[]).await
    }

    /// POST /update_data
    ///
    /// Rebuilds the server-side dataset, so it gets its own `timeout` instead
    /// of the client-wide one.
    pub async fn update_data(&self, timeout: Duration) -> Result<StatusResponse, ApiError> {
        let url = self.url("update_data");
        debug!("POST {} (timeout {:?})", url, timeout);

        self.send(self.http_client.post(&url).timeout(timeout))
            .await?
            .json::<StatusResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}
