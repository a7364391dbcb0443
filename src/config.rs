//! Environment-driven configuration
//!
//! Every knob has a default so the dashboard runs against a local backend
//! with no `.env` at all.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::api::dashboard::DashboardClient;
use crate::models::Category;
use crate::utils::DashboardError;

/// Which prediction endpoint the prediction view reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionSource {
    /// /predict_and_plot with encoder and prediction lengths
    Parameterized {
        max_encoder_length: u32,
        max_prediction_length: u32,
    },
    /// /predict_and_plot without parameters
    Combined,
    /// /get_tft_predictions
    Tft,
}

impl Default for PredictionSource {
    fn default() -> Self {
        PredictionSource::Parameterized {
            max_encoder_length: 120,
            max_prediction_length: 31,
        }
    }
}

/// Fixed user-facing strings
#[derive(Debug, Clone)]
pub struct Messages {
    pub metrics_error: String,
    pub data_error: String,
    pub prediction_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            metrics_error: "Napaka pri nalaganju metrik.".to_string(),
            data_error: "Napaka pri nalaganju podatkov.".to_string(),
            prediction_error: "Napaka pri nalaganju podatkov.".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_url: String,
    /// Path of the page being shown; decides which flow bootstraps
    pub page_path: String,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
    /// Timeout of the dataset rebuild triggered by the readiness check
    pub update_timeout: Duration,
    pub prediction_source: PredictionSource,
    pub table_newest_first: bool,
    pub chart_width: u32,
    pub chart_height: u32,
    pub default_category: Category,
    pub default_metric: String,
    /// Ask the backend to refresh its dataset before showing predictions
    pub check_data_ready: bool,
    pub interactive: bool,
    /// Category id → attribution markup
    pub attributions: HashMap<String, String>,
    pub messages: Messages,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DashboardClient::DEFAULT_BASE_URL.to_string(),
            page_path: "/home".to_string(),
            output_dir: PathBuf::from("dashboard_out"),
            request_timeout: Duration::from_secs(30),
            update_timeout: Duration::from_secs(600),
            prediction_source: PredictionSource::default(),
            table_newest_first: false,
            chart_width: 1024,
            chart_height: 512,
            default_category: Category::Btc,
            default_metric: "Close".to_string(),
            check_data_ready: true,
            interactive: false,
            attributions: default_attributions(),
            messages: Messages::default(),
        }
    }
}

/// Attribution shown under the metrics chart for each known category
pub fn default_attributions() -> HashMap<String, String> {
    [
        (
            "btc",
            "Vir: <a href='https://blockchain.com' target='_blank'>Blockchain.com</a>",
        ),
        (
            "btc-etf",
            "Vir: <a href='https://www.bloomberg.com' target='_blank'>Bloomberg, BTC ETF podatki</a>",
        ),
        (
            "bea",
            "Vir: <a href='https://www.bea.gov' target='_blank'>Bureau of Economic Analysis (BEA)</a>",
        ),
        (
            "fred",
            "Vir: <a href='https://fred.stlouisfed.org' target='_blank'>FRED</a>",
        ),
        ("indicators", "Vir: Lastni indikatorji"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl DashboardConfig {
    /// Build the configuration from `DASHBOARD_*` environment variables
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DASHBOARD_BASE_URL") {
            config.base_url = url;
        }
        if let Some(path) = lookup("DASHBOARD_PAGE_PATH") {
            config.page_path = path;
        }
        if let Some(dir) = lookup("DASHBOARD_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DASHBOARD_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DASHBOARD_UPDATE_TIMEOUT_SECS")? {
            config.update_timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = parse_var::<bool>(&lookup, "DASHBOARD_TABLE_NEWEST_FIRST")? {
            config.table_newest_first = flag;
        }
        if let Some(flag) = parse_var::<bool>(&lookup, "DASHBOARD_CHECK_DATA_READY")? {
            config.check_data_ready = flag;
        }
        if let Some(flag) = parse_var::<bool>(&lookup, "DASHBOARD_INTERACTIVE")? {
            config.interactive = flag;
        }
        if let Some(width) = parse_var::<u32>(&lookup, "DASHBOARD_CHART_WIDTH")? {
            config.chart_width = width;
        }
        if let Some(height) = parse_var::<u32>(&lookup, "DASHBOARD_CHART_HEIGHT")? {
            config.chart_height = height;
        }
        if let Some(category) = lookup("DASHBOARD_DEFAULT_CATEGORY") {
            config.default_category = Category::from(category.as_str());
        }
        if let Some(metric) = lookup("DASHBOARD_DEFAULT_METRIC") {
            config.default_metric = metric;
        }

        let encoder = parse_var::<u32>(&lookup, "DASHBOARD_MAX_ENCODER_LENGTH")?.unwrap_or(120);
        let prediction = parse_var::<u32>(&lookup, "DASHBOARD_MAX_PREDICTION_LENGTH")?.unwrap_or(31);
        config.prediction_source = match lookup("DASHBOARD_PREDICTION_SOURCE").as_deref() {
            None | Some("parameterized") => PredictionSource::Parameterized {
                max_encoder_length: encoder,
                max_prediction_length: prediction,
            },
            Some("combined") => PredictionSource::Combined,
            Some("tft") => PredictionSource::Tft,
            Some(other) => {
                return Err(DashboardError::Config(format!(
                    "DASHBOARD_PREDICTION_SOURCE must be parameterized, combined or tft, got '{}'",
                    other
                )))
            }
        };

        if config.chart_width == 0 || config.chart_height == 0 {
            return Err(DashboardError::Config("Chart dimensions must be non-zero".to_string()));
        }

        Ok(config)
    }

    /// Attribution for `category`; empty when the category is unknown
    pub fn attribution_for(&self, category: &Category) -> &str {
        self.attributions
            .get(category.id())
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, DashboardError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| DashboardError::Config(format!("Invalid value for {}: '{}'", key, raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.default_category, Category::Btc);
        assert_eq!(config.default_metric, "Close");
        assert_eq!(config.prediction_source, PredictionSource::default());
        assert!(config.update_timeout > config.request_timeout);
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("DASHBOARD_BASE_URL", "http://backend:8000"),
            ("DASHBOARD_PAGE_PATH", "/data"),
            ("DASHBOARD_PREDICTION_SOURCE", "tft"),
            ("DASHBOARD_TABLE_NEWEST_FIRST", "true"),
            ("DASHBOARD_REQUEST_TIMEOUT_SECS", "5"),
            ("DASHBOARD_UPDATE_TIMEOUT_SECS", "900"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://backend:8000");
        assert_eq!(config.page_path, "/data");
        assert_eq!(config.prediction_source, PredictionSource::Tft);
        assert!(config.table_newest_first);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.update_timeout, Duration::from_secs(900));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = DashboardConfig::from_lookup(lookup_from(&[("DASHBOARD_CHART_WIDTH", "wide")]))
            .unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));

        let err = DashboardConfig::from_lookup(lookup_from(&[("DASHBOARD_PREDICTION_SOURCE", "oracle")]))
            .unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_attribution_lookup() {
        let config = DashboardConfig::default();
        assert!(config.attribution_for(&Category::BtcEtf).contains("Bloomberg"));
        assert_eq!(config.attribution_for(&Category::from("gold")), "");
    }
}
