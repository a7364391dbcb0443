use tracing::{debug, info};

use crate::api::dashboard::{DashboardClient, MetricsResponse};
use crate::models::{Action, Category};
use crate::utils::DashboardError;
use crate::view::Selector;

/// One selector per known category, in display order
pub fn category_selectors() -> Vec<Selector> {
    Category::ALL
        .iter()
        .map(|category| Selector {
            label: category.label(),
            action: Action::SelectCategory(category.clone()),
        })
        .collect()
}

/// One selector per metric, in the order the server listed them
pub fn metric_selectors(category: &Category, metrics: &[String]) -> Vec<Selector> {
    metrics
        .iter()
        .map(|metric| Selector {
            label: metric.clone(),
            action: Action::SelectMetric {
                category: category.clone(),
                metric: metric.clone(),
            },
        })
        .collect()
}

/// Validate a metric list payload
///
/// `metrics` must be present and a sequence of strings; an `error` field
/// wins over anything else.
pub fn parse_metrics(response: MetricsResponse) -> Result<Vec<String>, DashboardError> {
    if let Some(error) = response.error {
        return Err(DashboardError::Payload(error));
    }

    let metrics = response
        .metrics
        .ok_or_else(|| DashboardError::Payload("missing 'metrics' field".to_string()))?;

    let items = metrics
        .as_array()
        .ok_or_else(|| DashboardError::Payload("'metrics' is not a sequence".to_string()))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| DashboardError::Payload(format!("metric name {} is not a string", item)))
        })
        .collect()
}

/// Fetch the metric names of a category
pub async fn fetch_metrics(client: &DashboardClient, category: &Category) -> Result<Vec<String>, DashboardError> {
    info!("📋 Loading metrics for {}", category);
    let response = client.get_metrics(category.id()).await?;
    let metrics = parse_metrics(response)?;
    debug!("{} metrics for {}: {:?}", metrics.len(), category, metrics);
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> MetricsResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_category_selectors_fixed_order() {
        let labels: Vec<String> = category_selectors().into_iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["INDICATORS", "BTC", "BEA", "FRED", "BTC-ETF"]);
    }

    #[test]
    fn test_parse_metrics_ok() {
        let metrics = parse_metrics(response(json!({"metrics": ["Close", "Volume"]}))).unwrap();
        assert_eq!(metrics, vec!["Close", "Volume"]);
    }

    #[test]
    fn test_parse_metrics_shape_errors() {
        assert!(parse_metrics(response(json!({}))).is_err());
        assert!(parse_metrics(response(json!({"metrics": "Close"}))).is_err());
        assert!(parse_metrics(response(json!({"metrics": [1, 2]}))).is_err());
        assert!(parse_metrics(response(json!({"error": "File not found"}))).is_err());
    }

    #[test]
    fn test_metric_selectors_keep_server_order() {
        let selectors = metric_selectors(&Category::Fred, &["B".to_string(), "A".to_string()]);
        assert_eq!(selectors[0].label, "B");
        assert_eq!(
            selectors[1].action,
            Action::SelectMetric {
                category: Category::Fred,
                metric: "A".to_string()
            }
        );
    }
}
