use tracing::{debug, info};

use crate::api::dashboard::{ChartDataResponse, DashboardClient};
use crate::models::{Category, ChartState, Dataset, LineStyle, MetricSeries, Rgb};
use crate::utils::DashboardError;

/// Line style of the metrics chart
pub fn metric_line_style() -> LineStyle {
    LineStyle::solid(Rgb::BTC_ORANGE, 1)
}

/// Title shown above the metrics chart, e.g. "BTC - Close"
pub fn chart_title(category: &Category, metric: &str) -> String {
    format!("{} - {}", category.label(), metric)
}

/// Validate a chart data payload
///
/// Both columns must be present with equal lengths, and `values` must not be
/// empty: an empty series is a failure, never a blank "loaded" chart.
pub fn parse_chart_data(response: ChartDataResponse) -> Result<MetricSeries, DashboardError> {
    if let Some(error) = response.error {
        return Err(DashboardError::Payload(error));
    }

    let dates = response
        .dates
        .ok_or_else(|| DashboardError::Payload("missing 'dates' field".to_string()))?;
    let values = response
        .values
        .ok_or_else(|| DashboardError::Payload("missing 'values' field".to_string()))?;

    if values.is_empty() {
        return Err(DashboardError::EmptyResult("series has no values".to_string()));
    }

    MetricSeries::from_columns(&dates, &values)
}

/// Fetch one metric series
pub async fn fetch_series(
    client: &DashboardClient,
    category: &Category,
    metric: &str,
) -> Result<MetricSeries, DashboardError> {
    info!("📈 Loading chart data for {}/{}", category, metric);
    let response = client.get_chart_data(category.id(), metric).await?;
    let series = parse_chart_data(response)?;
    debug!("Received {} points for {}/{}", series.len(), category, metric);
    Ok(series)
}

/// Chart state for a loaded series: labels are the series dates
pub fn series_chart_state(category: &Category, metric: &str, series: &MetricSeries) -> ChartState {
    let labels = series.points().iter().map(|p| p.date).collect();
    let points = series.points().iter().map(|p| (p.date, p.value)).collect();

    ChartState {
        title: chart_title(category, metric),
        labels,
        datasets: vec![Dataset {
            label: metric.to_string(),
            points,
            style: metric_line_style(),
        }],
        y_range: None,
        x_desc: "Datum".to_string(),
        y_desc: metric.to_string(),
    }
}
