use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::api::dashboard::{DashboardClient, PredictionResponse, TftResponse};
use crate::config::PredictionSource;
use crate::models::series::parse_date;
use crate::models::{
    ChartState, Dataset, HistoricalPoint, LineStyle, PredictedPoint, PredictionDataset,
    PredictionPlot, Rgb, ValueRange,
};
use crate::utils::DashboardError;

/// Relative margin added below the minimum and above the maximum
pub const RANGE_PADDING: f64 = 0.02;

/// Convert a /predict_and_plot payload; both series must be present
pub fn dataset_from_response(response: PredictionResponse) -> Result<PredictionDataset, DashboardError> {
    let historical = response
        .historical
        .ok_or(DashboardError::MissingSeries("historical"))?;
    let predicted = response
        .predicted
        .ok_or(DashboardError::MissingSeries("predicted"))?;

    let historical = historical
        .into_iter()
        .map(|r| {
            Ok(HistoricalPoint {
                date: parse_date(&r.date)?,
                close: r.close,
            })
        })
        .collect::<Result<Vec<_>, DashboardError>>()?;

    let predicted = predicted
        .into_iter()
        .map(|r| {
            Ok(PredictedPoint {
                date: parse_date(&r.date)?,
                median: r.predicted_median,
                lower: r.lower_bound,
                upper: r.upper_bound,
            })
        })
        .collect::<Result<Vec<_>, DashboardError>>()?;

    Ok(PredictionDataset { historical, predicted })
}

/// Convert a /get_tft_predictions payload
///
/// Actual values become historical closes and predictions become medians;
/// this endpoint carries no confidence bounds.
pub fn dataset_from_tft(response: TftResponse) -> Result<PredictionDataset, DashboardError> {
    let dates = response
        .dates
        .ok_or_else(|| DashboardError::Payload("missing 'dates' field".to_string()))?;
    let actual = response.actual.ok_or(DashboardError::MissingSeries("historical"))?;
    let predicted = response.predicted.ok_or(DashboardError::MissingSeries("predicted"))?;

    if actual.len() != dates.len() || predicted.len() != dates.len() {
        return Err(DashboardError::Payload(format!(
            "{} dates, {} actual, {} predicted",
            dates.len(),
            actual.len(),
            predicted.len()
        )));
    }

    let mut dataset = PredictionDataset::default();
    for ((raw, close), median) in dates.iter().zip(actual).zip(predicted) {
        let date = parse_date(raw)?;
        dataset.historical.push(HistoricalPoint { date, close });
        dataset.predicted.push(PredictedPoint {
            date,
            median,
            lower: None,
            upper: None,
        });
    }
    Ok(dataset)
}

/// Drop points whose primary value is null, each series on its own
pub fn filter_nulls(dataset: &PredictionDataset) -> PredictionDataset {
    PredictionDataset {
        historical: dataset
            .historical
            .iter()
            .filter(|p| p.close.is_some())
            .copied()
            .collect(),
        predicted: dataset
            .predicted
            .iter()
            .filter(|p| p.median.is_some())
            .copied()
            .collect(),
    }
}

/// Distinct dates of both series, ascending
pub fn shared_domain(dataset: &PredictionDataset) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = dataset
        .historical
        .iter()
        .map(|p| p.date)
        .chain(dataset.predicted.iter().map(|p| p.date))
        .collect();
    dates.into_iter().collect()
}

/// Range over every non-null close, median and bound, padded by 2%
pub fn value_range(dataset: &PredictionDataset) -> Option<ValueRange> {
    let values = dataset
        .historical
        .iter()
        .filter_map(|p| p.close)
        .chain(dataset.predicted.iter().filter_map(|p| p.median))
        .chain(dataset.predicted.iter().filter_map(|p| p.lower))
        .chain(dataset.predicted.iter().filter_map(|p| p.upper))
        .filter(|v| v.is_finite());

    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    })?;

    Some(ValueRange {
        min: min * (1.0 - RANGE_PADDING),
        max: max * (1.0 + RANGE_PADDING),
    })
}

/// Filter, merge and bound a dataset for plotting
pub fn build_plot(dataset: &PredictionDataset) -> Result<PredictionPlot, DashboardError> {
    let filtered = filter_nulls(dataset);
    let range = value_range(&filtered)
        .ok_or_else(|| DashboardError::EmptyResult("prediction has no values".to_string()))?;

    let historical = filtered
        .historical
        .iter()
        .filter_map(|p| p.close.map(|v| (p.date, v)))
        .collect();
    let median = filtered
        .predicted
        .iter()
        .filter_map(|p| p.median.map(|v| (p.date, v)))
        .collect();
    let upper = filtered
        .predicted
        .iter()
        .filter_map(|p| p.upper.map(|v| (p.date, v)))
        .collect();
    let lower = filtered
        .predicted
        .iter()
        .filter_map(|p| p.lower.map(|v| (p.date, v)))
        .collect();

    Ok(PredictionPlot {
        domain: shared_domain(&filtered),
        range,
        historical,
        median,
        upper,
        lower,
    })
}

fn sparse(points: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, Option<f64>)> {
    points.iter().map(|(d, v)| (*d, Some(*v))).collect()
}

/// Four-line chart state: history, median and both bounds
pub fn prediction_chart_state(plot: &PredictionPlot) -> ChartState {
    let mut datasets = vec![
        Dataset {
            label: "Pretekle cene".to_string(),
            points: sparse(&plot.historical),
            style: LineStyle::solid(Rgb::BLACK, 2),
        },
        Dataset {
            label: "Napoved (Median)".to_string(),
            points: sparse(&plot.median),
            style: LineStyle::solid(Rgb::BTC_ORANGE, 3),
        },
    ];
    // TFT predictions carry no bounds
    for (label, points) in [("Zgornja meja", &plot.upper), ("Spodnja meja", &plot.lower)] {
        if !points.is_empty() {
            datasets.push(Dataset {
                label: label.to_string(),
                points: sparse(points),
                style: LineStyle::dashed(Rgb::BTC_ORANGE, 2),
            });
        }
    }

    ChartState {
        title: "Napoved cene BTC".to_string(),
        labels: plot.domain.clone(),
        datasets,
        y_range: Some(plot.range),
        x_desc: "Datum".to_string(),
        y_desc: "Cena ($)".to_string(),
    }
}

/// Fetch a prediction dataset from the configured endpoint
pub async fn fetch_prediction(
    client: &DashboardClient,
    source: &PredictionSource,
) -> Result<PredictionDataset, DashboardError> {
    info!("🔮 Loading prediction ({:?})", source);

    let dataset = match source {
        PredictionSource::Parameterized {
            max_encoder_length,
            max_prediction_length,
        } => {
            let response = client
                .predict_and_plot(Some((*max_encoder_length, *max_prediction_length)))
                .await?;
            dataset_from_response(response)?
        }
        PredictionSource::Combined => dataset_from_response(client.predict_and_plot(None).await?)?,
        PredictionSource::Tft => dataset_from_tft(client.get_tft_predictions().await?)?,
    };

    debug!(
        "Prediction payload: {} historical, {} predicted",
        dataset.historical.len(),
        dataset.predicted.len()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn worked_example() -> PredictionDataset {
        let response: PredictionResponse = serde_json::from_value(json!({
            "historical": [
                {"Date": "2024-01-01", "Close": 100.0},
                {"Date": "2024-01-02", "Close": null}
            ],
            "predicted": [
                {"Date": "2024-01-02", "Predicted_Median": 105.0, "Lower_Bound": 100.0, "Upper_Bound": 112.0},
                {"Date": "2024-01-03", "Predicted_Median": 110.0, "Lower_Bound": 115.0, "Upper_Bound": 118.0}
            ]
        }))
        .unwrap();
        dataset_from_response(response).unwrap()
    }

    #[test]
    fn test_filter_drops_null_primary_values() {
        let filtered = filter_nulls(&worked_example());
        assert_eq!(
            filtered.historical,
            vec![HistoricalPoint { date: d(1), close: Some(100.0) }]
        );
        assert_eq!(filtered.predicted.len(), 2);
    }

    #[test]
    fn test_worked_example_plot() {
        let plot = build_plot(&worked_example()).unwrap();
        assert_eq!(plot.domain, vec![d(1), d(2), d(3)]);
        assert_eq!(plot.historical, vec![(d(1), 100.0)]);

        let lo = [100.0_f64, 105.0, 100.0, 112.0, 110.0, 115.0, 118.0]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        let hi = [100.0_f64, 105.0, 100.0, 112.0, 110.0, 115.0, 118.0]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((plot.range.min - lo * 0.98).abs() < 1e-9);
        assert!((plot.range.max - hi * 1.02).abs() < 1e-9);
    }

    #[test]
    fn test_series_stay_sparse() {
        let plot = build_plot(&worked_example()).unwrap();
        assert_eq!(plot.median, vec![(d(2), 105.0), (d(3), 110.0)]);
        assert_eq!(plot.lower.len(), 2);
        // domain has three dates but the median only maps its own two
        assert!(plot.median.len() < plot.domain.len());
    }

    #[test]
    fn test_missing_series_is_reported() {
        let response: PredictionResponse =
            serde_json::from_value(json!({"historical": []})).unwrap();
        assert!(matches!(
            dataset_from_response(response),
            Err(DashboardError::MissingSeries("predicted"))
        ));
    }

    #[test]
    fn test_all_null_is_empty_result() {
        let dataset = PredictionDataset {
            historical: vec![HistoricalPoint { date: d(1), close: None }],
            predicted: vec![],
        };
        assert!(matches!(build_plot(&dataset), Err(DashboardError::EmptyResult(_))));
    }

    #[test]
    fn test_tft_conversion() {
        let response: TftResponse = serde_json::from_value(json!({
            "dates": ["2024-01-01", "2024-01-02"],
            "actual": [1.0, null],
            "predicted": [1.1, 1.2]
        }))
        .unwrap();
        let dataset = dataset_from_tft(response).unwrap();
        assert_eq!(dataset.historical.len(), 2);
        assert_eq!(dataset.predicted[1].median, Some(1.2));
        assert_eq!(dataset.predicted[1].upper, None);

        let state = prediction_chart_state(&build_plot(&dataset).unwrap());
        assert_eq!(state.datasets.len(), 2);
    }

    #[test]
    fn test_chart_state_has_four_lines() {
        let state = prediction_chart_state(&build_plot(&worked_example()).unwrap());
        assert_eq!(state.datasets.len(), 4);
        assert!(!state.datasets[1].style.dashed);
        assert!(state.datasets[2].style.dashed && state.datasets[3].style.dashed);
        assert_eq!(state.labels.len(), 3);
    }
}
