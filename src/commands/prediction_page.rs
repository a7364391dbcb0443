use tracing::{debug, error, info};

use super::dashboard::{Dashboard, PredictionView};
use crate::services::prediction_service;
use crate::utils::DashboardError;
use crate::view::{ChartRenderer, Document, Region};

impl<R: ChartRenderer> Dashboard<R> {
    /// Fetch the prediction and draw it
    ///
    /// A payload without both series is logged and dropped; any other failure
    /// shows the fixed error message and hides the chart region.
    pub async fn fetch_and_render_prediction(&mut self) -> Result<(), DashboardError> {
        let fetched =
            prediction_service::fetch_prediction(&self.client, &self.config.prediction_source).await;

        let dataset = match fetched {
            Ok(dataset) => dataset,
            Err(e @ DashboardError::MissingSeries(_)) => {
                error!("Invalid prediction payload: {}", e);
                return Err(e);
            }
            Err(e) => {
                error!("Failed to fetch prediction: {}", e);
                self.fail_prediction();
                return Err(e);
            }
        };

        self.document.hide(Region::Loading)?;
        self.document.hide(Region::ErrorMessage)?;
        self.document.show(Region::MainContent)?;

        let plot = match prediction_service::build_plot(&dataset) {
            Ok(plot) => plot,
            Err(e) => {
                error!("Cannot plot prediction: {}", e);
                self.fail_prediction();
                return Err(e);
            }
        };
        debug!(
            "Prediction domain {} dates, range {:.2}..{:.2}",
            plot.domain.len(),
            plot.range.min,
            plot.range.max
        );

        let view = self.prediction_view.get_or_insert_with(PredictionView::default);
        if view.canvas.widget().is_some() {
            self.renderer.release(Region::PredictionChart);
        }
        let widget = view
            .canvas
            .mount(prediction_service::prediction_chart_state(&plot));

        if let Err(e) = self.renderer.render(Region::PredictionChart, widget.state()) {
            error!("Failed to render prediction chart: {}", e);
            self.fail_prediction();
            return Err(e);
        }

        self.document.show(Region::PredictionChart)?;
        info!("✓ Prediction chart instance {} rendered", widget.instance());
        Ok(())
    }

    fn fail_prediction(&mut self) {
        if let Err(e) = show_prediction_error(&mut self.document, &self.config.messages.prediction_error) {
            error!("Cannot show prediction error: {}", e);
        }
    }
}

fn show_prediction_error(document: &mut Document, message: &str) -> Result<(), DashboardError> {
    document.hide(Region::Loading)?;
    document.set_text(Region::ErrorMessage, message)?;
    document.show(Region::ErrorMessage)?;
    document.hide(Region::PredictionChart)
}
