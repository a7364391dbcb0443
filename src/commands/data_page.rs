use tracing::{debug, error, info, warn};

use super::dashboard::{Dashboard, DataView};
use crate::models::{Category, ChartState, DataTable, LoadTicket, MetricSeries};
use crate::services::{chart_service, navigator_service};
use crate::utils::DashboardError;
use crate::view::{ChartRenderer, Region};

impl<R: ChartRenderer> Dashboard<R> {
    /// Create the metrics chart widget, replacing any existing one
    pub fn init_chart(&mut self) {
        let view = self.data_view.get_or_insert_with(DataView::default);
        if view.canvas.widget().is_some() {
            self.renderer.release(Region::DataChart);
        }
        let widget = view
            .canvas
            .mount(ChartState::empty(chart_service::metric_line_style()));
        debug!("Metrics chart instance {} created", widget.instance());
    }

    /// Render one selector per category
    pub fn render_categories(&mut self) {
        if let Err(e) = self
            .document
            .set_selectors(Region::Categories, navigator_service::category_selectors())
        {
            error!("Cannot render categories: {}", e);
        }
    }

    /// Fetch the metric list of `category` and render its selectors
    ///
    /// On failure the metrics region shows the fixed error text instead of
    /// selectors; nothing else on the page changes.
    pub async fn load_metrics(&mut self, category: &Category) -> Result<(), DashboardError> {
        let fetched = navigator_service::fetch_metrics(&self.client, category).await;

        match fetched {
            Ok(metrics) => {
                let selectors = navigator_service::metric_selectors(category, &metrics);
                self.document.set_selectors(Region::MetricsList, selectors)
            }
            Err(e) => {
                warn!("Failed to load metrics for {}: {}", category, e);
                let message = format!(
                    "<p class=\"text-danger\">{}</p>",
                    crate::utils::html_escape(&self.config.messages.metrics_error)
                );
                self.document.set_html(Region::MetricsList, &message)?;
                Err(e)
            }
        }
    }

    /// Fetch and show the series of `metric` in `category`
    pub async fn load_chart_data(&mut self, category: &Category, metric: &str) -> Result<(), DashboardError> {
        let ticket = self.begin_chart_load()?;
        let fetched = chart_service::fetch_series(&self.client, category, metric).await;
        self.complete_chart_load(ticket, category, metric, fetched)
    }

    /// Mark a chart load as in flight: show the spinner, hide old errors
    ///
    /// The returned ticket supersedes every earlier one.
    pub fn begin_chart_load(&mut self) -> Result<LoadTicket, DashboardError> {
        let widget = self
            .data_view
            .as_mut()
            .and_then(|view| view.canvas.widget_mut())
            .ok_or(DashboardError::NotInitialized("metrics chart"))?;
        let ticket = widget.begin_load();

        self.document.show(Region::Loading)?;
        self.document.hide(Region::ErrorMessage)?;
        Ok(ticket)
    }

    /// Apply the outcome of a chart load
    ///
    /// A stale ticket is dropped without touching the page. On failure the
    /// chart, table, title and attribution keep their previous contents.
    pub fn complete_chart_load(
        &mut self,
        ticket: LoadTicket,
        category: &Category,
        metric: &str,
        fetched: Result<MetricSeries, DashboardError>,
    ) -> Result<(), DashboardError> {
        let view = self
            .data_view
            .as_mut()
            .ok_or(DashboardError::NotInitialized("metrics chart"))?;
        let widget = view
            .canvas
            .widget_mut()
            .ok_or(DashboardError::NotInitialized("metrics chart"))?;

        if !widget.is_current(ticket) {
            debug!("Discarding stale chart data for {}/{}", category, metric);
            return Ok(());
        }

        self.document.hide(Region::Loading)?;

        let series = match fetched {
            Ok(series) => series,
            Err(e) => {
                warn!("Failed to load chart data for {}/{}: {}", category, metric, e);
                self.document
                    .set_text(Region::ErrorMessage, &self.config.messages.data_error)?;
                self.document.show(Region::ErrorMessage)?;
                return Err(e);
            }
        };

        widget.update(chart_service::series_chart_state(category, metric, &series));
        if let Err(e) = self.renderer.render(Region::DataChart, widget.state()) {
            error!("Failed to render metrics chart: {}", e);
        }

        view.table = DataTable::from_series(&series, self.config.table_newest_first);
        self.document
            .set_html(Region::DataTableBody, &view.table.to_html())?;
        self.document
            .set_text(Region::ChartTitle, &chart_service::chart_title(category, metric))?;
        let attribution = self.config.attribution_for(category).to_string();
        self.document.set_html(Region::DataSource, &attribution)?;

        info!("✓ Showing {} points of {}/{}", series.len(), category, metric);
        Ok(())
    }
}
