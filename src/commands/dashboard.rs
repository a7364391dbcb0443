use std::path::PathBuf;

use tracing::{error, info};

use crate::api::dashboard::DashboardClient;
use crate::config::DashboardConfig;
use crate::models::{ChartCanvas, DataTable};
use crate::services::fragment_service::{self, Fragment};
use crate::services::readiness_service;
use crate::utils::DashboardError;
use crate::view::{ChartRenderer, Document, PageKind, Region};

/// State of the data page's chart and table
#[derive(Debug, Default)]
pub struct DataView {
    pub canvas: ChartCanvas,
    pub table: DataTable,
}

/// State of the prediction page's chart
#[derive(Debug, Default)]
pub struct PredictionView {
    pub canvas: ChartCanvas,
}

/// Controller owning the document and every chart on it
pub struct Dashboard<R: ChartRenderer> {
    pub(crate) config: DashboardConfig,
    pub(crate) client: DashboardClient,
    pub(crate) document: Document,
    pub(crate) renderer: R,
    pub(crate) data_view: Option<DataView>,
    pub(crate) prediction_view: Option<PredictionView>,
}

impl<R: ChartRenderer> Dashboard<R> {
    /// Lay out the document for the configured page path
    pub fn new(config: DashboardConfig, client: DashboardClient, renderer: R) -> Self {
        let document = Document::for_page(PageKind::from_path(&config.page_path));
        Self {
            config,
            client,
            document,
            renderer,
            data_view: None,
            prediction_view: None,
        }
    }

    pub fn client(&self) -> &DashboardClient {
        &self.client
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn data_view(&self) -> Option<&DataView> {
        self.data_view.as_ref()
    }

    /// Fetch `source_url` and replace the content of the region `target_id`
    ///
    /// On a failed fetch the placeholder is left empty.
    pub async fn load_fragment(&mut self, target_id: &str, source_url: &str) -> Result<(), DashboardError> {
        let Some(region) = Region::from_id(target_id).filter(|r| self.document.has(*r)) else {
            error!("No placeholder #{} for fragment {}", target_id, source_url);
            return Err(DashboardError::MissingRegion(target_id.to_string()));
        };

        let html = match fragment_service::fetch_fragment(&self.client, source_url).await {
            Ok(html) => html,
            Err(e) => {
                error!("Failed to load fragment #{} from {}: {}", target_id, source_url, e);
                self.document.set_html(region, "")?;
                return Err(e);
            }
        };

        self.document.set_html(region, &html)
    }

    /// Load navbar and footer; each may fail without affecting the other
    pub async fn load_shared_fragments(&mut self) {
        for fragment in [Fragment::Navbar, Fragment::Footer] {
            // failures are already logged and leave the placeholder empty
            let _ = self.load_fragment(fragment.region().id(), fragment.path()).await;
        }
    }

    /// Run the page-load sequence for the configured path
    ///
    /// Each dependent step starts when the previous one has completed.
    pub async fn bootstrap(&mut self) -> PageKind {
        self.load_shared_fragments().await;

        let kind = self.document.kind();
        info!("Current path: {} ({:?} page)", self.config.page_path, kind);

        match kind {
            PageKind::Data => {
                info!("Loading data page...");
                self.init_chart();
                self.render_categories();

                let category = self.config.default_category.clone();
                let metric = self.config.default_metric.clone();
                // a failed metric list does not block the default chart
                let _ = self.load_metrics(&category).await;
                let _ = self.load_chart_data(&category, &metric).await;
            }
            PageKind::Home => {
                info!("Loading prediction page...");
                if self.config.check_data_ready {
                    let ready =
                        readiness_service::ensure_data_ready(&self.client, self.config.update_timeout).await;
                    if let Err(e) = ready {
                        error!("Data readiness check failed: {}", e);
                    }
                }
                let _ = self.fetch_and_render_prediction().await;
            }
            PageKind::Static => info!("Static page, nothing to load"),
        }

        kind
    }

    /// Write the document as `index.html` into the output directory
    pub fn export_page(&self) -> Result<PathBuf, DashboardError> {
        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir)
            .map_err(|e| DashboardError::Render(format!("Failed to create {}: {}", dir.display(), e)))?;

        let path = dir.join("index.html");
        std::fs::write(&path, self.document.to_html_page("BTC Dashboard"))
            .map_err(|e| DashboardError::Render(format!("Failed to write {}: {}", path.display(), e)))?;
        info!("💾 Exported page to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use super::*;
    use crate::view::render::RecordingRenderer;

    pub fn dashboard(base_url: &str, page_path: &str) -> Dashboard<RecordingRenderer> {
        let config = DashboardConfig {
            base_url: base_url.to_string(),
            page_path: page_path.to_string(),
            check_data_ready: false,
            ..DashboardConfig::default()
        };
        let client = DashboardClient::new(base_url, Duration::from_secs(5)).unwrap();
        Dashboard::new(config, client, RecordingRenderer::default())
    }

    pub async fn json_mock(
        server: &mut mockito::ServerGuard,
        path: &str,
        status: usize,
        body: &str,
    ) -> mockito::Mock {
        server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_fragments_fail_independently() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/navbar")
            .with_body("<nav>menu</nav>")
            .create_async()
            .await;
        server
            .mock("GET", "/footer")
            .with_status(500)
            .create_async()
            .await;

        let mut dashboard = dashboard(&server.url(), "/");
        dashboard.load_shared_fragments().await;

        assert_eq!(dashboard.document().html(Region::Navbar), Some("<nav>menu</nav>"));
        assert_eq!(dashboard.document().html(Region::Footer), Some(""));
    }

    #[tokio::test]
    async fn test_failed_navbar_does_not_block_footer() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/navbar").with_status(404).create_async().await;
        let footer = server
            .mock("GET", "/footer")
            .with_body("<footer>f</footer>")
            .expect(1)
            .create_async()
            .await;

        let mut dashboard = dashboard(&server.url(), "/home");
        dashboard.load_shared_fragments().await;

        footer.assert_async().await;
        assert_eq!(dashboard.document().html(Region::Navbar), Some(""));
        assert_eq!(dashboard.document().html(Region::Footer), Some("<footer>f</footer>"));
    }

    #[tokio::test]
    async fn test_load_fragment_missing_target() {
        let server = mockito::Server::new_async().await;
        let mut dashboard = dashboard(&server.url(), "/");
        let err = dashboard.load_fragment("sidebar", "/navbar").await.unwrap_err();
        assert!(matches!(err, DashboardError::MissingRegion(_)));
    }

    #[tokio::test]
    async fn test_static_page_loads_nothing_else() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/navbar").with_body("n").create_async().await;
        server.mock("GET", "/footer").with_body("f").create_async().await;
        let metrics = server
            .mock("GET", Matcher::Regex("^/get_.*".to_string()))
            .expect(0)
            .create_async()
            .await;

        let mut dashboard = dashboard(&server.url(), "/about");
        assert_eq!(dashboard.bootstrap().await, PageKind::Static);
        metrics.assert_async().await;
        assert!(dashboard.data_view().is_none());
    }

    #[tokio::test]
    async fn test_data_page_bootstrap_chains_default_loads() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/navbar").with_body("n").create_async().await;
        server.mock("GET", "/footer").with_body("f").create_async().await;
        json_mock(&mut server, "/get_metrics/btc", 200, r#"{"metrics": ["Close", "Volume"]}"#).await;
        let chart = server
            .mock("GET", "/get_chart_data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("category".into(), "btc".into()),
                Matcher::UrlEncoded("metric".into(), "Close".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(r#"{"dates": ["2024-01-01", "2024-01-02"], "values": [42000.0, 43000.5]}"#)
            .create_async()
            .await;

        let mut dashboard = dashboard(&server.url(), "/data");
        assert_eq!(dashboard.bootstrap().await, PageKind::Data);
        chart.assert_async().await;

        let doc = dashboard.document();
        assert_eq!(doc.selectors(Region::Categories).len(), 5);
        assert_eq!(doc.selectors(Region::MetricsList).len(), 2);
        assert_eq!(doc.html(Region::ChartTitle), Some("BTC - Close"));
        assert_eq!(dashboard.data_view().unwrap().table.len(), 2);
    }

    #[tokio::test]
    async fn test_home_page_checks_readiness_then_predicts() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/navbar").with_body("n").create_async().await;
        server.mock("GET", "/footer").with_body("f").create_async().await;
        let ready = json_mock(&mut server, "/load_data", 200, r#"{"status": "ready"}"#).await;
        server
            .mock("GET", "/predict_and_plot")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"historical": [{"Date": "2024-01-01", "Close": 100.0}],
                    "predicted": [{"Date": "2024-01-02", "Predicted_Median": 101.0, "Lower_Bound": 99.0, "Upper_Bound": 103.0}]}"#,
            )
            .create_async()
            .await;

        let mut dashboard = dashboard(&server.url(), "/home");
        dashboard.config.check_data_ready = true;
        assert_eq!(dashboard.bootstrap().await, PageKind::Home);

        ready.assert_async().await;
        assert!(dashboard.document().is_visible(Region::MainContent));
        assert_eq!(dashboard.renderer.rendered.len(), 1);
    }

    #[test]
    fn test_export_page_writes_index() {
        let mut dashboard = dashboard("http://127.0.0.1:1", "/data");
        dashboard.config.output_dir =
            std::env::temp_dir().join(format!("btc-dashboard-export-{}", std::process::id()));

        let path = dashboard.export_page().unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("id=\"dataChart\""));
        assert!(html.contains("<title>BTC Dashboard</title>"));

        let _ = std::fs::remove_dir_all(&dashboard.config.output_dir);
    }
}
