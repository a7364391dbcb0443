pub mod dashboard;
pub mod data_page;
pub mod prediction_page;

pub use dashboard::Dashboard;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::models::{Action, Category, LoadTicket, MetricSeries};
use crate::services::chart_service;
use crate::utils::DashboardError;
use crate::view::{ChartRenderer, Region};

/// Result of a chart load running off the main loop
struct ChartLoad {
    ticket: LoadTicket,
    category: Category,
    metric: String,
    result: Result<MetricSeries, DashboardError>,
}

/// Apply one action to the dashboard
///
/// Returns `false` once the session should end. Failures are logged; the
/// flows have already updated the page for them.
pub async fn handle_action<R: ChartRenderer>(dashboard: &mut Dashboard<R>, action: Action) -> bool {
    debug!("Handling action {:?}", action);

    let result = match action {
        Action::SelectCategory(category) => dashboard.load_metrics(&category).await,
        Action::SelectMetric { category, metric } => dashboard.load_chart_data(&category, &metric).await,
        Action::RenderPrediction => dashboard.fetch_and_render_prediction().await,
        Action::Show => {
            println!("{}", summary(dashboard));
            Ok(())
        }
        Action::Quit => return false,
    };

    if let Err(e) = result {
        warn!("❌ Action failed: {}", e);
    }
    true
}

/// Plain-text view of what the page currently shows
pub fn summary<R: ChartRenderer>(dashboard: &Dashboard<R>) -> String {
    let document = dashboard.document();
    let mut out = String::new();

    if let Some(title) = document.html(Region::ChartTitle).filter(|t| !t.is_empty()) {
        out.push_str(title);
        out.push('\n');
    }
    if document.is_visible(Region::ErrorMessage) {
        if let Some(message) = document.html(Region::ErrorMessage) {
            out.push_str(&format!("! {}\n", message));
        }
    }
    for region in [Region::Categories, Region::MetricsList] {
        let labels: Vec<&str> = document
            .selectors(region)
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        if !labels.is_empty() {
            out.push_str(&format!("{}: {}\n", region.id(), labels.join(", ")));
        }
    }
    if let Some(view) = dashboard.data_view().filter(|v| !v.table.is_empty()) {
        out.push_str(&format!("{} rows\n", view.table.len()));
        out.push_str(&view.table.to_text());
    }
    out
}

fn spawn_chart_load<R: ChartRenderer>(
    dashboard: &mut Dashboard<R>,
    category: Category,
    metric: String,
    tx: &mpsc::UnboundedSender<ChartLoad>,
) {
    let ticket = match dashboard.begin_chart_load() {
        Ok(ticket) => ticket,
        Err(e) => {
            warn!("❌ Cannot load {}/{}: {}", category, metric, e);
            return;
        }
    };

    let client = dashboard.client().clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = chart_service::fetch_series(&client, &category, &metric).await;
        let _ = tx.send(ChartLoad {
            ticket,
            category,
            metric,
            result,
        });
    });
}

/// Read actions from stdin until `quit` or end of input
///
/// Metric selections load in the background, so a newer selection can
/// overtake an older one; only the latest is applied.
pub async fn run_interactive<R: ChartRenderer>(dashboard: &mut Dashboard<R>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (tx, mut rx) = mpsc::unbounded_channel::<ChartLoad>();

    info!("⌨️  Commands: category <id>, metric <category> <name>, predict, show, quit");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match Action::parse(&line) {
                    Ok(Action::SelectMetric { category, metric }) => {
                        spawn_chart_load(dashboard, category, metric, &tx);
                    }
                    Ok(action) => {
                        if !handle_action(dashboard, action).await {
                            break;
                        }
                    }
                    Err(message) => warn!("❌ {}", message),
                }
            }
            Some(load) = rx.recv() => {
                if let Err(e) = dashboard.complete_chart_load(load.ticket, &load.category, &load.metric, load.result) {
                    warn!("❌ Chart load failed: {}", e);
                }
            }
        }
    }

    info!("👋 Leaving interactive mode");
}
