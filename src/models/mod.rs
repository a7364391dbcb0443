//! Data models for the dashboard views
//!
//! Domain types shared by services (which produce them from backend
//! payloads) and commands (which apply them to the document).

pub mod action;
pub mod category;
pub mod chart;
pub mod prediction;
pub mod series;
pub mod table;

pub use action::Action;
pub use category::Category;
pub use chart::{ChartCanvas, ChartState, Dataset, LineStyle, LoadTicket, Rgb};
pub use prediction::{HistoricalPoint, PredictedPoint, PredictionDataset, PredictionPlot, ValueRange};
pub use series::MetricSeries;
pub use table::DataTable;
