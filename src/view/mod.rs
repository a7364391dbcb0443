//! Page surface: document regions and chart rendering

pub mod document;
pub mod render;

pub use document::{Document, PageKind, Region, Selector};
pub use render::{ChartRenderer, PlottersRenderer};
