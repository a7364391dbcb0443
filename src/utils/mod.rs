pub mod table;
pub mod html;
pub mod errors;

pub use table::Table;
pub use html::html_escape;
pub use errors::DashboardError;
