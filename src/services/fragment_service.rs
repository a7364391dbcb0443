use tracing::debug;

use crate::api::dashboard::DashboardClient;
use crate::utils::DashboardError;
use crate::view::Region;

/// Shared page fragments served by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Navbar,
    Footer,
}

impl Fragment {
    pub fn path(&self) -> &'static str {
        match self {
            Fragment::Navbar => "/navbar",
            Fragment::Footer => "/footer",
        }
    }

    /// Placeholder the fragment is injected into
    pub fn region(&self) -> Region {
        match self {
            Fragment::Navbar => Region::Navbar,
            Fragment::Footer => Region::Footer,
        }
    }
}

/// Fetch the HTML of a fragment
pub async fn fetch_fragment(client: &DashboardClient, source_url: &str) -> Result<String, DashboardError> {
    let html = client.get_fragment(source_url).await?;
    debug!("Fetched {} bytes from {}", html.len(), source_url);
    Ok(html)
}
