//! In-memory page document
//!
//! The dashboard never touches real markup directly; it writes into named
//! regions of a `Document`, which can be exported as a standalone page.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::models::Action;
use crate::utils::{html_escape, DashboardError};

/// Fixed regions a page can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Navbar,
    Categories,
    MetricsList,
    ChartTitle,
    DataChart,
    DataSource,
    DataTableBody,
    Loading,
    ErrorMessage,
    MainContent,
    PredictionChart,
    Footer,
}

impl Region {
    pub const ALL: [Region; 12] = [
        Region::Navbar,
        Region::Categories,
        Region::MetricsList,
        Region::ChartTitle,
        Region::DataChart,
        Region::DataSource,
        Region::DataTableBody,
        Region::Loading,
        Region::ErrorMessage,
        Region::MainContent,
        Region::PredictionChart,
        Region::Footer,
    ];

    /// Element id in the page markup
    pub fn id(&self) -> &'static str {
        match self {
            Region::Navbar => "navbar-placeholder",
            Region::Categories => "categories",
            Region::MetricsList => "metrics-list",
            Region::ChartTitle => "chart-title",
            Region::DataChart => "dataChart",
            Region::DataSource => "data-source",
            Region::DataTableBody => "data-table",
            Region::Loading => "loading",
            Region::ErrorMessage => "error-message",
            Region::MainContent => "main-content",
            Region::PredictionChart => "predictionChart",
            Region::Footer => "footer-placeholder",
        }
    }

    pub fn from_id(id: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.id() == id)
    }
}

/// Which page the document models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Data,
    Home,
    Static,
}

impl PageKind {
    /// Route by substring of the page path; "data" wins over "home"
    pub fn from_path(path: &str) -> PageKind {
        if path.contains("data") {
            PageKind::Data
        } else if path.contains("home") {
            PageKind::Home
        } else {
            PageKind::Static
        }
    }

    fn regions(&self) -> &'static [Region] {
        match self {
            PageKind::Data => &[
                Region::Navbar,
                Region::Categories,
                Region::MetricsList,
                Region::ChartTitle,
                Region::DataChart,
                Region::DataSource,
                Region::DataTableBody,
                Region::Loading,
                Region::ErrorMessage,
                Region::Footer,
            ],
            PageKind::Home => &[
                Region::Navbar,
                Region::Loading,
                Region::ErrorMessage,
                Region::MainContent,
                Region::PredictionChart,
                Region::Footer,
            ],
            PageKind::Static => &[Region::Navbar, Region::Footer],
        }
    }
}

/// A clickable button bound to an action
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub label: String,
    pub action: Action,
}

#[derive(Debug, Clone, Default)]
struct Element {
    html: String,
    visible: bool,
    selectors: Vec<Selector>,
}

#[derive(Debug, Clone)]
pub struct Document {
    kind: PageKind,
    elements: BTreeMap<Region, Element>,
}

impl Document {
    /// Build the region layout of `kind`
    ///
    /// Loading indicator and error region start hidden; the prediction page's
    /// main content stays hidden until a prediction arrives.
    pub fn for_page(kind: PageKind) -> Self {
        let elements = kind
            .regions()
            .iter()
            .map(|&region| {
                let visible = !matches!(
                    region,
                    Region::ErrorMessage | Region::MainContent | Region::Loading
                );
                (region, Element { visible, ..Element::default() })
            })
            .collect();

        let mut document = Self { kind, elements };
        if kind == PageKind::Home {
            // the prediction page opens on its spinner
            if let Some(loading) = document.elements.get_mut(&Region::Loading) {
                loading.visible = true;
            }
        }
        document
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn has(&self, region: Region) -> bool {
        self.elements.contains_key(&region)
    }

    fn element_mut(&mut self, region: Region) -> Result<&mut Element, DashboardError> {
        self.elements
            .get_mut(&region)
            .ok_or_else(|| DashboardError::MissingRegion(region.id().to_string()))
    }

    /// Replace the region's content with trusted markup
    pub fn set_html(&mut self, region: Region, html: &str) -> Result<(), DashboardError> {
        let element = self.element_mut(region)?;
        element.html = html.to_string();
        element.selectors.clear();
        debug!("Set {} bytes of html in #{}", html.len(), region.id());
        Ok(())
    }

    /// Replace the region's content with escaped text
    pub fn set_text(&mut self, region: Region, text: &str) -> Result<(), DashboardError> {
        self.set_html(region, &html_escape(text))
    }

    /// Replace the region's content with one button per selector
    pub fn set_selectors(&mut self, region: Region, selectors: Vec<Selector>) -> Result<(), DashboardError> {
        let element = self.element_mut(region)?;
        element.html = selectors.iter().map(render_selector).collect();
        element.selectors = selectors;
        Ok(())
    }

    pub fn show(&mut self, region: Region) -> Result<(), DashboardError> {
        self.element_mut(region)?.visible = true;
        Ok(())
    }

    pub fn hide(&mut self, region: Region) -> Result<(), DashboardError> {
        self.element_mut(region)?.visible = false;
        Ok(())
    }

    pub fn html(&self, region: Region) -> Option<&str> {
        self.elements.get(&region).map(|e| e.html.as_str())
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.elements.get(&region).map(|e| e.visible).unwrap_or(false)
    }

    pub fn selectors(&self, region: Region) -> &[Selector] {
        self.elements
            .get(&region)
            .map(|e| e.selectors.as_slice())
            .unwrap_or(&[])
    }

    /// Export as a standalone HTML page
    ///
    /// Chart regions reference `<canvas-id>.png` beside the exported file.
    pub fn to_html_page(&self, title: &str) -> String {
        let mut body = String::new();
        for (region, element) in &self.elements {
            let style = if element.visible { "" } else { " style=\"display:none\"" };
            let content = match region {
                Region::DataChart | Region::PredictionChart => {
                    format!("<img src=\"{}.png\" alt=\"{}\">", region.id(), region.id())
                }
                Region::DataTableBody => format!("<table><tbody>{}</tbody></table>", element.html),
                _ => element.html.clone(),
            };
            let _ = writeln!(body, "<div id=\"{}\"{}>{}</div>", region.id(), style, content);
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"sl\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            html_escape(title),
            body
        )
    }
}

fn render_selector(selector: &Selector) -> String {
    format!(
        "<button class=\"btn btn-outline-dark mx-2\" data-action=\"{}\">{}</button>",
        html_escape(&selector.action.to_attr()),
        html_escape(&selector.label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_route_by_path() {
        assert_eq!(PageKind::from_path("/data"), PageKind::Data);
        assert_eq!(PageKind::from_path("/home"), PageKind::Home);
        assert_eq!(PageKind::from_path("/"), PageKind::Static);
    }

    #[test]
    fn test_missing_region_is_an_error() {
        let mut doc = Document::for_page(PageKind::Static);
        let err = doc.set_html(Region::MetricsList, "x").unwrap_err();
        assert!(matches!(err, DashboardError::MissingRegion(id) if id == "metrics-list"));
        assert!(doc.set_html(Region::Navbar, "<nav></nav>").is_ok());
    }

    #[test]
    fn test_set_html_clears_selectors() {
        let mut doc = Document::for_page(PageKind::Data);
        doc.set_selectors(
            Region::Categories,
            vec![Selector {
                label: "BTC".to_string(),
                action: Action::SelectCategory(Category::Btc),
            }],
        )
        .unwrap();
        assert_eq!(doc.selectors(Region::Categories).len(), 1);
        assert!(doc.html(Region::Categories).unwrap().contains("data-action=\"category btc\""));

        doc.set_text(Region::Categories, "<gone>").unwrap();
        assert!(doc.selectors(Region::Categories).is_empty());
        assert_eq!(doc.html(Region::Categories), Some("&lt;gone&gt;"));
    }

    #[test]
    fn test_initial_visibility() {
        let data = Document::for_page(PageKind::Data);
        assert!(!data.is_visible(Region::Loading));
        assert!(!data.is_visible(Region::ErrorMessage));

        let home = Document::for_page(PageKind::Home);
        assert!(home.is_visible(Region::Loading));
        assert!(!home.is_visible(Region::MainContent));
    }

    #[test]
    fn test_export_page() {
        let mut doc = Document::for_page(PageKind::Static);
        doc.set_html(Region::Footer, "<footer>f</footer>").unwrap();
        let page = doc.to_html_page("Dashboard");
        assert!(page.contains("<div id=\"footer-placeholder\"><footer>f</footer></div>"));
        assert!(page.contains("<title>Dashboard</title>"));
    }
}
