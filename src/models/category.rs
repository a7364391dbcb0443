//! Metric categories

use std::fmt;

/// A top-level grouping of metrics served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Indicators,
    Btc,
    Bea,
    Fred,
    BtcEtf,
    /// Anything outside the known set; still requestable, never attributed
    Other(String),
}

impl Category {
    /// Known categories in display order
    pub const ALL: [Category; 5] = [
        Category::Indicators,
        Category::Btc,
        Category::Bea,
        Category::Fred,
        Category::BtcEtf,
    ];

    /// Wire identifier used in URLs and lookups
    pub fn id(&self) -> &str {
        match self {
            Category::Indicators => "indicators",
            Category::Btc => "btc",
            Category::Bea => "bea",
            Category::Fred => "fred",
            Category::BtcEtf => "btc-etf",
            Category::Other(id) => id,
        }
    }

    /// Selector label, e.g. "BTC-ETF"
    pub fn label(&self) -> String {
        self.id().to_uppercase()
    }
}

impl From<&str> for Category {
    fn from(id: &str) -> Self {
        match id.trim().to_lowercase().as_str() {
            "indicators" => Category::Indicators,
            "btc" => Category::Btc,
            "bea" => Category::Bea,
            "fred" => Category::Fred,
            "btc-etf" => Category::BtcEtf,
            _ => Category::Other(id.trim().to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
