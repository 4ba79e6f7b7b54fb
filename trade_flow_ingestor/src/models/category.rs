use std::fmt;

use serde::{Deserialize, Serialize};

/// Which investor flow a record set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeCategory {
    /// Buy/sell activity by foreign investors (khối ngoại).
    Foreign,
    /// Buy/sell activity by brokerages for their own account (tự doanh).
    Proprietary,
}

impl TradeCategory {
    pub const ALL: [TradeCategory; 2] = [TradeCategory::Foreign, TradeCategory::Proprietary];

    /// Short label used in file names and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            TradeCategory::Foreign => "foreign",
            TradeCategory::Proprietary => "self",
        }
    }
}

impl fmt::Display for TradeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
