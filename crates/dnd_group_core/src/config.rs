use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::target::DEFAULT_SLOT_MARKER;

/// Tunables shared by the collision ranker and the target-id codec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// Prefix of synthetic drop-slot ids.
    pub slot_marker: String,
    /// Decimal places overlap ratios are rounded to before ranking.
    pub ratio_decimals: u32,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            slot_marker: DEFAULT_SLOT_MARKER.to_string(),
            ratio_decimals: 4,
        }
    }
}

impl ReorderConfig {
    pub fn slot_marker(mut self, slot_marker: impl Into<String>) -> Self {
        self.slot_marker = slot_marker.into();
        self
    }

    pub fn ratio_decimals(mut self, ratio_decimals: u32) -> Self {
        self.ratio_decimals = ratio_decimals;
        self
    }

    /// Read a config object; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
