use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::errors::AppError;

/// How catalog listings are folded into groups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingMode {
    /// One group per entry, keyed by its catalog id (season bundling off)
    #[default]
    PerEntry,
    /// Entries sharing a normalized base title form one franchise group
    Franchise,
}

impl GroupingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingMode::PerEntry => "per-entry",
            GroupingMode::Franchise => "franchise",
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "per-entry" | "none" | "off" => Ok(GroupingMode::PerEntry),
            "franchise" | "on" => Ok(GroupingMode::Franchise),
            other => Err(AppError::ConfigError(format!(
                "Unknown grouping mode '{}'. Expected 'per-entry' or 'franchise'",
                other
            ))),
        }
    }
}
