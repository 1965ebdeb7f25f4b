use crate::ExtendextError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// How two sequences at the same merge position are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMode {
    /// No special handling: sequences merge index by index like mappings
    #[default]
    Default,
    /// Append the source's elements to the target's
    Concat,
    /// Discard the target's elements and take the source's
    Replace,
    /// Merge container elements by index, append scalars not yet present
    Extend,
}

impl ArrayMode {
    pub const ALL: [Self; 4] = [Self::Default, Self::Concat, Self::Replace, Self::Extend];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Concat => "concat",
            Self::Replace => "replace",
            Self::Extend => "extend",
        }
    }

    /// Parse a mode name, falling back to [`ArrayMode::Default`] for names
    /// that are not recognised.
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: ExtendextError| {
            warn!("{e}; falling back to \"default\"");
            Self::Default
        })
    }
}

impl FromStr for ArrayMode {
    type Err = ExtendextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExtendextError::InvalidArrayMode(s.to_string()))
    }
}

impl fmt::Display for ArrayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
