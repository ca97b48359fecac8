use std::fmt;

use serde::{Deserialize, Serialize};

/// Demand tier selecting which price column of the All-Inclusive table applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    #[default]
    Low,
    Medium,
    High,
}

impl Season {
    pub fn all() -> &'static [Season] {
        &[Season::Low, Season::Medium, Season::High]
    }

    /// Season label as written in the rate files and the selection lists.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Baja",
            Self::Medium => "Media",
            Self::High => "Alta",
        }
    }

    /// Name of the price column holding this season's rate.
    pub fn rate_column(&self) -> &'static str {
        match self {
            Self::Low => "Tarifa Baja",
            Self::Medium => "Tarifa Media",
            Self::High => "Tarifa Alta",
        }
    }

    /// Accepts the file labels (`Baja`, `Media`, `Alta`) as well as the
    /// English names, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "baja" | "low" => Some(Self::Low),
            "media" | "medium" => Some(Self::Medium),
            "alta" | "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
