//! JLPT proficiency levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Proficiency tier, declared from easiest to hardest.
///
/// The derived `Ord` follows declaration order, so `N5 < N4 < ... < N1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl Level {
    /// Every level in study order.
    pub const ALL: [Self; 5] = [Self::N5, Self::N4, Self::N3, Self::N2, Self::N1];

    /// Position in [`Level::ALL`]; used as the sort key for level ordering.
    #[must_use]
    pub const fn rank(self) -> usize {
        match self {
            Self::N5 => 0,
            Self::N4 => 1,
            Self::N3 => 2,
            Self::N2 => 3,
            Self::N1 => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N5 => "N5",
            Self::N4 => "N4",
            Self::N3 => "N3",
            Self::N2 => "N2",
            Self::N1 => "N1",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "N5" => Ok(Self::N5),
            "N4" => Ok(Self::N4),
            "N3" => Ok(Self::N3),
            "N2" => Ok(Self::N2),
            "N1" => Ok(Self::N1),
            _ => Err(CoreError::InvalidLevel(s.to_owned())),
        }
    }
}

/// Level selection for list filtering. `All` is the "unfiltered" sentinel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LevelFilter {
    #[default]
    All,
    Only(Level),
}

impl LevelFilter {
    #[must_use]
    pub fn matches(self, level: Option<Level>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => level == Some(wanted),
        }
    }

    #[must_use]
    pub const fn level(self) -> Option<Level> {
        match self {
            Self::All => None,
            Self::Only(level) => Some(level),
        }
    }
}

impl From<Option<Level>> for LevelFilter {
    fn from(level: Option<Level>) -> Self {
        level.map_or(Self::All, Self::Only)
    }
}

impl FromStr for LevelFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Only)
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(level) => level.fmt(f),
        }
    }
}
