use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordinal priority label. The derived order (`Less < Moderate < Important`)
/// is what day badge aggregation maxes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Less,
    Moderate,
    Important,
}

impl Difficulty {
    /// Badge color for calendar markers and task chips.
    pub fn color(self) -> &'static str {
        match self {
            Difficulty::Less => "#a6e3a1",
            Difficulty::Moderate => "#f9e2af",
            Difficulty::Important => "#f38ba8",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Moderate
    }
}

/// A task pinned to a calendar day. `date` is day-resolution by construction;
/// it serializes as the canonical `%Y-%m-%d` day key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub date: NaiveDate,
    pub completed: bool,
}

/// Client-supplied creation fields. The target date comes from the current
/// calendar selection, and a missing difficulty falls back to the configured
/// default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskDraft {
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    pub theme: String,
    #[serde(default)]
    pub default_difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            default_difficulty: Difficulty::Moderate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SettingsFile {
    pub schema_version: u32,
    pub settings: Settings,
}
