// ABOUTME: Domain type definitions shared across Codementor packages
// ABOUTME: History entries, learning roadmaps, progress summaries and user profiles

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    #[default]
    Review,
    Codegen,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Review => "review",
            HistoryKind::Codegen => "codegen",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review" => Ok(HistoryKind::Review),
            "codegen" => Ok(HistoryKind::Codegen),
            other => Err(format!("Unknown history kind: {}", other)),
        }
    }
}

/// Content of a history entry, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryPayload {
    #[serde(rename_all = "camelCase")]
    Review {
        code_snippet: Option<String>,
        #[serde(default)]
        issues: Vec<String>,
        #[serde(default)]
        suggestions: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Codegen {
        query: Option<String>,
        language: Option<String>,
        generated_code: Option<String>,
        explanation: Option<String>,
    },
}

impl HistoryPayload {
    pub fn kind(&self) -> HistoryKind {
        match self {
            HistoryPayload::Review { .. } => HistoryKind::Review,
            HistoryPayload::Codegen { .. } => HistoryKind::Codegen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(flatten)]
    pub payload: HistoryPayload,
    pub timestamp: DateTime<Utc>,
}

/// Loosely-typed history submission as sent by the client.
///
/// Any `type` other than `codegen` is stored as a review.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInput {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub query: Option<String>,
    pub language: Option<String>,
    pub generated_code: Option<String>,
    pub explanation: Option<String>,
}

impl HistoryInput {
    pub fn into_payload(self) -> HistoryPayload {
        if self.kind.as_deref() == Some("codegen") {
            HistoryPayload::Codegen {
                query: self.query,
                language: self.language,
                generated_code: self.generated_code,
                explanation: self.explanation,
            }
        } else {
            HistoryPayload::Review {
                code_snippet: self.code_snippet,
                issues: self.issues,
                suggestions: self.suggestions,
            }
        }
    }
}

// ============================================================================
// Roadmap
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
    pub field: String,
    pub duration: u32,
    pub skill_level: String,
    #[serde(default)]
    pub daily_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoadmapDay {
    pub day: u32,
    pub title: String,
    pub objectives: Vec<String>,
    pub task: String,
    pub resources: Vec<String>,
    pub practice_questions: Vec<String>,
    pub tip: String,
    pub next_day_hint: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub field: String,
    pub duration: u32,
    pub skill_level: String,
    pub daily_time: Option<String>,
    pub days: Vec<RoadmapDay>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoadmapError {
    #[error("Day {day} does not exist in this roadmap ({total} days).")]
    DayOutOfRange { day: u32, total: u32 },

    #[error("Complete day {previous} before marking day {day} as complete.")]
    PreviousDayIncomplete { day: u32, previous: u32 },
}

impl Roadmap {
    pub fn day(&self, day: u32) -> Option<&RoadmapDay> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Check whether `day` may be marked complete.
    ///
    /// Day 1 is always eligible; any later day requires the previous day
    /// to already be complete.
    pub fn can_complete(&self, day: u32) -> Result<(), RoadmapError> {
        let total = self.days.len() as u32;
        if self.day(day).is_none() {
            return Err(RoadmapError::DayOutOfRange { day, total });
        }
        if day > 1 {
            let previous_done = self.day(day - 1).map(|d| d.completed).unwrap_or(false);
            if !previous_done {
                return Err(RoadmapError::PreviousDayIncomplete {
                    day,
                    previous: day - 1,
                });
            }
        }
        Ok(())
    }

    /// Mark `day` complete in memory, enforcing sequential order
    pub fn complete_day(&mut self, day: u32) -> Result<(), RoadmapError> {
        self.can_complete(day)?;
        if let Some(entry) = self.days.iter_mut().find(|d| d.day == day) {
            entry.completed = true;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapProgress {
    pub completed_days: u32,
    pub total_days: u32,
    pub percentage: u32,
    pub next_day: Option<u32>,
    pub roadmap: Roadmap,
}

impl RoadmapProgress {
    pub fn from_roadmap(roadmap: Roadmap) -> Self {
        let total_days = roadmap.days.len() as u32;
        let completed_days = roadmap.days.iter().filter(|d| d.completed).count() as u32;
        let percentage = if total_days == 0 {
            0
        } else {
            completed_days * 100 / total_days
        };
        let next_day = roadmap.days.iter().find(|d| !d.completed).map(|d| d.day);

        Self {
            completed_days,
            total_days,
            percentage,
            next_day,
            roadmap,
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Public view of a user account; never carries credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub history: Vec<HistoryEntry>,
    pub roadmap: Option<Roadmap>,
}
