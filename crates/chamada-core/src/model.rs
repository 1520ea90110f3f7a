//! Wire types shared with the attendance backend.
//!
//! Field names follow the backend's camelCase JSON contract. The backend
//! assigns every identity; nothing here is created locally except
//! [`OccurrenceCandidate`], which stays ephemeral until submitted.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled lesson as the backend knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub subject: String,
    pub room: String,
    pub teacher_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Whether the lesson is currently open for attendance marking.
    /// Canonical name is `opened`; older backend responses used `isOpen`.
    #[serde(default, alias = "isOpen")]
    pub opened: bool,
}

/// A student known to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<String>,
}

impl Student {
    /// Case-insensitive substring match against name or tag id.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&q)
            || self
                .tag_id
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&q))
    }
}

/// One student's membership in a lesson, with the attendance flag.
///
/// The association id is unstable across backend code paths; the nested
/// student's id is the identity key for all local matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(rename = "id")]
    pub association_id: i64,
    pub lesson_id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub present: bool,
    pub student: Student,
}

/// One append-only entry in a lesson's scan-event log, produced by the
/// tag readers in the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    pub id: i64,
    pub lesson_id: i64,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub tag_id: String,
    #[serde(default)]
    pub room: String,
    /// Identifier of the scanner device that recorded the event.
    #[serde(default)]
    pub esp32_id: String,
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A proposed lesson occurrence produced by recurrence expansion.
/// Never persisted directly; the backend decides what actually gets created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceCandidate {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject: String,
    pub room: String,
    pub teacher_id: i64,
}

/// Batch submission payload for recurring lesson generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub room: String,
    pub subject: String,
    pub teacher_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub start_hour: NaiveTime,
    pub end_hour: NaiveTime,
    /// Weekday selectors, 0 = Sunday .. 6 = Saturday.
    pub weekdays: Vec<u8>,
    pub candidates: Vec<OccurrenceCandidate>,
}

/// Backend verdict on a generation batch. The server is the sole arbiter
/// of duplicate detection; these counts are authoritative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutcome {
    pub created_count: usize,
    pub skipped_count: usize,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Partial update for an existing lesson. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}
