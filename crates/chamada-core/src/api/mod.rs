//! Backend collaborator interface.
//!
//! The engine talks to the attendance backend exclusively through the
//! [`Backend`] trait -- one async operation per logical REST call. The
//! production implementation is [`ApiClient`]; tests substitute scripted
//! implementations.

pub mod client;

pub use client::ApiClient;

use crate::error::ApiError;
use crate::model::{
    AttendanceEvent, GenerateOutcome, GenerateRequest, Lesson, LessonPatch, RosterEntry, Student,
};

/// Logical operations of the attendance backend.
///
/// Every call may fail with a transport error or an application-level
/// message; both surface as [`ApiError`].
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Submit one generation batch. The response carries the authoritative
    /// created/skipped counts and the lessons actually created.
    async fn generate_recurring(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateOutcome, ApiError>;

    async fn fetch_lesson(&self, lesson_id: i64) -> Result<Lesson, ApiError>;

    async fn lessons_by_teacher(&self, teacher_id: i64) -> Result<Vec<Lesson>, ApiError>;

    async fn update_lesson(&self, lesson_id: i64, patch: &LessonPatch) -> Result<Lesson, ApiError>;

    async fn delete_lesson(&self, lesson_id: i64) -> Result<(), ApiError>;

    async fn open_lesson(&self, lesson_id: i64) -> Result<(), ApiError>;

    async fn close_lesson(&self, lesson_id: i64) -> Result<(), ApiError>;

    async fn list_students(&self) -> Result<Vec<Student>, ApiError>;

    /// Attach one student to one lesson. Intentionally a single-pair call;
    /// cross-product association loops over it and tolerates partial failure.
    async fn associate_student(&self, lesson_id: i64, student_id: i64) -> Result<(), ApiError>;

    async fn fetch_roster(&self, lesson_id: i64) -> Result<Vec<RosterEntry>, ApiError>;

    async fn set_attendance(
        &self,
        lesson_id: i64,
        student_id: i64,
        present: bool,
    ) -> Result<(), ApiError>;

    /// Fetch the append-only scan-event log. Grows monotonically while the
    /// lesson is open.
    async fn fetch_event_log(&self, lesson_id: i64) -> Result<Vec<AttendanceEvent>, ApiError>;

    /// Wipe the scan-event log. Destructive; callers must confirm upstream.
    async fn clear_event_log(&self, lesson_id: i64) -> Result<(), ApiError>;
}
