//! REST client for the attendance backend.
//!
//! Thin wrapper over `reqwest`: every method maps one-to-one onto a backend
//! route. Non-success responses are turned into [`ApiError::Backend`] with
//! the backend's `message` field when it sends one.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::Backend;
use crate::error::ApiError;
use crate::model::{
    AttendanceEvent, GenerateOutcome, GenerateRequest, Lesson, LessonPatch, RosterEntry, Student,
};

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:3001`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Send a request, mapping non-success statuses to backend errors.
    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("request failed: {status}"));
        debug!(%status, %message, "backend rejected request");
        Err(ApiError::Backend(message))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.http.get(self.endpoint(path))).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Backend for ApiClient {
    async fn generate_recurring(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateOutcome, ApiError> {
        let response = self
            .execute(
                self.http
                    .post(self.endpoint("/lessons/recurring/generate"))
                    .json(request),
            )
            .await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch_lesson(&self, lesson_id: i64) -> Result<Lesson, ApiError> {
        self.get_json(&format!("/lessons/{lesson_id}")).await
    }

    async fn lessons_by_teacher(&self, teacher_id: i64) -> Result<Vec<Lesson>, ApiError> {
        self.get_json(&format!("/lessons/teacher/{teacher_id}")).await
    }

    async fn update_lesson(&self, lesson_id: i64, patch: &LessonPatch) -> Result<Lesson, ApiError> {
        let response = self
            .execute(
                self.http
                    .put(self.endpoint(&format!("/lessons/{lesson_id}")))
                    .json(patch),
            )
            .await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn delete_lesson(&self, lesson_id: i64) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.endpoint(&format!("/lessons/{lesson_id}"))))
            .await?;
        Ok(())
    }

    async fn open_lesson(&self, lesson_id: i64) -> Result<(), ApiError> {
        self.execute(self.http.post(self.endpoint(&format!("/lessons/{lesson_id}/open"))))
            .await?;
        Ok(())
    }

    async fn close_lesson(&self, lesson_id: i64) -> Result<(), ApiError> {
        self.execute(self.http.post(self.endpoint(&format!("/lessons/{lesson_id}/close"))))
            .await?;
        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.get_json("/students").await
    }

    async fn associate_student(&self, lesson_id: i64, student_id: i64) -> Result<(), ApiError> {
        self.execute(
            self.http
                .post(self.endpoint(&format!("/lessons/{lesson_id}/students")))
                .json(&json!({ "studentId": student_id })),
        )
        .await?;
        Ok(())
    }

    async fn fetch_roster(&self, lesson_id: i64) -> Result<Vec<RosterEntry>, ApiError> {
        self.get_json(&format!("/lessons/{lesson_id}/students")).await
    }

    async fn set_attendance(
        &self,
        lesson_id: i64,
        student_id: i64,
        present: bool,
    ) -> Result<(), ApiError> {
        self.execute(
            self.http
                .post(self.endpoint(&format!("/lessons/{lesson_id}/attendance")))
                .json(&json!({ "studentId": student_id, "present": present })),
        )
        .await?;
        Ok(())
    }

    async fn fetch_event_log(&self, lesson_id: i64) -> Result<Vec<AttendanceEvent>, ApiError> {
        self.get_json(&format!("/lessons/{lesson_id}/logs")).await
    }

    async fn clear_event_log(&self, lesson_id: i64) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.endpoint(&format!("/lessons/{lesson_id}/logs"))))
            .await?;
        Ok(())
    }
}
