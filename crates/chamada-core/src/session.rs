//! Per-lesson view state: lesson, roster and poller under one owner.
//!
//! Open/close is pessimistic -- the `opened` flag only flips after the
//! backend confirms, since it gates whether the scanners are live at all.
//! Attendance toggles are the opposite: optimistic with rollback, see
//! [`crate::roster`]. Each lesson detail view owns exactly one
//! `LessonSession`; there is no cross-view sharing.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::api::Backend;
use crate::error::{ApiError, CoreError};
use crate::model::{AttendanceEvent, Lesson};
use crate::poller::{EventPoller, PollOutcome};
use crate::roster::AttendanceStore;

/// One lesson's live view: authoritative lesson record, local roster and
/// the scan-event poller.
#[derive(Debug)]
pub struct LessonSession {
    lesson: Lesson,
    store: AttendanceStore,
    poller: EventPoller,
}

impl LessonSession {
    /// Fetch the lesson and its roster. Polling starts immediately when the
    /// lesson is already open.
    pub async fn load<A: Backend>(api: &A, lesson_id: i64) -> Result<Self, ApiError> {
        let lesson = api.fetch_lesson(lesson_id).await?;
        let mut store = AttendanceStore::new(lesson_id);
        store.replace_all(api.fetch_roster(lesson_id).await?);

        let mut poller = EventPoller::new();
        if lesson.opened {
            poller.enable(lesson_id, Utc::now());
        }
        Ok(Self {
            lesson,
            store,
            poller,
        })
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn store(&self) -> &AttendanceStore {
        &self.store
    }

    pub fn poller(&self) -> &EventPoller {
        &self.poller
    }

    pub fn events(&self) -> &[AttendanceEvent] {
        self.poller.events()
    }

    /// Override the poller's zero-event idle window (seconds).
    pub fn set_idle_suspend_secs(&mut self, secs: u64) {
        self.poller.set_idle_suspend_secs(secs);
    }

    /// Open the lesson for attendance. On confirmation the roster is
    /// force-refreshed (the scanners may have recorded events while this
    /// view was stale) and polling starts. On failure the displayed flag
    /// stays untouched.
    pub async fn open<A: Backend>(&mut self, api: &A, now: DateTime<Utc>) -> Result<(), ApiError> {
        if self.lesson.opened {
            return Ok(());
        }
        api.open_lesson(self.lesson.id).await?;
        self.lesson.opened = true;
        self.poller.enable(self.lesson.id, now);
        self.refresh_roster(api).await
    }

    /// Close the lesson. On confirmation polling stops; no refresh needed.
    pub async fn close<A: Backend>(&mut self, api: &A) -> Result<(), ApiError> {
        if !self.lesson.opened {
            return Ok(());
        }
        api.close_lesson(self.lesson.id).await?;
        self.lesson.opened = false;
        self.poller.disable();
        Ok(())
    }

    /// Optimistically toggle a student's presence and confirm with the
    /// backend. Returns the new effective value; on failure the exact prior
    /// value is restored and the error surfaces.
    pub async fn toggle<A: Backend>(&mut self, api: &A, student_id: i64) -> Result<bool, CoreError> {
        let ticket = self.store.begin_toggle(student_id)?;
        match api
            .set_attendance(self.lesson.id, student_id, ticket.target)
            .await
        {
            Ok(()) => {
                self.store.commit_toggle(&ticket);
                Ok(ticket.target)
            }
            Err(e) => {
                self.store.rollback_toggle(&ticket);
                Err(e.into())
            }
        }
    }

    /// Reconciling path: replace the roster wholesale from the backend.
    pub async fn refresh_roster<A: Backend>(&mut self, api: &A) -> Result<(), ApiError> {
        let entries = api.fetch_roster(self.lesson.id).await?;
        self.store.replace_all(entries);
        Ok(())
    }

    /// One polling tick. When the event log grew, the roster is reconciled
    /// in the same step, exactly once per detected growth.
    pub async fn poll<A: Backend>(
        &mut self,
        api: &A,
        now: DateTime<Utc>,
    ) -> Result<PollOutcome, ApiError> {
        let outcome = self.poller.poll(api, now).await;
        if let PollOutcome::Grew { total } = outcome {
            debug!(lesson_id = self.lesson.id, total, "scan events grew, reconciling roster");
            self.refresh_roster(api).await?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{sample_entry, sample_lesson, LogFetch, MockBackend};
    use crate::poller::PollerState;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
    }

    fn backend(opened: bool) -> MockBackend {
        let backend = MockBackend::default();
        *backend.lesson.lock().unwrap() = Some(sample_lesson(4, opened));
        *backend.roster.lock().unwrap() = vec![sample_entry(4, 12, false)];
        backend
    }

    #[tokio::test]
    async fn load_fetches_lesson_and_roster() {
        let api = backend(false);
        let session = LessonSession::load(&api, 4).await.unwrap();
        assert_eq!(session.lesson().id, 4);
        assert_eq!(session.store().present(12), Some(false));
        assert_eq!(session.poller().state(), PollerState::Idle);
    }

    #[tokio::test]
    async fn load_of_open_lesson_starts_polling() {
        let api = backend(true);
        let session = LessonSession::load(&api, 4).await.unwrap();
        assert_eq!(session.poller().state(), PollerState::Polling);
    }

    #[tokio::test]
    async fn open_is_pessimistic_on_failure() {
        let api = backend(false);
        api.fail_open.store(true, std::sync::atomic::Ordering::SeqCst);
        let mut session = LessonSession::load(&api, 4).await.unwrap();

        assert!(session.open(&api, t0()).await.is_err());
        assert!(!session.lesson().opened);
        assert_eq!(session.poller().state(), PollerState::Idle);
    }

    #[tokio::test]
    async fn open_refreshes_roster_and_enables_polling() {
        let api = backend(false);
        let mut session = LessonSession::load(&api, 4).await.unwrap();
        // Hardware marked the student present while the view was closed.
        *api.roster.lock().unwrap() = vec![sample_entry(4, 12, true)];

        session.open(&api, t0()).await.unwrap();
        assert!(session.lesson().opened);
        assert_eq!(session.store().present(12), Some(true));
        assert_eq!(session.poller().state(), PollerState::Polling);
    }

    #[tokio::test]
    async fn close_disables_polling_without_refresh() {
        let api = backend(true);
        let mut session = LessonSession::load(&api, 4).await.unwrap();
        let fetches_before = api.roster_fetches.load(std::sync::atomic::Ordering::SeqCst);

        session.close(&api).await.unwrap();
        assert!(!session.lesson().opened);
        assert_eq!(session.poller().state(), PollerState::Idle);
        assert_eq!(
            api.roster_fetches.load(std::sync::atomic::Ordering::SeqCst),
            fetches_before
        );
    }

    #[tokio::test]
    async fn close_failure_keeps_flag_and_poller() {
        let api = backend(true);
        api.fail_close.store(true, std::sync::atomic::Ordering::SeqCst);
        let mut session = LessonSession::load(&api, 4).await.unwrap();

        assert!(session.close(&api).await.is_err());
        assert!(session.lesson().opened);
        assert_eq!(session.poller().state(), PollerState::Polling);
    }

    #[tokio::test]
    async fn toggle_commits_on_success() {
        let api = backend(true);
        let mut session = LessonSession::load(&api, 4).await.unwrap();

        let now_present = session.toggle(&api, 12).await.unwrap();
        assert!(now_present);
        assert_eq!(session.store().present(12), Some(true));
        assert_eq!(
            api.attendance_calls.lock().unwrap().as_slice(),
            &[(4, 12, true)]
        );
    }

    #[tokio::test]
    async fn toggle_rolls_back_on_failure() {
        let api = backend(true);
        api.fail_set_attendance
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let mut session = LessonSession::load(&api, 4).await.unwrap();

        assert!(session.toggle(&api, 12).await.is_err());
        assert_eq!(session.store().present(12), Some(false));
    }

    #[tokio::test]
    async fn configured_idle_window_reaches_the_poller() {
        let api = backend(false);
        *api.log_script.lock().unwrap() = vec![LogFetch::Events(0), LogFetch::Events(0)].into();
        let mut session = LessonSession::load(&api, 4).await.unwrap();
        session.set_idle_suspend_secs(30);

        session.open(&api, t0()).await.unwrap();
        assert_eq!(
            session.poll(&api, t0() + chrono::Duration::seconds(3)).await.unwrap(),
            PollOutcome::Quiet
        );
        assert_eq!(
            session.poll(&api, t0() + chrono::Duration::seconds(31)).await.unwrap(),
            PollOutcome::Suspended
        );
    }

    #[tokio::test]
    async fn poll_growth_reconciles_roster_once() {
        let api = backend(true);
        *api.log_script.lock().unwrap() =
            vec![LogFetch::Events(0), LogFetch::Events(2), LogFetch::Events(2)].into();
        let mut session = LessonSession::load(&api, 4).await.unwrap();
        let base_fetches = api.roster_fetches.load(std::sync::atomic::Ordering::SeqCst);

        // Tag scan marks the student present server-side between ticks.
        *api.roster.lock().unwrap() = vec![sample_entry(4, 12, true)];

        assert_eq!(
            session.poll(&api, t0()).await.unwrap(),
            PollOutcome::Quiet
        );
        assert!(matches!(
            session.poll(&api, t0() + chrono::Duration::seconds(3)).await.unwrap(),
            PollOutcome::Grew { total: 2 }
        ));
        assert_eq!(
            session.poll(&api, t0() + chrono::Duration::seconds(6)).await.unwrap(),
            PollOutcome::Quiet
        );

        // Exactly one reconciling fetch, and the scan result is now local.
        assert_eq!(
            api.roster_fetches.load(std::sync::atomic::Ordering::SeqCst),
            base_fetches + 1
        );
        assert_eq!(session.store().present(12), Some(true));
        assert_eq!(session.events().len(), 2);
    }
}
