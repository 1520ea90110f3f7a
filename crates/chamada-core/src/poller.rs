//! Scan-event log polling.
//!
//! The poller is a wall-clock state machine in the same mold as a caller-
//! driven timer: it owns no timer or task of its own, and the caller invokes
//! [`EventPoller::poll`] on a fixed cadence. Disabling it is therefore
//! deterministic -- once the driving loop stops calling in, nothing can
//! resurrect a fetch.
//!
//! ## States
//!
//! ```text
//! Idle -> Polling -> Suspended
//!   ^       |           |
//!   +-------+-----------+   (disable)
//! ```
//!
//! - `Polling` fetches the lesson's event log each tick. At most one fetch is
//!   outstanding at a time: `poll` borrows the poller exclusively, and the
//!   driving loop skips ticks it missed.
//! - `Suspended` is entered after a configurable idle window (five minutes by
//!   default) without a single observed event; ticks become no-ops until
//!   re-enabled.
//! - A fetch failure changes nothing and is retried on the next tick.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::Backend;
use crate::model::AttendanceEvent;

/// Fixed cadence for the driving loop.
pub const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(3);

/// Default idle window: stop fetching after this many quiet seconds with
/// zero events observed.
const DEFAULT_SUSPEND_AFTER_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Disabled: no lesson, or the lesson is closed.
    Idle,
    /// Actively fetching on each tick.
    Polling,
    /// Logically on, but ticks are skipped until re-enabled.
    Suspended,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No fetch was issued (poller idle or suspended).
    Skipped,
    /// Prolonged inactivity with zero events; the poller just suspended.
    Suspended,
    /// Fetch succeeded, no new events.
    Quiet,
    /// Fetch succeeded and the log grew; the roster should be reconciled.
    Grew { total: usize },
    /// Fetch failed; state untouched, retried on the next tick.
    Failed,
}

/// Cooperative poller for one lesson's append-only scan-event log.
///
/// `poll` takes `&mut self`, so the single owner of a poller can never have
/// two fetches outstanding; there is no separate guard flag to wedge.
#[derive(Debug)]
pub struct EventPoller {
    state: PollerState,
    lesson_id: Option<i64>,
    /// Event count observed on the last successful fetch.
    last_seen: usize,
    /// Wall-clock time of enablement or of the last detected growth.
    last_activity: DateTime<Utc>,
    /// Idle window before suspension, in seconds.
    suspend_after_secs: i64,
    /// Latest fetched log, newest last.
    events: Vec<AttendanceEvent>,
}

impl EventPoller {
    pub fn new() -> Self {
        Self {
            state: PollerState::Idle,
            lesson_id: None,
            last_seen: 0,
            last_activity: Utc::now(),
            suspend_after_secs: DEFAULT_SUSPEND_AFTER_SECS,
            events: Vec::new(),
        }
    }

    /// Override the zero-event idle window. Survives enable/disable cycles.
    pub fn set_idle_suspend_secs(&mut self, secs: u64) {
        self.suspend_after_secs = i64::try_from(secs).unwrap_or(i64::MAX);
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn last_seen(&self) -> usize {
        self.last_seen
    }

    /// Latest fetched event log.
    pub fn events(&self) -> &[AttendanceEvent] {
        &self.events
    }

    /// Start polling a lesson. Resets all counters; switching lessons goes
    /// through here as well.
    pub fn enable(&mut self, lesson_id: i64, now: DateTime<Utc>) {
        self.state = PollerState::Polling;
        self.lesson_id = Some(lesson_id);
        self.last_seen = 0;
        self.last_activity = now;
        self.events.clear();
    }

    /// Stop polling. The next tick is guaranteed to issue no fetch.
    pub fn disable(&mut self) {
        self.state = PollerState::Idle;
        self.lesson_id = None;
        self.last_seen = 0;
        self.events.clear();
    }

    /// One tick of the polling loop, at the given wall-clock instant.
    ///
    /// Call on a fixed cadence ([`POLL_INTERVAL`]). Fetch failures are
    /// logged and absorbed; the caller only needs to act on
    /// [`PollOutcome::Grew`], which fires exactly once per detected growth.
    pub async fn poll<A: Backend>(&mut self, api: &A, now: DateTime<Utc>) -> PollOutcome {
        let lesson_id = match (self.state, self.lesson_id) {
            (PollerState::Polling, Some(id)) => id,
            _ => return PollOutcome::Skipped,
        };
        if self.last_seen == 0
            && (now - self.last_activity).num_seconds() > self.suspend_after_secs
        {
            debug!(
                lesson_id,
                idle_secs = self.suspend_after_secs,
                "no scan events, suspending poll"
            );
            self.state = PollerState::Suspended;
            return PollOutcome::Suspended;
        }

        match api.fetch_event_log(lesson_id).await {
            Ok(events) => {
                let total = events.len();
                let previous = self.last_seen;
                self.events = events;
                // Track the server's count unconditionally: a wholesale log
                // clear must lower the mark so the next scan is detected.
                self.last_seen = total;
                if total > previous {
                    self.last_activity = now;
                    PollOutcome::Grew { total }
                } else {
                    PollOutcome::Quiet
                }
            }
            Err(e) => {
                warn!(lesson_id, error = %e, "event log fetch failed, will retry");
                PollOutcome::Failed
            }
        }
    }
}

impl Default for EventPoller {
    fn default() -> Self {
        Self::new()
    }
}
