//! # Chamada Core Library
//!
//! Client-side engine for classroom attendance management: a teacher
//! generates recurring lesson occurrences, associates students with them,
//! and tracks per-student attendance that is mutated both by direct toggles
//! and by unattended RFID tag scanners feeding the backend.
//!
//! ## Architecture
//!
//! - **Recurrence**: pure expansion of a date range, weekday filter and
//!   daily time window into occurrence candidates; the backend alone decides
//!   what actually gets created
//! - **Roster**: per-lesson attendance store with optimistic toggles,
//!   exact-value rollback and refresh-always-wins reconciliation
//! - **Poller**: caller-driven state machine that watches the append-only
//!   scan-event log and triggers reconciliation when it grows
//! - **Session**: per-lesson owner tying lesson state, roster and poller
//!   together, with pessimistic open/close
//! - **Api**: the REST backend as a trait collaborator, implemented over
//!   `reqwest`
//!
//! ## Key Components
//!
//! - [`RecurrenceRule`]: validated expansion input
//! - [`AttendanceStore`]: local roster state machine
//! - [`EventPoller`]: scan-event log watcher
//! - [`LessonSession`]: one open lesson view
//! - [`Backend`] / [`ApiClient`]: backend contract and HTTP implementation

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod model;
pub mod poller;
pub mod recurrence;
pub mod roster;
pub mod session;

pub use api::{ApiClient, Backend};
pub use config::Config;
pub use error::{ApiError, ConfigError, CoreError, RosterError, ValidationError};
pub use generate::{associate_students, generate_and_associate, submit_occurrences, AssociationSummary};
pub use model::{
    AttendanceEvent, GenerateOutcome, GenerateRequest, Lesson, LessonPatch, OccurrenceCandidate,
    RosterEntry, Student,
};
pub use poller::{EventPoller, PollOutcome, PollerState, POLL_INTERVAL};
pub use recurrence::RecurrenceRule;
pub use roster::{AttendanceStore, Presence, RosterRow, ToggleTicket};
pub use session::LessonSession;
