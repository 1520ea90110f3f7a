//! In-memory attendance roster for one lesson.
//!
//! Two mutation paths write here: user toggles (optimistic, rolled back on
//! failure) and reconciling refreshes from the backend. The refresh always
//! wins. That ordering is enforced structurally: a toggle's outcome is only
//! applied while the row is still in the exact pending transition the toggle
//! started, so a refresh that lands mid-flight cannot be overwritten by a
//! stale commit or rollback.
//!
//! Identity key for all matching is the nested student's id. Association ids
//! are not stable across backend code paths and must not be used for lookup.

use crate::error::RosterError;
use crate::model::RosterEntry;

/// Presence of one student, as a small per-field state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Value confirmed by the backend (or reconciled from it).
    Confirmed(bool),
    /// Optimistic transition awaiting backend confirmation.
    Pending { prior: bool, target: bool },
}

impl Presence {
    /// The value a viewer should see right now.
    pub fn effective(&self) -> bool {
        match *self {
            Presence::Confirmed(v) => v,
            Presence::Pending { target, .. } => target,
        }
    }

    /// Whether an update is still awaiting confirmation.
    pub fn is_pending(&self) -> bool {
        matches!(self, Presence::Pending { .. })
    }
}

/// One roster row held locally.
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub entry: RosterEntry,
    presence: Presence,
}

impl RosterRow {
    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn present(&self) -> bool {
        self.presence.effective()
    }

    pub fn student_id(&self) -> i64 {
        self.entry.student.id
    }
}

/// Handle for completing an optimistic toggle.
///
/// Carries the exact transition it started so the completion can tell
/// whether the row still reflects that transition.
#[derive(Debug, Clone, Copy)]
pub struct ToggleTicket {
    pub student_id: i64,
    pub prior: bool,
    pub target: bool,
}

/// The roster for a single lesson.
#[derive(Debug, Clone)]
pub struct AttendanceStore {
    lesson_id: i64,
    rows: Vec<RosterRow>,
}

impl AttendanceStore {
    pub fn new(lesson_id: i64) -> Self {
        Self {
            lesson_id,
            rows: Vec::new(),
        }
    }

    pub fn lesson_id(&self) -> i64 {
        self.lesson_id
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Effective presence for a student, if they are on the roster.
    pub fn present(&self, student_id: i64) -> Option<bool> {
        self.row(student_id).map(RosterRow::present)
    }

    fn row(&self, student_id: i64) -> Option<&RosterRow> {
        self.rows.iter().find(|r| r.student_id() == student_id)
    }

    fn row_mut(&mut self, student_id: i64) -> Option<&mut RosterRow> {
        self.rows.iter_mut().find(|r| r.student_id() == student_id)
    }

    /// Reconciling path: replace the whole roster with the backend's view.
    /// Every row becomes `Confirmed`, discarding any pending transitions.
    pub fn replace_all(&mut self, entries: Vec<RosterEntry>) {
        self.rows = entries
            .into_iter()
            .map(|entry| RosterRow {
                presence: Presence::Confirmed(entry.present),
                entry,
            })
            .collect();
    }

    /// Start an optimistic toggle: flip the visible value immediately and
    /// return the ticket the network completion must present.
    pub fn begin_toggle(&mut self, student_id: i64) -> Result<ToggleTicket, RosterError> {
        let row = self
            .row_mut(student_id)
            .ok_or(RosterError::UnknownStudent(student_id))?;
        let prior = match row.presence {
            Presence::Confirmed(v) => v,
            Presence::Pending { .. } => return Err(RosterError::UpdateInFlight(student_id)),
        };
        let target = !prior;
        row.presence = Presence::Pending { prior, target };
        Ok(ToggleTicket {
            student_id,
            prior,
            target,
        })
    }

    /// Backend confirmed the toggle. No-op if a reconciling refresh already
    /// replaced the row -- the refreshed value is the server's truth.
    pub fn commit_toggle(&mut self, ticket: &ToggleTicket) {
        if let Some(row) = self.row_mut(ticket.student_id) {
            if row.presence
                == (Presence::Pending {
                    prior: ticket.prior,
                    target: ticket.target,
                })
            {
                row.presence = Presence::Confirmed(ticket.target);
            }
        }
    }

    /// Backend rejected the toggle: restore the exact prior value. Like
    /// `commit_toggle`, this never clobbers a refresh that landed first.
    pub fn rollback_toggle(&mut self, ticket: &ToggleTicket) {
        if let Some(row) = self.row_mut(ticket.student_id) {
            if row.presence
                == (Presence::Pending {
                    prior: ticket.prior,
                    target: ticket.target,
                })
            {
                row.presence = Presence::Confirmed(ticket.prior);
            }
        }
    }
}
