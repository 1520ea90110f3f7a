//! Recurring lesson generation pipeline.
//!
//! Expansion happens locally ([`crate::recurrence`]); submission is one
//! batch request whose created/skipped verdict belongs to the backend; and
//! student association afterwards is best effort, fully observed: every
//! (lesson, student) pair is attempted, failures are counted instead of
//! aborting, and nothing is retried automatically.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::Backend;
use crate::error::CoreError;
use crate::model::{GenerateOutcome, Lesson};
use crate::recurrence::RecurrenceRule;

/// Aggregate verdict of a cross-product association pass.
///
/// Partial failure is the expected shape here; it is reported, never
/// escalated to a hard error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl AssociationSummary {
    pub fn attempts(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Expand the rule and submit the candidate batch.
///
/// Validation failures surface before any I/O. An outright submission
/// failure means nothing is assumed created and no association may follow.
pub async fn submit_occurrences<A: Backend>(
    api: &A,
    rule: &RecurrenceRule,
) -> Result<GenerateOutcome, CoreError> {
    let candidates = rule.expand()?;
    let request = rule.to_request(candidates);
    Ok(api.generate_recurring(&request).await?)
}

/// Attach every selected student to every created lesson.
///
/// Each association is an independent call; one failure never blocks the
/// rest of the cross product.
pub async fn associate_students<A: Backend>(
    api: &A,
    lessons: &[Lesson],
    student_ids: &[i64],
) -> AssociationSummary {
    let mut summary = AssociationSummary::default();
    for lesson in lessons {
        for &student_id in student_ids {
            match api.associate_student(lesson.id, student_id).await {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    warn!(
                        lesson_id = lesson.id,
                        student_id,
                        error = %e,
                        "student association failed"
                    );
                    summary.failed += 1;
                }
            }
        }
    }
    summary
}

/// The full user-initiated flow: expand, submit, then associate the selected
/// students with whatever the backend actually created.
pub async fn generate_and_associate<A: Backend>(
    api: &A,
    rule: &RecurrenceRule,
    student_ids: &[i64],
) -> Result<(GenerateOutcome, AssociationSummary), CoreError> {
    let outcome = submit_occurrences(api, rule).await?;
    let summary = if outcome.lessons.is_empty() || student_ids.is_empty() {
        AssociationSummary::default()
    } else {
        associate_students(api, &outcome.lessons, student_ids).await
    };
    Ok((outcome, summary))
}
