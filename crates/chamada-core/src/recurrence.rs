//! Recurrence expansion for lesson generation.
//!
//! Pure date arithmetic: a [`RecurrenceRule`] expands into the ordered list
//! of occurrence candidates inside its date range whose weekday is selected.
//! No I/O happens here; real conflict detection against existing lessons is
//! the backend's job and comes back in the generation response.

use chrono::{Datelike, NaiveDate, NaiveTime};
use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::model::{GenerateRequest, OccurrenceCandidate};

/// Inputs for recurring lesson generation.
///
/// Weekday selectors use 0 = Sunday .. 6 = Saturday, matching the backend
/// contract.
#[derive(Debug, Clone)]
pub struct RecurrenceRule {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub weekdays: Vec<u8>,
    pub start_hour: NaiveTime,
    pub end_hour: NaiveTime,
    pub subject: String,
    pub room: String,
    pub teacher_id: i64,
}

impl RecurrenceRule {
    /// Reject bad input before producing a single candidate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.from > self.to {
            return Err(ValidationError::InvertedRange {
                from: self.from,
                to: self.to,
            });
        }
        if self.weekdays.is_empty() {
            return Err(ValidationError::EmptyWeekdays);
        }
        if let Some(&bad) = self.weekdays.iter().find(|&&d| d > 6) {
            return Err(ValidationError::WeekdayOutOfRange(bad));
        }
        if self.start_hour >= self.end_hour {
            return Err(ValidationError::EmptyTimeWindow {
                start: self.start_hour,
                end: self.end_hour,
            });
        }
        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingField("subject"));
        }
        if self.room.trim().is_empty() {
            return Err(ValidationError::MissingField("room"));
        }
        Ok(())
    }

    /// Expand into ordered occurrence candidates, one per matching date.
    ///
    /// Deterministic and side-effect free. Each date inside `[from, to]`
    /// appears at most once, so no two candidates share
    /// (date, start time, room).
    pub fn expand(&self) -> Result<Vec<OccurrenceCandidate>, ValidationError> {
        self.validate()?;
        let selected: BTreeSet<u8> = self.weekdays.iter().copied().collect();
        let subject = self.subject.trim();
        let room = self.room.trim();

        let candidates = self
            .from
            .iter_days()
            .take_while(|d| *d <= self.to)
            .filter(|d| selected.contains(&(d.weekday().num_days_from_sunday() as u8)))
            .map(|date| OccurrenceCandidate {
                date,
                start_time: self.start_hour,
                end_time: self.end_hour,
                subject: subject.to_string(),
                room: room.to_string(),
                teacher_id: self.teacher_id,
            })
            .collect();

        Ok(candidates)
    }

    /// Build the batch submission payload from this rule and its expansion.
    pub fn to_request(&self, candidates: Vec<OccurrenceCandidate>) -> GenerateRequest {
        let mut weekdays: Vec<u8> = self
            .weekdays
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        weekdays.sort_unstable();
        GenerateRequest {
            room: self.room.trim().to_string(),
            subject: self.subject.trim().to_string(),
            teacher_id: self.teacher_id,
            from: self.from,
            to: self.to,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            weekdays,
            candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(from: &str, to: &str, weekdays: &[u8]) -> RecurrenceRule {
        RecurrenceRule {
            from: from.parse().unwrap(),
            to: to.parse().unwrap(),
            weekdays: weekdays.to_vec(),
            start_hour: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_hour: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            subject: "Matemática".into(),
            room: "101".into(),
            teacher_id: 9,
        }
    }

    #[test]
    fn expands_mondays_and_wednesdays_of_march_2024() {
        // 2024-03-01 is a Friday; the first Monday in range is 03-04.
        let candidates = rule("2024-03-01", "2024-03-15", &[1, 3]).expand().unwrap();
        let dates: Vec<String> = candidates.iter().map(|c| c.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2024-03-04", "2024-03-06", "2024-03-11", "2024-03-13"]
        );
        for c in &candidates {
            assert_eq!(c.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
            assert_eq!(c.end_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        }
    }

    #[test]
    fn rejects_inverted_range() {
        let err = rule("2024-03-15", "2024-03-01", &[1]).expand().unwrap_err();
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
    }

    #[test]
    fn rejects_empty_weekday_set() {
        let err = rule("2024-03-01", "2024-03-15", &[]).expand().unwrap_err();
        assert_eq!(err, ValidationError::EmptyWeekdays);
    }

    #[test]
    fn rejects_weekday_out_of_range() {
        let err = rule("2024-03-01", "2024-03-15", &[1, 7]).expand().unwrap_err();
        assert_eq!(err, ValidationError::WeekdayOutOfRange(7));
    }

    #[test]
    fn rejects_empty_time_window() {
        let mut r = rule("2024-03-01", "2024-03-15", &[1]);
        r.end_hour = r.start_hour;
        let err = r.expand().unwrap_err();
        assert!(matches!(err, ValidationError::EmptyTimeWindow { .. }));
    }

    #[test]
    fn rejects_blank_subject_and_room() {
        let mut r = rule("2024-03-01", "2024-03-15", &[1]);
        r.subject = "   ".into();
        assert_eq!(
            r.expand().unwrap_err(),
            ValidationError::MissingField("subject")
        );
        r.subject = "Física".into();
        r.room = "".into();
        assert_eq!(r.expand().unwrap_err(), ValidationError::MissingField("room"));
    }

    #[test]
    fn trims_subject_and_room_in_candidates() {
        let mut r = rule("2024-03-04", "2024-03-04", &[1]);
        r.subject = "  Química ".into();
        r.room = " 203 ".into();
        let candidates = r.expand().unwrap();
        assert_eq!(candidates[0].subject, "Química");
        assert_eq!(candidates[0].room, "203");
    }

    #[test]
    fn duplicate_weekday_selectors_do_not_duplicate_candidates() {
        let once = rule("2024-03-01", "2024-03-31", &[1]).expand().unwrap();
        let twice = rule("2024-03-01", "2024-03-31", &[1, 1]).expand().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn request_carries_sorted_unique_weekdays() {
        let r = rule("2024-03-01", "2024-03-15", &[3, 1, 3]);
        let candidates = r.expand().unwrap();
        let req = r.to_request(candidates.clone());
        assert_eq!(req.weekdays, vec![1, 3]);
        assert_eq!(req.candidates, candidates);
    }

    proptest! {
        /// Output length equals the count of in-range dates whose weekday is
        /// selected, and every produced date's weekday is in the selector set.
        #[test]
        fn expansion_matches_weekday_filter(
            start_offset in 0u64..2000,
            span in 0u64..120,
            mask in 1u8..128,
        ) {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
            let from = base + chrono::Days::new(start_offset);
            let to = from + chrono::Days::new(span);
            let weekdays: Vec<u8> = (0u8..7).filter(|d| mask & (1 << d) != 0).collect();

            let mut r = rule("2024-03-01", "2024-03-15", &weekdays);
            r.from = from;
            r.to = to;
            let candidates = r.expand().unwrap();

            let expected = from
                .iter_days()
                .take_while(|d| *d <= to)
                .filter(|d| weekdays.contains(&(d.weekday().num_days_from_sunday() as u8)))
                .count();
            prop_assert_eq!(candidates.len(), expected);
            for c in &candidates {
                prop_assert!(weekdays.contains(&(c.date.weekday().num_days_from_sunday() as u8)));
            }
            // Local sanity: never two candidates with the same occurrence key.
            let mut keys: Vec<_> = candidates
                .iter()
                .map(|c| (c.date, c.start_time, c.room.clone()))
                .collect();
            keys.dedup();
            prop_assert_eq!(keys.len(), candidates.len());
        }
    }
}
