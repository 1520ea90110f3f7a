//! CSV export of a lesson's attendance roster.

use csv::Writer;

use crate::error::CoreError;
use crate::model::Lesson;
use crate::roster::AttendanceStore;

/// Render the roster as CSV: `id,name,status`, one row per student, with
/// `Presente`/`Falta` for the status column.
pub fn roster_csv(store: &AttendanceStore) -> Result<String, CoreError> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(["id", "name", "status"])?;

    for row in store.rows() {
        wtr.write_record(&[
            row.student_id().to_string(),
            sanitize(&row.entry.student.name),
            if row.present() { "Presente" } else { "Falta" }.to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| CoreError::Custom(e.to_string()))?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| CoreError::Custom(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Custom(e.to_string()))
}

/// Suggested export file name, e.g. `presencas-aula-Matemática-2024-03-04.csv`.
pub fn export_file_name(lesson: &Lesson) -> String {
    format!(
        "presencas-aula-{}-{}.csv",
        sanitize(&lesson.subject),
        lesson.start_time.date_naive()
    )
}

fn sanitize(field: &str) -> String {
    field.replace([',', '\n'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{sample_entry, sample_lesson};
    use crate::model::RosterEntry;

    #[test]
    fn renders_header_and_status_rows() {
        let mut store = AttendanceStore::new(4);
        store.replace_all(vec![sample_entry(4, 12, true), sample_entry(4, 13, false)]);

        let csv = roster_csv(&store).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,name,status");
        assert_eq!(lines[1], "12,Student 12,Presente");
        assert_eq!(lines[2], "13,Student 13,Falta");
    }

    #[test]
    fn commas_and_newlines_in_names_are_flattened() {
        let mut entry: RosterEntry = sample_entry(4, 12, false);
        entry.student.name = "Souza, Ana\nMaria".into();
        let mut store = AttendanceStore::new(4);
        store.replace_all(vec![entry]);

        let csv = roster_csv(&store).unwrap();
        assert!(csv.contains("Souza  Ana Maria"));
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn file_name_uses_subject_and_start_date() {
        let lesson = sample_lesson(4, false);
        assert_eq!(
            export_file_name(&lesson),
            "presencas-aula-Matemática-2024-03-04.csv"
        );
    }
}
