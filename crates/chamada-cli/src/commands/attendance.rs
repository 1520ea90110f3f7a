use clap::Subcommand;
use std::path::PathBuf;

use chamada_core::export::{export_file_name, roster_csv};
use chamada_core::{Backend, LessonSession};

use super::CommandResult;

#[derive(Subcommand)]
pub enum AttendanceAction {
    /// List the roster with presence flags
    List { lesson_id: i64 },
    /// Flip one student's presence (optimistic, rolled back on failure)
    Toggle { lesson_id: i64, student_id: i64 },
    /// Export the roster as CSV
    Export {
        lesson_id: i64,
        /// Output file; defaults to `presencas-aula-<subject>-<date>.csv`.
        /// Pass `-` to write to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub async fn run(action: AttendanceAction, base_url: Option<&str>) -> CommandResult {
    let api = super::client(base_url)?;
    match action {
        AttendanceAction::List { lesson_id } => {
            let roster = api.fetch_roster(lesson_id).await?;
            if roster.is_empty() {
                println!("no students on lesson {lesson_id}");
                return Ok(());
            }
            for entry in roster {
                println!(
                    "{:>6}  {:<30} {}  {}",
                    entry.student.id,
                    entry.student.name,
                    if entry.present { "present" } else { "absent " },
                    entry.student.tag_id.as_deref().unwrap_or("-")
                );
            }
        }
        AttendanceAction::Toggle {
            lesson_id,
            student_id,
        } => {
            let mut session = LessonSession::load(&api, lesson_id).await?;
            let present = session.toggle(&api, student_id).await?;
            println!(
                "student {student_id} marked {}",
                if present { "present" } else { "absent" }
            );
        }
        AttendanceAction::Export { lesson_id, out } => {
            let session = LessonSession::load(&api, lesson_id).await?;
            let csv = roster_csv(session.store())?;
            match out {
                Some(path) if path.as_os_str() == "-" => print!("{csv}"),
                Some(path) => {
                    std::fs::write(&path, &csv)?;
                    println!("wrote {}", path.display());
                }
                None => {
                    let name = export_file_name(session.lesson());
                    std::fs::write(&name, &csv)?;
                    println!("wrote {name}");
                }
            }
        }
    }
    Ok(())
}
