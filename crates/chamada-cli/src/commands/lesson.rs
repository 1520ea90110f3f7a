use chrono::Utc;
use clap::Subcommand;

use chamada_core::{Backend, LessonPatch, LessonSession};

use super::CommandResult;

#[derive(Subcommand)]
pub enum LessonAction {
    /// List the configured teacher's lessons
    List {
        #[arg(long)]
        teacher_id: Option<i64>,
    },
    /// Show one lesson as JSON
    Show { id: i64 },
    /// Open a lesson for attendance (starts the scanners' window)
    Open { id: i64 },
    /// Close a lesson
    Close { id: i64 },
    /// Edit subject and/or room
    Edit {
        id: i64,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        room: Option<String>,
    },
    /// Delete a lesson
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(action: LessonAction, base_url: Option<&str>) -> CommandResult {
    let api = super::client(base_url)?;
    match action {
        LessonAction::List { teacher_id } => {
            let teacher_id = super::teacher_id(teacher_id)?;
            let lessons = api.lessons_by_teacher(teacher_id).await?;
            if lessons.is_empty() {
                println!("no lessons for teacher {teacher_id}");
                return Ok(());
            }
            for lesson in lessons {
                println!(
                    "#{} {} {} ({}) [{}]",
                    lesson.id,
                    lesson.start_time.format("%Y-%m-%d %H:%M"),
                    lesson.subject,
                    lesson.room,
                    if lesson.opened { "open" } else { "closed" }
                );
            }
        }
        LessonAction::Show { id } => {
            let lesson = api.fetch_lesson(id).await?;
            println!("{}", serde_json::to_string_pretty(&lesson)?);
        }
        LessonAction::Open { id } => {
            let mut session = LessonSession::load(&api, id).await?;
            session.open(&api, Utc::now()).await?;
            println!(
                "lesson {id} opened, {} student(s) on the roster",
                session.store().len()
            );
        }
        LessonAction::Close { id } => {
            let mut session = LessonSession::load(&api, id).await?;
            session.close(&api).await?;
            println!("lesson {id} closed");
        }
        LessonAction::Edit { id, subject, room } => {
            if subject.is_none() && room.is_none() {
                return Err("nothing to change; pass --subject and/or --room".into());
            }
            let patch = LessonPatch {
                subject,
                room,
                ..LessonPatch::default()
            };
            let lesson = api.update_lesson(id, &patch).await?;
            println!("lesson {} updated: {} ({})", lesson.id, lesson.subject, lesson.room);
        }
        LessonAction::Delete { id, yes } => {
            if !yes {
                return Err("deletion is permanent; re-run with --yes to confirm".into());
            }
            api.delete_lesson(id).await?;
            println!("lesson {id} deleted");
        }
    }
    Ok(())
}
