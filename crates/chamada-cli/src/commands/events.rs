use clap::Subcommand;

use chamada_core::Backend;

use super::CommandResult;

#[derive(Subcommand)]
pub enum EventsAction {
    /// Print the lesson's scan-event log
    List { lesson_id: i64 },
    /// Wipe the lesson's scan-event log
    Clear {
        lesson_id: i64,
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(action: EventsAction, base_url: Option<&str>) -> CommandResult {
    let api = super::client(base_url)?;
    match action {
        EventsAction::List { lesson_id } => {
            let events = api.fetch_event_log(lesson_id).await?;
            if events.is_empty() {
                println!("no scan events for lesson {lesson_id}");
                return Ok(());
            }
            for event in &events {
                println!(
                    "{} {} {:<30} tag={} room={} scanner={} {}",
                    event.timestamp.format("%H:%M:%S"),
                    if event.success { "ok  " } else { "fail" },
                    event.student_name,
                    event.tag_id,
                    event.room,
                    event.esp32_id,
                    event.message
                );
            }
            println!("{} event(s)", events.len());
        }
        EventsAction::Clear { lesson_id, yes } => {
            if !yes {
                return Err("clearing the event log is permanent; re-run with --yes to confirm".into());
            }
            api.clear_event_log(lesson_id).await?;
            println!("event log of lesson {lesson_id} cleared");
        }
    }
    Ok(())
}
