use chrono::{NaiveDate, NaiveTime};
use clap::Args;

use chamada_core::{generate_and_associate, RecurrenceRule};

use super::CommandResult;

#[derive(Args)]
pub struct GenerateArgs {
    /// First date of the range (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub from: NaiveDate,
    /// Last date of the range (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub to: NaiveDate,
    /// Weekday selectors, comma separated, 0 = Sunday .. 6 = Saturday
    #[arg(long, value_delimiter = ',', required = true)]
    pub weekdays: Vec<u8>,
    /// Daily start time (HH:MM)
    #[arg(long, value_parser = parse_time, default_value = "08:00")]
    pub start: NaiveTime,
    /// Daily end time (HH:MM)
    #[arg(long, value_parser = parse_time, default_value = "10:00")]
    pub end: NaiveTime,
    /// Lesson subject
    #[arg(long)]
    pub subject: String,
    /// Room name
    #[arg(long)]
    pub room: String,
    /// Acting teacher (defaults to the configured one)
    #[arg(long)]
    pub teacher_id: Option<i64>,
    /// Students to associate with every created occurrence, comma separated
    #[arg(long, value_delimiter = ',')]
    pub students: Vec<i64>,
    /// Print the expanded candidates without submitting
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{raw}', expected HH:MM"))
}

pub async fn run(args: GenerateArgs, base_url: Option<&str>) -> CommandResult {
    let rule = RecurrenceRule {
        from: args.from,
        to: args.to,
        weekdays: args.weekdays,
        start_hour: args.start,
        end_hour: args.end,
        subject: args.subject,
        room: args.room,
        teacher_id: super::teacher_id(args.teacher_id)?,
    };

    if args.dry_run {
        let candidates = rule.expand()?;
        for c in &candidates {
            println!("{} {}-{} {} ({})", c.date, c.start_time, c.end_time, c.subject, c.room);
        }
        println!("{} candidate(s), nothing submitted", candidates.len());
        return Ok(());
    }

    let api = super::client(base_url)?;
    let (outcome, summary) = generate_and_associate(&api, &rule, &args.students).await?;

    println!(
        "created: {} | skipped: {}",
        outcome.created_count, outcome.skipped_count
    );
    for lesson in &outcome.lessons {
        println!(
            "  #{} {} {} ({})",
            lesson.id,
            lesson.start_time.format("%Y-%m-%d %H:%M"),
            lesson.subject,
            lesson.room
        );
    }
    if !args.students.is_empty() {
        println!(
            "associations: {} ok, {} failed",
            summary.succeeded, summary.failed
        );
        if summary.failed > 0 {
            println!("some associations failed; re-run `chamada attendance list` to check and retry manually");
        }
    }
    Ok(())
}
