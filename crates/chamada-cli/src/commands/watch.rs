use chrono::Utc;
use clap::Args;
use std::time::Duration;
use tracing::warn;

use chamada_core::{Config, LessonSession, PollOutcome};

use super::CommandResult;

#[derive(Args)]
pub struct WatchArgs {
    pub lesson_id: i64,
    /// Open the lesson first if it is closed
    #[arg(long)]
    pub open: bool,
}

pub async fn run(args: WatchArgs, base_url: Option<&str>) -> CommandResult {
    let api = super::client(base_url)?;
    let config = Config::load_or_default();

    let mut session = LessonSession::load(&api, args.lesson_id).await?;
    session.set_idle_suspend_secs(config.idle_suspend_secs);
    if args.open {
        session.open(&api, Utc::now()).await?;
        println!("lesson {} opened", args.lesson_id);
    }
    if !session.lesson().opened {
        return Err("lesson is closed; pass --open to open it first".into());
    }

    println!(
        "watching lesson {} ({} student(s) on the roster), ctrl-c to stop",
        args.lesson_id,
        session.store().len()
    );

    // Fixed-cadence driver for the poller. Skipping missed ticks keeps a
    // slow backend from piling up fetches.
    let mut ticker = tokio::time::interval(Duration::from_secs(config.poll_interval_secs.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut printed = 0usize;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                match session.poll(&api, Utc::now()).await {
                    Ok(PollOutcome::Grew { total }) => {
                        for event in &session.events()[printed..] {
                            println!(
                                "{} {} {} ({})",
                                event.timestamp.format("%H:%M:%S"),
                                if event.success { "ok  " } else { "fail" },
                                event.student_name,
                                event.message
                            );
                        }
                        printed = total;
                        let present = session.store().rows().iter().filter(|r| r.present()).count();
                        println!("-- roster reconciled: {present}/{} present", session.store().len());
                    }
                    Ok(PollOutcome::Suspended) => {
                        println!(
                            "no scan events for {}s, polling suspended (re-run to resume)",
                            config.idle_suspend_secs
                        );
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "roster reconciliation failed"),
                }
            }
        }
    }

    println!("stopped watching lesson {}", args.lesson_id);
    Ok(())
}
