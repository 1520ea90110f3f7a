use clap::Subcommand;

use chamada_core::Config;

use super::CommandResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Update configuration values
    Set {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        teacher_id: Option<i64>,
        /// Seconds between scan-event log fetches
        #[arg(long)]
        poll_interval: Option<u64>,
        /// Seconds of zero-event inactivity before polling suspends
        #[arg(long)]
        idle_suspend: Option<u64>,
    },
}

pub fn run(action: ConfigAction) -> CommandResult {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set {
            base_url,
            teacher_id,
            poll_interval,
            idle_suspend,
        } => {
            let mut config = Config::load_or_default();
            if let Some(url) = base_url {
                config.base_url = url;
            }
            if let Some(id) = teacher_id {
                config.teacher_id = Some(id);
            }
            if let Some(secs) = poll_interval {
                config.poll_interval_secs = secs;
            }
            if let Some(secs) = idle_suspend {
                config.idle_suspend_secs = secs;
            }
            config.save()?;
            println!("configuration updated");
        }
    }
    Ok(())
}
