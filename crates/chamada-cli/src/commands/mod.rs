pub mod attendance;
pub mod config;
pub mod events;
pub mod generate;
pub mod lesson;
pub mod students;
pub mod watch;

use chamada_core::{ApiClient, Config};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Build the backend client from config, with an optional URL override.
pub fn client(base_url: Option<&str>) -> Result<ApiClient, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let url = base_url.unwrap_or(&config.base_url);
    Ok(ApiClient::new(url)?)
}

/// Resolve the acting teacher: explicit flag first, then configuration.
pub fn teacher_id(flag: Option<i64>) -> Result<i64, Box<dyn std::error::Error>> {
    flag.or_else(|| Config::load_or_default().teacher_id)
        .ok_or_else(|| "no teacher configured; pass --teacher-id or run `chamada config set --teacher-id <id>`".into())
}
