use clap::Subcommand;

use chamada_core::Backend;

use super::CommandResult;

#[derive(Subcommand)]
pub enum StudentsAction {
    /// List students, optionally filtered by name or tag substring
    List {
        #[arg(long)]
        query: Option<String>,
    },
}

pub async fn run(action: StudentsAction, base_url: Option<&str>) -> CommandResult {
    let api = super::client(base_url)?;
    match action {
        StudentsAction::List { query } => {
            let query = query.unwrap_or_default();
            let students: Vec<_> = api
                .list_students()
                .await?
                .into_iter()
                .filter(|s| s.matches(&query))
                .collect();
            if students.is_empty() {
                println!("no matching students");
                return Ok(());
            }
            for student in students {
                println!(
                    "{:>6}  {:<30} {}",
                    student.id,
                    student.name,
                    student.tag_id.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}
