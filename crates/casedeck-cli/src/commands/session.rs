use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::app::App;
use crate::output;

#[derive(Subcommand)]
pub enum SessionAction {
    /// List sessions (the active one is marked with *)
    List,
    /// Show the active session
    Current,
    /// Create a session and make it active
    Create {
        /// Title of the new session
        title: String,
    },
    /// Create a session with a timestamped default title
    New,
    /// Make a session active (by id or title)
    Switch { session: String },
    /// Clear the active session
    Clear,
    /// Rename a session (by id or title)
    Rename { session: String, title: String },
    /// Delete a session (by id or title)
    Delete { session: String },
}

pub async fn run(app: &mut App, action: SessionAction) -> Result<()> {
    app.init().await?;

    match action {
        SessionAction::List => {
            let sessions = app.store.sessions().await?;
            let active = app.store.active_session_id().await;
            output::print_sessions(&sessions, active.as_deref());
        }
        SessionAction::Current => match app.store.active_session().await {
            Some(session) => println!("{} {}", session.title.bold(), session.id.bright_black()),
            None => println!("{}", "No active session".bright_black()),
        },
        SessionAction::Create { title } => {
            let session = app.store.create(&title).await?;
            println!("{} {}", session.title.bold(), session.id.bright_black());
        }
        SessionAction::New => {
            let session = app.store.request_new_session().await?;
            println!("{} {}", session.title.bold(), session.id.bright_black());
        }
        SessionAction::Switch { session } => {
            let session = app.find_session(&session).await?;
            app.store.switch(Some(&session)).await?;
        }
        SessionAction::Clear => {
            app.store.switch(None).await?;
            println!("{}", "Active session cleared".bright_black());
        }
        SessionAction::Rename { session, title } => {
            let session = app.find_session(&session).await?;
            app.store.rename(&session, &title).await?;
        }
        SessionAction::Delete { session } => {
            let session = app.find_session(&session).await?;
            app.store.delete(&session).await?;
        }
    }
    Ok(())
}
