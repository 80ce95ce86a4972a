use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::app::App;

#[derive(Subcommand)]
pub enum DocumentAction {
    /// Upload a requirements document (.pdf, .docx, .doc, .txt, .md) into the active session
    Upload {
        path: PathBuf,
        /// Generate test cases right after the upload
        #[arg(long)]
        analyze: bool,
    },
    /// Generate test cases from an uploaded document
    Analyze {
        /// Id returned by `document upload`
        file_id: String,
    },
}

pub async fn run(app: &mut App, action: DocumentAction) -> Result<()> {
    app.init().await?;

    match action {
        DocumentAction::Upload { path, analyze } => {
            let document = app.documents.upload_path(&path).await?;
            println!(
                "{} {}",
                document.file_name.bold(),
                format!("(file id {})", document.id).bright_black()
            );
            if let Some(content) = &document.extracted_content {
                let preview: String = content.chars().take(200).collect();
                println!("{}", preview.bright_black());
            }
            app.flush_notifications();
            if analyze {
                analyze_document(app, &document.id).await?;
            }
        }
        DocumentAction::Analyze { file_id } => analyze_document(app, &file_id).await?,
    }
    Ok(())
}

async fn analyze_document(app: &mut App, file_id: &str) -> Result<()> {
    println!("{}", "Analyzing document, this may take a while...".bright_black());
    let summary = app.documents.analyze(file_id).await?;
    println!(
        "Generated {} test cases{}",
        summary.test_cases_count.to_string().bold(),
        if summary.message.is_empty() {
            String::new()
        } else {
            format!(" ({})", summary.message)
        }
    );
    Ok(())
}
