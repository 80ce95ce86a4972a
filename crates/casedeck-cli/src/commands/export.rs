use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::case::FilterArgs;
use crate::app::App;

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Directory to write the workbook to (defaults to the configured export dir)
    #[arg(long, short)]
    pub out_dir: Option<PathBuf>,
}

pub async fn run(app: &mut App, args: ExportArgs) -> Result<()> {
    app.init().await?;
    app.require_active_session().await?;

    let dir = args
        .out_dir
        .unwrap_or_else(|| app.config.export_dir_path());
    if let Some(path) = app
        .exporter
        .export_view(&app.store, &args.filter.criteria(), &dir)
        .await?
    {
        println!("{}", path.display());
    }
    Ok(())
}
