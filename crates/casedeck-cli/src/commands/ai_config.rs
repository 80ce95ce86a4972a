use anyhow::Result;
use casedeck_core::ai_config::AiConfigurationDraft;
use clap::Subcommand;

use crate::app::App;
use crate::output;

#[derive(Subcommand)]
pub enum AiConfigAction {
    /// List AI provider configurations
    List,
    /// Add an AI provider configuration
    Add {
        #[arg(long)]
        provider: String,
        /// Endpoint URL, e.g. https://api.openai.com/v1
        #[arg(long)]
        endpoint: String,
        #[arg(long)]
        model: String,
        #[arg(long, env = "CASEDECK_AI_API_KEY", hide_env_values = true)]
        api_key: String,
        #[arg(long)]
        user_id: Option<String>,
        /// Store the configuration without activating it
        #[arg(long)]
        inactive: bool,
    },
}

pub async fn run(app: &mut App, action: AiConfigAction) -> Result<()> {
    match action {
        AiConfigAction::List => {
            let configs = app.cache.ai_configurations().await?;
            output::print_ai_configurations(&configs);
        }
        AiConfigAction::Add {
            provider,
            endpoint,
            model,
            api_key,
            user_id,
            inactive,
        } => {
            let draft = AiConfigurationDraft {
                provider,
                api_endpoint: endpoint,
                model_name: model,
                api_key,
                user_id,
                is_active: !inactive,
            };
            let created = app.cache.create_ai_configuration(&draft).await?;
            output::print_ai_configurations(std::slice::from_ref(&created));
        }
    }
    Ok(())
}
