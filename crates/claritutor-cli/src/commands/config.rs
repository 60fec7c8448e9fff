//! AI provider configuration commands.

use anyhow::Result;
use clap::Subcommand;

use super::helpers::open_database;

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the current AI configuration
    Get,
    /// Set a configuration field
    Set {
        /// One of: provider, model, api_key, base_url, enabled
        key: String,
        /// New value; omit to clear
        value: Option<String>,
    },
}

/// Handle config commands
pub fn handle_config_command(action: ConfigAction) -> Result<()> {
    let db = open_database()?;

    match action {
        ConfigAction::Get => {
            let config = db.get_ai_config()?;
            println!("provider: {}", config.provider);
            println!("model:    {}", config.effective_model());
            println!("base_url: {}", config.effective_base_url());
            println!(
                "api_key:  {}",
                if config.api_key.is_some() {
                    "(configured)"
                } else if config.effective_api_key().is_some() {
                    "(from environment)"
                } else {
                    "(not set)"
                }
            );
            println!("enabled:  {}", config.enabled);
        }
        ConfigAction::Set { key, value } => {
            db.update_ai_config_field(&key, value.as_deref())?;
            println!("Updated {key}.");
        }
    }

    Ok(())
}
