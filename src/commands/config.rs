use crate::cli::ConfigCommands;
use crate::models::config::AppConfig;
use crate::services::config::ConfigManager;

pub fn run(manager: &ConfigManager, command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = manager.load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Path => {
            println!("{}", manager.config_file_path().display());
        }
        ConfigCommands::Init { force } => {
            if manager.config_exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    manager.config_file_path().display()
                );
            }
            manager.save(&AppConfig::default())?;
            tracing::info!(path = %manager.config_file_path().display(), "wrote default config");
            println!("{}", manager.config_file_path().display());
        }
    }
    Ok(())
}
