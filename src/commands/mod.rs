pub mod config;
pub mod decode;
pub mod parse;
pub mod regions;
pub mod scan;

use crate::cli::{Cli, Commands};
use crate::models::config::AppConfig;
use crate::services::config::ConfigManager;
use crate::services::registry::ProfileRegistry;
use crate::services::session::ScanSession;
use crate::services::ui_sink::{ConsoleSink, UiSink};
use std::sync::Arc;

/// Everything a command needs, built once from the loaded configuration
pub struct AppContext {
    pub manager: ConfigManager,
    pub config: AppConfig,
    pub registry: Arc<ProfileRegistry>,
}

pub fn config_manager(cli: &Cli) -> anyhow::Result<ConfigManager> {
    Ok(match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    })
}

impl AppContext {
    pub fn load(manager: ConfigManager) -> anyhow::Result<Self> {
        let config = manager.load()?;
        let registry = Arc::new(ProfileRegistry::with_custom(&config.regions.custom_profiles)?);

        tracing::debug!(
            path = %manager.config_file_path().display(),
            regions = registry.len(),
            "configuration loaded"
        );

        Ok(Self {
            manager,
            config,
            registry,
        })
    }

    /// Session reporting to the terminal, optionally pinned to a region
    pub fn session(&self, region: Option<&str>) -> anyhow::Result<Arc<ScanSession>> {
        let sink: Arc<dyn UiSink> = Arc::new(ConsoleSink);
        let session = Arc::new(ScanSession::new(
            Arc::clone(&self.registry),
            &self.config.regions.default_region,
            sink,
        ));
        if let Some(region) = region {
            session.select_region(region)?;
        }
        Ok(session)
    }
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let manager = config_manager(&cli)?;

    // Config commands must work even when the file on disk is invalid
    match cli.command {
        Commands::Config { command } => config::run(&manager, command),
        command => execute(&AppContext::load(manager)?, command).await,
    }
}

async fn execute(ctx: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Regions => regions::list(ctx),
        Commands::Parse { file, region } => parse::run(ctx, &file, region.as_deref()).await,
        Commands::Decode { image, region } => decode::run(ctx, &image, region.as_deref()).await,
        Commands::Scan {
            frames,
            duration_secs,
            frame_period_ms,
            captures,
            region,
        } => {
            scan::run(
                ctx,
                scan::ScanArgs {
                    frames,
                    duration_secs,
                    frame_period_ms,
                    captures,
                    region,
                },
            )
            .await
        }
        Commands::Config { command } => config::run(&ctx.manager, command),
    }
}
