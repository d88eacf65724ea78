use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use chatbridge::Config;
use chatbridge::gateway;
use std::sync::Arc;
use tracing::info;

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(host) = host {
                config.gateway.host = host;
            }
            info!(
                config = %config.config_path.display(),
                model = %config.llm.model,
                "starting gateway"
            );
            gateway::run_gateway(Arc::new(config)).await
        }
        Commands::Config => {
            let rendered = toml::to_string_pretty(&config.redacted())
                .context("serialize effective config")?;
            println!("# {}", config.config_path.display());
            print!("{rendered}");
            Ok(())
        }
    }
}
