use std::path::PathBuf;

use anyhow::Context;
use bookcase_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Server-rendered book catalog
#[derive(Debug, Parser)]
#[command(name = "bookcase", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,

        /// JSON file of books to load at startup
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Print the resolved configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookcase settings")?;

    match cli.command {
        Command::Serve { port, seed } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(seed) = seed {
                settings.database.seed_file = Some(seed);
            }

            bookcase_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                port = settings.server.port,
                "bookcase serve starting"
            );
            bookcase_app::run(settings).await
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to serialize settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
