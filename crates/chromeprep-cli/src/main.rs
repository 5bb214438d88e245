//! chromeprep CLI entry point

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chromeprep_cli::cmd;
use chromeprep_cli::ui::Output;
use chromeprep_cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        Output::new().error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Fetch {
            target,
            output,
            fallback_build,
        } => cmd::fetch::fetch(&target, output, fallback_build).await,
        Commands::Embed {
            target,
            staging_dir,
            fallback_build,
        } => cmd::embed::embed(&target, &staging_dir, fallback_build).await,
        Commands::Rename { target, output } => cmd::rename::rename(&target, output),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}
