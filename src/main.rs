use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presale_admin::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "presale_admin=debug"
    } else {
        "presale_admin=info"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Commands::Init = cli.command {
        return commands::init().await;
    }

    let ctx = commands::Context::load(cli.url)?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Login { email, password } => commands::login(&ctx, email, password).await,
        Commands::Logout => commands::logout(&ctx).await,
        Commands::Whoami => commands::whoami(&ctx).await,
        Commands::Dashboard { format } => commands::dashboard(&ctx, format).await,
        Commands::Countdown { action } => commands::countdown(&ctx, action).await,
        Commands::LiveStats { action } => commands::live_stats(&ctx, action).await,
        Commands::Tokenomics { action } => commands::tokenomics(&ctx, action).await,
        Commands::Presale { action } => commands::presale(&ctx, action).await,
        Commands::Participants { action } => commands::participants(&ctx, action).await,
        Commands::Transactions { action } => commands::transactions(&ctx, action).await,
        Commands::Analytics { from, to, format } => {
            commands::analytics(&ctx, from, to, format).await
        }
        Commands::Newsletter { action } => commands::newsletter(&ctx, action).await,
        Commands::Admins { action } => commands::admins(&ctx, action).await,
    }
}
