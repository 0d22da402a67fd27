use anyhow::Result;
use clap::Parser;
use confect_server::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Confect - storefront and back-office gateway for the commerce API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("confect=debug,tower_http=debug")),
        )
        .init();

    let settings = Settings::load(cli.config.as_deref())?;
    info!(
        "Proxying commerce API at {} ({})",
        settings.upstream.base_url,
        if settings.environment.is_production() {
            "production"
        } else {
            "development"
        }
    );

    confect_server::serve(settings).await?;

    Ok(())
}
