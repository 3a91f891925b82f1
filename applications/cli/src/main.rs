/// Resona - terminal music session
use clap::{Args, Parser, Subcommand};
use resona_cli::{open_playlists, render, Session, SessionConfig, StreamModeSetting};
use resona_gateway_client::GatewayClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "resona")]
#[command(about = "Search, queue and play music from a streaming gateway", long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Flags that take precedence over the config file and environment
#[derive(Args)]
struct Overrides {
    /// Configuration file path (default: ./resona.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Gateway API base URL
    #[arg(long, global = true)]
    gateway_url: Option<String>,

    /// Directory for persisted playlists
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Resolve stream URLs through the gateway before playing
    #[arg(long, global = true)]
    resolved: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Session {
        /// Keep playlists in memory only
        #[arg(long)]
        ephemeral: bool,
    },
    /// Search once and print the results
    Search {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Print the saved playlists
    Playlists,
    /// Check gateway health
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resona=warn,resona_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = SessionConfig::load(cli.overrides.config.as_deref())?;
    apply_overrides(&mut config, &cli.overrides);

    match cli.command {
        Commands::Session { ephemeral } => {
            config.validate()?;
            let mut session = Session::open(&config, ephemeral)?;
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            session.run(stdin.lock(), &mut stdout).await?;
        }
        Commands::Search { query, limit } => {
            if let Some(limit) = limit {
                config.gateway.search_limit = limit;
            }
            config.validate()?;
            search(&config, &query.join(" ")).await?;
        }
        Commands::Playlists => {
            config.validate()?;
            let store = open_playlists(&config, false)?;
            let lines = render::playlists(&store, resona_playback::QueueState::Idle);
            println!("{}", lines.join("\n"));
        }
        Commands::Health => {
            config.validate()?;
            health(&config).await?;
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut SessionConfig, overrides: &Overrides) {
    if let Some(url) = &overrides.gateway_url {
        config.gateway.url = url.clone();
    }
    if let Some(dir) = &overrides.data_dir {
        config.storage.data_dir = dir.clone();
    }
    if overrides.resolved {
        config.playback.stream_mode = StreamModeSetting::Resolved;
    }
}

async fn search(config: &SessionConfig, query: &str) -> anyhow::Result<()> {
    let client = GatewayClient::new(config.gateway_config())?;
    let tracks = client.search_tracks(query).await?;

    for line in render::search_results(&tracks) {
        println!("{line}");
    }
    Ok(())
}

async fn health(config: &SessionConfig) -> anyhow::Result<()> {
    let client = GatewayClient::new(config.gateway_config())?;
    let health = client.health().await?;

    println!("gateway: {}", health.status);
    if let Some(backend) = &health.backend {
        println!("backend: {backend}");
    }
    if let Some(error) = &health.error {
        println!("error: {error}");
    }

    if !health.is_healthy() {
        anyhow::bail!("gateway is unhealthy");
    }
    Ok(())
}
