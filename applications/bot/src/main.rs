/// Jukebox Bot - room music playback driven by chat commands
use clap::{Parser, Subcommand};
use jukebox_bot::{
    config::BotConfig,
    console::{ConsoleSession, SimulatedGateway},
    CommandParser, CommandSurface,
};
use jukebox_core::{SourceResolver, UserId};
use jukebox_playback::PlaybackDirector;
use jukebox_resolver::YtDlpResolver;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jukebox-bot")]
#[command(about = "Per-room music playback for chat rooms", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./jukebox.toml when present)
    #[arg(short, long, global = true, env = "JUKEBOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive console session against a simulated voice channel
    Run,
    /// Resolve a search query or URL and print the track
    Resolve {
        /// Search text or URL
        #[arg(required = true)]
        query: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jukebox_bot=info,jukebox_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = BotConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Run => run(config).await?,
        Commands::Resolve { query } => resolve(config, &query.join(" ")).await?,
    }

    Ok(())
}

async fn run(config: BotConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Jukebox console");
    tracing::info!("Prefixes: {:?}", config.bot.prefixes);
    tracing::info!("Idle timeout: {}s", config.playback.idle_timeout_secs);

    let director = Arc::new(PlaybackDirector::new(config.playback.clone()));
    let resolver = Arc::new(YtDlpResolver::new(config.resolver.clone()));
    let gateway = Arc::new(SimulatedGateway::new(Duration::from_secs(
        config.console.simulated_track_secs,
    )));

    let surface = CommandSurface::new(Arc::clone(&director), resolver, gateway);
    let session = ConsoleSession::new(surface, CommandParser::new(&config.bot), &config.console);

    tokio::select! {
        result = session.run() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
    }

    director.shutdown_all().await;
    tracing::info!("Jukebox stopped");
    Ok(())
}

async fn resolve(config: BotConfig, query: &str) -> anyhow::Result<()> {
    let resolver = YtDlpResolver::new(config.resolver);
    let track = resolver.resolve(query, UserId::new(0)).await?;

    println!("Title:    {}", track.title);
    if let Some(uploader) = &track.uploader {
        println!("Uploader: {uploader}");
    }
    if let Some(duration) = track.formatted_duration() {
        println!("Duration: {duration}");
    }
    println!("Page:     {}", track.page_url);
    println!("Stream:   {}", track.stream.url);
    Ok(())
}
