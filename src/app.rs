use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::LinkEnrichmentUseCase;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::infrastructure::csv::{TableReader, TableWriter};
use crate::infrastructure::service_clients::{SpotifyClient, YouTubeClient};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    /// TOML config file (default: ./playlist-interchange.toml when present)
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    #[command(about = "Parse a playlist file and print row and playlist counts")]
    Read {
        path: PathBuf,
        #[arg(long)]
        /// Print the parsed entries as JSON instead of counts
        json: bool,
    },
    #[command(about = "Read a playlist file and write it back out, checking the round trip")]
    Write { input: PathBuf, output: PathBuf },
    #[command(about = "Fill missing video links and write the result")]
    Enrich {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        /// Only enrich this playlist (full key, e.g. "003 The Elegant Affair")
        playlist: Option<String>,
        #[arg(long)]
        /// Also look up streaming playlist links for playlists that have none
        spotify: bool,
    },
}

/// Install the fmt subscriber; `RUST_LOG` wins over the configured filter
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = ConfigService::load(cli.config.as_deref())?;
    init_tracing(&config.log_filter);

    match cli.action {
        Action::Read { path, json } => read(&config, path, json),
        Action::Write { input, output } => write(&config, input, output),
        Action::Enrich {
            input,
            output,
            playlist,
            spotify,
        } => enrich(&config, input, output, playlist, spotify).await,
    }
}

fn read(config: &AppConfig, path: PathBuf, json: bool) -> Result<()> {
    let reader = TableReader::from_config(&config.interchange);
    let (table, stats) = reader.read_path_with_stats(&path)?;

    if json {
        let text = serde_json::to_string_pretty(&table)
            .map_err(|e| AppError::ValidationError(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!(
        "{} rows: {} songs across {} playlists ({} rows skipped)",
        stats.rows,
        table.len(),
        table.playlists().len(),
        stats.skipped()
    );
    for group in table.groups() {
        println!("  {} ({} songs)", group.playlist, group.entries.len());
    }
    Ok(())
}

fn write(config: &AppConfig, input: PathBuf, output: PathBuf) -> Result<()> {
    let reader = TableReader::from_config(&config.interchange);
    let writer = TableWriter::from_config(&config.interchange);

    let table = reader.read_path(&input)?;
    writer.write_path(&table, &output)?;

    let reread = reader.read_path(&output)?;
    if reread != table {
        return Err(AppError::ValidationError(format!(
            "Round trip changed the table: {} entries written, {} read back",
            table.len(),
            reread.len()
        )));
    }

    println!(
        "Wrote {} songs across {} playlists to {}",
        table.len(),
        table.playlists().len(),
        output.display()
    );
    Ok(())
}

async fn enrich(
    config: &AppConfig,
    input: PathBuf,
    output: PathBuf,
    playlist: Option<String>,
    spotify: bool,
) -> Result<()> {
    let reader = TableReader::from_config(&config.interchange);
    let writer = TableWriter::from_config(&config.interchange);
    let mut table = reader.read_path(&input)?;

    let mut use_case =
        LinkEnrichmentUseCase::new(Arc::new(YouTubeClient::from_config(&config.services)?));
    if spotify {
        use_case = use_case.with_playlist_lookup(Arc::new(SpotifyClient::from_config(
            &config.services,
        )?));
    }

    let report = use_case
        .fill_video_links(&mut table, playlist.as_deref())
        .await?;

    if spotify {
        let account_id = config.services.spotify_account_id.as_deref().ok_or_else(|| {
            AppError::ConfigError("services.spotify_account_id is required".to_string())
        })?;

        let targets: Vec<String> = match &playlist {
            Some(key) => vec![key.clone()],
            None => table.playlists().into_iter().map(str::to_string).collect(),
        };
        for key in targets {
            if table.spotify_link(&key).map_or(true, |link| !link.is_empty()) {
                continue;
            }
            match use_case.resolve_playlist_link(&mut table, account_id, &key).await {
                Ok(Some(_)) => {}
                Ok(None) => tracing::info!(playlist = %key, "No streaming playlist found"),
                Err(AppError::QuotaExceeded(msg)) => {
                    tracing::warn!(reason = %msg, "Stopping playlist lookups");
                    break;
                }
                Err(err) => tracing::warn!(playlist = %key, error = %err, "Playlist lookup failed"),
            }
        }
    }

    // Partial progress is saved even when the quota ran out
    writer.write_path(&table, &output)?;

    let summary = serde_json::to_string_pretty(&report)
        .map_err(|e| AppError::ValidationError(format!("Failed to encode JSON: {}", e)))?;
    println!("{}", summary);
    Ok(())
}
