//! Command-line surface and the per-URL orchestration loop.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use reqwest::Client;
use tracing::warn;

use crate::config::Config;
use crate::diagnostics::DebugSink;
use crate::downloader::{self, DownloadProgress};
use crate::extractor::{MediaPost, MediaResolver};
use crate::fetcher::FetchSettings;
use crate::metadata::{self, MediaSidecar};
use crate::shortcode::extract_shortcode;

/// Download Instagram videos from post, reel and tv URLs.
#[derive(Parser)]
#[command(name = "reelgrab", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory downloads are written to
    #[arg(short, long, global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Suppress progress and status output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Persist extraction artifacts for troubleshooting
    #[arg(long, global = true)]
    pub debug: bool,

    /// Where debug artifacts are written (implies --debug)
    #[arg(long, global = true, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Write a JSON metadata sidecar next to each video
    #[arg(long, global = true)]
    pub save_metadata: bool,

    /// Keep going when a URL fails instead of stopping
    #[arg(long, global = true)]
    pub continue_on_error: bool,

    /// Skip URLs whose video file already exists
    #[arg(long, global = true)]
    pub skip_existing: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a single post or reel
    Download {
        /// Content URL, e.g. https://www.instagram.com/reel/ABC123/
        url: String,
    },
    /// Download several URLs in sequence
    Batch {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Read URLs from a file, one per line ('#' starts a comment)
    FromFile { path: PathBuf },
}

enum UrlOutcome {
    Downloaded(PathBuf),
    Skipped(String),
}

/// Run the CLI to completion. Returns the process exit code: 1 when no
/// URL succeeded, 0 otherwise.
pub async fn run(cli: Cli) -> Result<i32> {
    let config = Config::from_env().context("failed to load configuration")?;

    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.output_dir()));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let sink = if cli.debug || cli.debug_dir.is_some() {
        let dir = cli.debug_dir.clone().unwrap_or_else(|| PathBuf::from("debug"));
        Some(DebugSink::new(&dir).with_context(|| {
            format!("failed to create debug directory {}", dir.display())
        })?)
    } else {
        None
    };

    let urls = match &cli.command {
        Commands::Download { url } => vec![url.clone()],
        Commands::Batch { urls } => urls.clone(),
        Commands::FromFile { path } => read_url_file(path)?,
    };

    let resolver = MediaResolver::new(FetchSettings::from_config(&config))
        .context("failed to build resolver")?;
    let media_client = Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .user_agent(config.desktop_user_agent())
        .build()
        .context("failed to build download client")?;

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for url in &urls {
        match process_url(url, &cli, &resolver, &media_client, &output_dir, sink.as_ref()).await {
            Ok(UrlOutcome::Downloaded(path)) => {
                succeeded += 1;
                if !cli.quiet {
                    println!("{} {}", "saved".green().bold(), path.display());
                }
            }
            Ok(UrlOutcome::Skipped(shortcode)) => {
                succeeded += 1;
                if !cli.quiet {
                    println!("{} {} already downloaded", "skip".yellow().bold(), shortcode);
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {:#}", "error".red().bold(), url, e);
                if !cli.continue_on_error && urls.len() > 1 {
                    eprintln!("stopping; pass --continue-on-error to keep going");
                    break;
                }
            }
        }
    }

    if !cli.quiet && urls.len() > 1 {
        println!("{succeeded} downloaded, {failed} failed");
    }

    Ok(if succeeded == 0 && failed > 0 { 1 } else { 0 })
}

async fn process_url(
    url: &str,
    cli: &Cli,
    resolver: &MediaResolver,
    media_client: &Client,
    output_dir: &Path,
    sink: Option<&DebugSink>,
) -> Result<UrlOutcome> {
    let shortcode = extract_shortcode(url)?;

    if cli.skip_existing && output_dir.join(format!("{shortcode}.mp4")).exists() {
        return Ok(UrlOutcome::Skipped(shortcode));
    }

    let post = resolver.resolve(&shortcode, sink).await?;

    let video_path = downloader::unique_path(output_dir, &post.file_name);
    download_with_progress(media_client, &post.media_url, &video_path, cli.quiet)
        .await
        .with_context(|| format!("failed to download {}", post.media_url))?;

    save_thumbnail(media_client, &post, &video_path).await;

    if cli.save_metadata {
        let sidecar_path = video_path.with_extension("json");
        let file_name = video_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| post.file_name.clone());
        metadata::write_sidecar(&sidecar_path, &MediaSidecar::new(&post, &file_name))
            .with_context(|| format!("failed to write {}", sidecar_path.display()))?;
    }

    Ok(UrlOutcome::Downloaded(video_path))
}

async fn download_with_progress(
    client: &Client,
    url: &str,
    path: &Path,
    quiet: bool,
) -> Result<u64, downloader::DownloadError> {
    let bytes = downloader::download_to_file(client, url, path, |progress| {
        if !quiet {
            print_progress(progress);
        }
    })
    .await?;
    if !quiet {
        eprintln!();
    }
    Ok(bytes)
}

fn print_progress(progress: &DownloadProgress) {
    if progress.total.is_some() {
        eprint!(
            "\r  {:>5.1}%  {:>10}/s",
            progress.percent,
            human_bytes(progress.speed)
        );
    } else {
        eprint!(
            "\r  {:>10}  {:>10}/s",
            human_bytes(progress.downloaded),
            human_bytes(progress.speed)
        );
    }
    let _ = io::stderr().flush();
}

/// The thumbnail is best-effort: a failure is logged, never fatal.
async fn save_thumbnail(client: &Client, post: &MediaPost, video_path: &Path) {
    if post.thumbnail_url.is_empty() {
        return;
    }
    let thumb_path = video_path.with_extension("jpg");
    if let Err(e) =
        downloader::download_to_file(client, &post.thumbnail_url, &thumb_path, |_| {}).await
    {
        warn!(url = %post.thumbnail_url, error = %e, "thumbnail download failed");
    }
}

fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read url file {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
