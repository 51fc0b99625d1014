//! Streams a resolved media URL to local storage.

use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::StreamExt;
use reqwest::Client;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// How often progress updates are emitted while streaming.
const PROGRESS_INTERVAL_MS: u128 = 100;

#[derive(Debug, Clone)]
pub struct DownloadProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
    /// Bytes per second over the last progress interval.
    pub speed: u64,
    pub percent: f64,
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("http error {0}")]
    Http(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stream `url` into `path`, reporting progress at most every 100ms.
///
/// Returns the number of bytes written. The partially written file is
/// removed when the stream fails midway.
pub async fn download_to_file(
    client: &Client,
    url: &str,
    path: &Path,
    mut on_progress: impl FnMut(&DownloadProgress),
) -> Result<u64, DownloadError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Http(status));
    }

    let total = response.content_length();
    let mut downloaded: u64 = 0;
    let mut last_emit = Instant::now();
    let mut last_downloaded: u64 = 0;

    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(path).await;
                return Err(DownloadError::Request(e));
            }
        };
        downloaded += chunk.len() as u64;
        file.write_all(&chunk).await?;

        if last_emit.elapsed().as_millis() >= PROGRESS_INTERVAL_MS {
            let elapsed = last_emit.elapsed().as_secs_f64();
            let speed = if elapsed > 0.0 {
                ((downloaded - last_downloaded) as f64 / elapsed) as u64
            } else {
                0
            };
            on_progress(&DownloadProgress {
                downloaded,
                total,
                speed,
                percent: percent_of(downloaded, total),
            });
            last_emit = Instant::now();
            last_downloaded = downloaded;
        }
    }

    file.flush().await?;

    on_progress(&DownloadProgress {
        downloaded,
        total,
        speed: 0,
        percent: 100.0,
    });

    Ok(downloaded)
}

fn percent_of(downloaded: u64, total: Option<u64>) -> f64 {
    match total {
        Some(total) if total > 0 => (downloaded as f64 / total as f64) * 100.0,
        _ => 0.0,
    }
}

/// Produce a path in `dir` that does not collide with an existing file:
/// `name.mp4`, `name_1.mp4`, `name_2.mp4`, ...
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (file_name, None),
    };

    for n in 1u32.. {
        let name = match ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("ran out of filename suffixes")
}
