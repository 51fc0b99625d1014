//! Diagnostics sink: persists raw pages, parsed fragments and failure
//! context so extraction breakage can be investigated without re-fetching.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

/// Writes labelled artifacts into a debug directory. The sink owns file
/// naming and timestamping; callers only supply a label and content.
#[derive(Debug)]
pub struct DebugSink {
    dir: PathBuf,
}

impl DebugSink {
    /// Create the sink, making sure the target directory exists.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one artifact. Failures are logged and swallowed; losing a
    /// diagnostic must never change the outcome of an extraction.
    pub fn write(&self, label: &str, content: &str) {
        let name = format!("{}_{label}.txt", Utc::now().format("%Y%m%dT%H%M%S%3f"));
        let path = self.dir.join(name);
        if let Err(e) = fs::write(&path, content) {
            warn!(path = %path.display(), error = %e, "failed to write diagnostic");
        }
    }
}
