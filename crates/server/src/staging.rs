//! Upload staging: each uploaded document is written to its own temp file
//! so the converter can read it by path.

use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempPath;
use tracing::{debug, warn};

use doclift_ingest::document::file_extension;
use doclift_ingest::SourceRef;

/// Directory that holds in-flight uploads.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

/// An upload on disk. Removed by [`StagedFile::remove`], or on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    filename: String,
}

impl StagingArea {
    /// Use `dir` for staged uploads, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Write `bytes` to a uniquely named file that keeps the extension of
    /// `filename`.
    pub async fn stage(&self, filename: &str, bytes: Vec<u8>) -> io::Result<StagedFile> {
        let dir = self.dir.clone();
        let suffix = staged_suffix(filename);
        let path = tokio::task::spawn_blocking(move || -> io::Result<TempPath> {
            let mut file = tempfile::Builder::new()
                .prefix("doclift-")
                .suffix(&suffix)
                .tempfile_in(&dir)?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(file.into_temp_path())
        })
        .await
        .map_err(io::Error::other)??;

        debug!("Staged '{}' at {}", filename, path.display());
        Ok(StagedFile {
            path,
            filename: filename.to_string(),
        })
    }
}

impl StagedFile {
    #[cfg(test)]
    fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn source(&self) -> SourceRef {
        SourceRef::File {
            path: self.path.to_path_buf(),
            filename: self.filename.clone(),
        }
    }

    /// Delete the staged file. Failures are logged, never returned.
    pub fn remove(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            warn!("Failed to remove staged file {}: {e}", shown);
        }
    }
}

/// `.ext` taken from the upload name, or nothing when the extension is
/// missing or not plain alphanumerics.
fn staged_suffix(filename: &str) -> String {
    let ext = file_extension(filename);
    if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        format!(".{ext}")
    } else {
        String::new()
    }
}
