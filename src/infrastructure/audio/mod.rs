pub mod bytes_concatenator;
pub mod ffmpeg_concatenator;

pub use bytes_concatenator::ByteConcatenator;
pub use ffmpeg_concatenator::FfmpegConcatenator;

use crate::domain::tts::AudioFragment;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConcatError {
    #[error("no audio fragments to join")]
    NoFragments,
    #[error("i/o error while writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Tool {
        tool: String,
        status: String,
        stderr: String,
    },
}

impl ConcatError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ConcatError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Joins ordered audio fragments into one playable file
#[async_trait]
pub trait Concatenator: Send + Sync {
    /// Write the fragments, in the given order, as a single file at `dest`
    ///
    /// Nothing is left at `dest` when joining fails.
    async fn join(&self, fragments: &[AudioFragment], dest: &Path) -> Result<PathBuf, ConcatError>;
}

/// Sibling path used while an artifact is being written
pub(crate) fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    dest.with_file_name(name)
}

/// Create the parent directory of `dest` if needed
pub(crate) async fn ensure_parent(dest: &Path) -> Result<(), ConcatError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ConcatError::io(parent, e))?;
    }
    Ok(())
}

/// Move a finished partial file into place
pub(crate) async fn commit(partial: &Path, dest: &Path) -> Result<PathBuf, ConcatError> {
    if let Err(e) = tokio::fs::rename(partial, dest).await {
        let _ = tokio::fs::remove_file(partial).await;
        return Err(ConcatError::io(dest, e));
    }
    Ok(dest.to_path_buf())
}
