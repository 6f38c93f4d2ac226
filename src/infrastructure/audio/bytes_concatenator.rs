use super::{commit, ensure_parent, partial_path, ConcatError, Concatenator};
use crate::domain::tts::AudioFragment;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Appends MP3 fragments back to back
///
/// MP3 streams are frame based, so plain concatenation plays back in order.
/// No external tool is needed.
#[derive(Debug, Default, Clone)]
pub struct ByteConcatenator;

impl ByteConcatenator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Concatenator for ByteConcatenator {
    async fn join(&self, fragments: &[AudioFragment], dest: &Path) -> Result<PathBuf, ConcatError> {
        if fragments.is_empty() {
            return Err(ConcatError::NoFragments);
        }
        ensure_parent(dest).await?;

        let partial = partial_path(dest);
        let written = write_all(fragments, &partial).await;
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(ConcatError::io(&partial, e));
        }

        let path = commit(&partial, dest).await?;
        tracing::info!(
            path = %path.display(),
            fragment_count = fragments.len(),
            "Audio fragments joined"
        );
        Ok(path)
    }
}

async fn write_all(fragments: &[AudioFragment], path: &Path) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    for fragment in fragments {
        file.write_all(&fragment.audio).await?;
    }
    file.flush().await?;
    Ok(())
}
