use super::{commit, ensure_parent, partial_path, ConcatError, Concatenator};
use crate::domain::tts::AudioFragment;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Joins fragments with ffmpeg's concat demuxer (`-c copy`, no re-encoding)
#[derive(Debug, Clone)]
pub struct FfmpegConcatenator {
    ffmpeg_bin: String,
}

impl FfmpegConcatenator {
    pub fn new(ffmpeg_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }

    /// File name for a fragment inside the work directory
    fn fragment_file_name(fragment: &AudioFragment) -> String {
        format!("{:03}-{}.mp3", fragment.index, fragment.label)
    }

    /// Write every fragment into `work_dir` and return the concat list file
    async fn write_inputs(
        &self,
        fragments: &[AudioFragment],
        work_dir: &Path,
    ) -> Result<PathBuf, ConcatError> {
        let mut list = String::new();
        for fragment in fragments {
            let path = work_dir.join(Self::fragment_file_name(fragment));
            tokio::fs::write(&path, &fragment.audio)
                .await
                .map_err(|e| ConcatError::io(&path, e))?;
            list.push_str(&concat_list_line(&path));
        }

        let list_path = work_dir.join("inputs.txt");
        tokio::fs::write(&list_path, list)
            .await
            .map_err(|e| ConcatError::io(&list_path, e))?;
        Ok(list_path)
    }

    async fn run_ffmpeg(&self, list_path: &Path, output: &Path) -> Result<(), ConcatError> {
        let result = Command::new(&self.ffmpeg_bin)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(list_path)
            .args(["-c", "copy", "-f", "mp3"])
            .arg(output)
            .output()
            .await
            .map_err(|e| ConcatError::io(Path::new(&self.ffmpeg_bin), e))?;

        if !result.status.success() {
            return Err(ConcatError::Tool {
                tool: self.ffmpeg_bin.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for FfmpegConcatenator {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

/// One `file '<path>'` entry, quoting single quotes the way ffmpeg expects
fn concat_list_line(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{}'\n", escaped)
}

#[async_trait]
impl Concatenator for FfmpegConcatenator {
    async fn join(&self, fragments: &[AudioFragment], dest: &Path) -> Result<PathBuf, ConcatError> {
        if fragments.is_empty() {
            return Err(ConcatError::NoFragments);
        }
        ensure_parent(dest).await?;
        let partial = partial_path(dest);

        if let [single] = fragments {
            if let Err(e) = tokio::fs::write(&partial, &single.audio).await {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(ConcatError::io(&partial, e));
            }
            return commit(&partial, dest).await;
        }

        // dropped at the end of this call, taking the fragment files with it
        let work_dir = tempfile::Builder::new()
            .prefix("lesson-tts-")
            .tempdir()
            .map_err(|e| ConcatError::io(Path::new("lesson-tts-*"), e))?;

        let list_path = self.write_inputs(fragments, work_dir.path()).await?;

        tracing::debug!(
            ffmpeg = %self.ffmpeg_bin,
            fragment_count = fragments.len(),
            work_dir = %work_dir.path().display(),
            "Running ffmpeg concat"
        );

        if let Err(e) = self.run_ffmpeg(&list_path, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            tracing::error!(error = %e, dest = %dest.display(), "ffmpeg concat failed");
            return Err(e);
        }

        let path = commit(&partial, dest).await?;
        tracing::info!(
            path = %path.display(),
            fragment_count = fragments.len(),
            "Audio fragments joined with ffmpeg"
        );
        Ok(path)
    }
}
