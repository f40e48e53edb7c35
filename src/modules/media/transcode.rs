use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::api::error;

#[async_trait::async_trait]
pub trait Transcoder: Send + Sync {
    /// Rewrites `input` with its index moved ahead of the media data, copying
    /// codecs. Returns the new file's path; the caller owns both files.
    async fn fast_start(&self, input: &Path) -> Result<PathBuf, error::SystemError>;
}

/// `<input>.processed`
pub fn processed_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(".processed");
    PathBuf::from(path)
}

pub struct FfmpegTranscoder {
    program: String,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait::async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn fast_start(&self, input: &Path) -> Result<PathBuf, error::SystemError> {
        let output_path = processed_path(input);

        let output = Command::new(&self.program)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4", "-y"])
            .arg(&output_path)
            .output()
            .await
            .map_err(|e| {
                error::SystemError::transcode(format!("Failed to execute {}: {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("ffmpeg failed on {}: {}", input.display(), stderr);
            // ffmpeg may leave a partial file behind
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(error::SystemError::transcode(stderr.into_owned()));
        }

        Ok(output_path)
    }
}
