use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tokio::process::Command;

use crate::api::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectCategory {
    Landscape,
    Portrait,
    Other,
}

impl AspectCategory {
    /// Exact 16:9 test using the floored scaled dimension.
    pub fn classify(width: u32, height: u32) -> Self {
        let (width, height) = (u64::from(width), u64::from(height));
        if width == 16 * height / 9 {
            AspectCategory::Landscape
        } else if height == 16 * width / 9 {
            AspectCategory::Portrait
        } else {
            AspectCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectCategory::Landscape => "landscape",
            AspectCategory::Portrait => "portrait",
            AspectCategory::Other => "other",
        }
    }
}

impl fmt::Display for AspectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn aspect_category(&self, path: &Path) -> Result<AspectCategory, error::SystemError>;
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Classifies the first stream of `ffprobe -print_format json -show_streams` output.
pub fn parse_probe_output(stdout: &[u8]) -> Result<AspectCategory, error::SystemError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| error::SystemError::probe(format!("Unreadable ffprobe output: {e}")))?;

    let stream = output
        .streams
        .first()
        .ok_or_else(|| error::SystemError::probe("No streams found in video"))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) => Ok(AspectCategory::classify(width, height)),
        _ => Err(error::SystemError::probe("First stream has no dimensions")),
    }
}

pub struct FfprobeProber {
    program: String,
}

impl FfprobeProber {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait::async_trait]
impl Prober for FfprobeProber {
    async fn aspect_category(&self, path: &Path) -> Result<AspectCategory, error::SystemError> {
        let output = Command::new(&self.program)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                error::SystemError::probe(format!("Failed to execute {}: {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("ffprobe failed on {}: {}", path.display(), stderr);
            return Err(error::SystemError::probe(stderr.into_owned()));
        }

        parse_probe_output(&output.stdout)
    }
}
