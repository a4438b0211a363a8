use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use std::process::Command;

/// Produces one candidate frame from a video at a given offset.
pub trait FrameSampler {
    fn sample_frame(
        &self,
        video_path: &Path,
        offset_seconds: u64,
        output_path: &Path,
    ) -> Result<()>;
}

/// Extracts a single still frame with ffmpeg.
///
/// `quality` is the window of the `thumbnail` filter: how many decoded
/// frames ffmpeg examines before writing the most representative one.
pub struct FfmpegFrameSampler {
    quality: u32,
}

impl FfmpegFrameSampler {
    #[must_use]
    pub const fn new(quality: u32) -> Self {
        Self { quality }
    }
}

impl FrameSampler for FfmpegFrameSampler {
    fn sample_frame(
        &self,
        video_path: &Path,
        offset_seconds: u64,
        output_path: &Path,
    ) -> Result<()> {
        let timestamp = format_timestamp(offset_seconds);
        debug!(
            "Sampling frame at {timestamp} from {}",
            video_path.display()
        );

        let filter = format!("thumbnail={}", self.quality);
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-nostdin", "-loglevel", "error"])
            .arg("-ss")
            .arg(&timestamp)
            .arg("-i")
            .arg(video_path)
            .arg("-vf")
            .arg(&filter)
            .args(["-frames:v", "1", "-q:v", "2", "-y"])
            .arg(output_path)
            .output()
            .with_context(|| format!("Cannot run ffmpeg for {}", video_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "ffmpeg failed for {}: {}",
                video_path.display(),
                stderr.trim()
            );
        }

        if !output_path.exists() {
            anyhow::bail!("Candidate frame was not created: {}", output_path.display());
        }

        Ok(())
    }
}

fn format_timestamp(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
