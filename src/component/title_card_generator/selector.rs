use super::frame_sampler::FrameSampler;
use super::sharpness::FocusScorer;
use anyhow::{Context, Result};
use console::style;
use log::warn;
use std::fs;
use std::path::Path;

/// One scored sampling attempt.
#[derive(Debug, Clone, Copy)]
pub struct BlurSample {
    pub attempt: u32,
    pub score: f64,
}

/// Retry behavior for one video.
#[derive(Debug, Clone, Copy)]
pub struct SelectionPolicy {
    pub start_offset_seconds: u64,
    pub time_gap_seconds: u64,
    pub max_attempts: u32,
    pub blur_threshold: f64,
}

#[derive(Debug)]
pub enum SelectionOutcome {
    /// A frame cleared the threshold and was renamed to its final name.
    Accepted { attempt: u32, score: f64 },
    /// Every attempt scored below the threshold.
    Exhausted { samples: Vec<BlurSample> },
    /// Frame extraction failed; remaining attempts were abandoned.
    ExtractionFailed {
        samples: Vec<BlurSample>,
        message: String,
    },
}

/// Samples frames at increasing offsets until one clears the blur threshold
/// or the attempt budget runs out.
///
/// The same temp name is reused every attempt, so a crash mid-run leaves at
/// most one stale temp file behind. A score equal to the threshold accepts.
/// A zero attempt budget returns `Exhausted` without sampling anything.
/// Unexpected I/O errors (decode, rename, delete) propagate as `Err` and are
/// handled at the worker boundary.
pub fn select_title_card(
    sampler: &impl FrameSampler,
    scorer: &impl FocusScorer,
    video_path: &Path,
    temp_path: &Path,
    final_path: &Path,
    policy: &SelectionPolicy,
) -> Result<SelectionOutcome> {
    let label = final_path
        .file_name()
        .map_or_else(|| final_path.to_string_lossy().into_owned(), |name| {
            name.to_string_lossy().into_owned()
        });

    let mut samples = Vec::new();
    let mut offset = policy.start_offset_seconds;

    for attempt in 1..=policy.max_attempts {
        if let Err(error) = sampler.sample_frame(video_path, offset, temp_path) {
            warn!("Frame extraction failed for {}: {error:#}", video_path.display());
            return Ok(SelectionOutcome::ExtractionFailed {
                samples,
                message: format!("{error:#}"),
            });
        }

        let score = scorer.focus_score(temp_path)?;
        samples.push(BlurSample { attempt, score });

        if score >= policy.blur_threshold {
            fs::rename(temp_path, final_path).with_context(|| {
                format!("Cannot rename accepted frame to {}", final_path.display())
            })?;
            return Ok(SelectionOutcome::Accepted { attempt, score });
        }

        fs::remove_file(temp_path).with_context(|| {
            format!("Cannot remove rejected frame: {}", temp_path.display())
        })?;
        println!(
            "{}",
            style(format!(
                "Attempt {attempt}: Thumbnail is blurry ({score:.2}) for {label}."
            ))
            .yellow()
        );
        offset += policy.time_gap_seconds;
    }

    Ok(SelectionOutcome::Exhausted { samples })
}
