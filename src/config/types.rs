use serde::Serialize;
use std::path::Path;

/// Extensions recognized as episode video files.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["avi", "mkv", "mp4", "mov"];

/// Name of the thumbnail directory created under the input root.
pub const OUTPUT_DIR_NAME: &str = "thumbs";

/// Name of the append-only failure log inside the output directory.
pub const MISSING_LOG_NAME: &str = "missing.txt";

/// Settings for one run, fixed after argument parsing. The serialized form
/// is embedded in the run-start block of the log.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub quality: u32,
    pub max_attempts: u32,
    pub time_gap_seconds: u64,
    pub blur_threshold: f64,
    pub start_time_minutes: u64,
    pub remove_bars: bool,
}

impl RunConfig {
    #[must_use]
    pub const fn start_offset_seconds(&self) -> u64 {
        self.start_time_minutes * 60
    }
}

#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
