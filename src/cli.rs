use crate::config::RunConfig;
use clap::Parser;

/// Generate thumbnails for video files.
#[derive(Debug, Parser)]
#[command(name = "title-card-sourcer", version, about = "Generate thumbnails for video files")]
pub struct Cli {
    /// Thumbnail quality (frames examined by the sampling filter)
    #[arg(short, long, default_value_t = 100)]
    pub quality: u32,

    /// Number of attempts for a blurry image
    #[arg(short, long, default_value_t = 10)]
    pub attempts: u32,

    /// Time gap in seconds between attempts
    #[arg(short, long, default_value_t = 30)]
    pub timegap: u64,

    /// Threshold for blur detection
    #[arg(short, long, default_value_t = 100.0)]
    pub blur_threshold: f64,

    /// Start time in minutes
    #[arg(short, long, default_value_t = 6)]
    pub start_time: u64,

    /// Remove black bars from thumbnails
    #[arg(short = 'l', long)]
    pub remove_bars: bool,
}

impl Cli {
    #[must_use]
    pub const fn into_config(self) -> RunConfig {
        RunConfig {
            quality: self.quality,
            max_attempts: self.attempts,
            time_gap_seconds: self.timegap,
            blur_threshold: self.blur_threshold,
            start_time_minutes: self.start_time,
            remove_bars: self.remove_bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_tool() {
        let cli = Cli::parse_from(["title-card-sourcer"]);
        let config = cli.into_config();

        assert_eq!(config.quality, 100);
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.time_gap_seconds, 30);
        assert!((config.blur_threshold - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.start_time_minutes, 6);
        assert!(!config.remove_bars);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from([
            "title-card-sourcer",
            "-q", "50",
            "-a", "3",
            "-t", "10",
            "-b", "60.5",
            "-s", "0",
            "-l",
        ]);
        let config = cli.into_config();

        assert_eq!(config.quality, 50);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.time_gap_seconds, 10);
        assert!((config.blur_threshold - 60.5).abs() < f64::EPSILON);
        assert_eq!(config.start_offset_seconds(), 0);
        assert!(config.remove_bars);
    }

    #[test]
    fn test_negative_attempts_rejected() {
        assert!(Cli::try_parse_from(["title-card-sourcer", "-a", "-1"]).is_err());
    }
}
