use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)S(\d{1,2})E(\d{1,2})").expect("Invalid regex"));

/// Season/episode numbers parsed from a video path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeTag {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeTag {
    /// Matches the season/episode pattern anywhere in the path,
    /// case-insensitive. Returns `None` for untagged paths.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let haystack = path.to_string_lossy();
        let captures = EPISODE_PATTERN.captures(&haystack)?;
        let season = captures[1].parse().ok()?;
        let episode = captures[2].parse().ok()?;
        Some(Self { season, episode })
    }

    /// Canonical thumbnail name, integers verbatim with no padding.
    #[must_use]
    pub fn output_key(&self) -> String {
        format!("s{}e{}.jpg", self.season, self.episode)
    }
}
