use crate::config::is_video_file;
use crate::tools::EpisodeTag;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One episode video to process, owned by a single worker.
#[derive(Debug, Clone)]
pub struct VideoTask {
    pub path: PathBuf,
    pub tag: EpisodeTag,
}

/// Walks the directory tree and parses every recognized video file into a
/// `VideoTask`. Files without a season/episode tag are dropped silently.
pub fn scan_video_tasks(directory: &Path) -> Result<Vec<VideoTask>> {
    Ok(WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_video_file(entry.path()))
        .filter_map(|entry| {
            let tag = EpisodeTag::from_path(entry.path())?;
            Some(VideoTask {
                path: entry.into_path(),
                tag,
            })
        })
        .collect())
}
