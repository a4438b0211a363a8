pub mod types;

pub use types::{
    MISSING_LOG_NAME, OUTPUT_DIR_NAME, RunConfig, VIDEO_EXTENSIONS, is_video_file,
};
