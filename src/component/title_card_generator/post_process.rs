use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Normalizes channel levels of an accepted frame in place (ImageMagick).
pub fn auto_level(image_path: &Path) -> Result<()> {
    let output = Command::new("convert")
        .arg(image_path)
        .args(["-channel", "rgb", "-auto-level"])
        .arg(image_path)
        .output()
        .with_context(|| format!("Cannot run convert for {}", image_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "Auto-level failed for {}: {}",
            image_path.display(),
            stderr.trim()
        );
    }

    Ok(())
}

/// Trims uniform black borders in place (ImageMagick). A no-op when the
/// file does not exist, which covers the failed-extraction paths.
pub fn trim_black_bars(image_path: &Path) -> Result<()> {
    if !image_path.exists() {
        return Ok(());
    }

    let output = Command::new("mogrify")
        .args(["-bordercolor", "black", "-fuzz", "20%", "-trim"])
        .arg(image_path)
        .output()
        .with_context(|| format!("Cannot run mogrify for {}", image_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "Black-bar trim failed for {}: {}",
            image_path.display(),
            stderr.trim()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_trim_is_noop_for_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("s1e1.jpg");
        trim_black_bars(&missing).unwrap();
    }
}
