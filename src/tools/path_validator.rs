use anyhow::{Context, Result};
use std::path::Path;

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Cannot create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Opens the output directory to every user (0o777) before exit.
#[cfg(unix)]
pub fn widen_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)
        .with_context(|| format!("Cannot read permissions: {}", path.display()))?
        .permissions();
    permissions.set_mode(0o777);
    std::fs::set_permissions(path, permissions)
        .with_context(|| format!("Cannot change permissions: {}", path.display()))?;
    Ok(())
}

#[cfg(not(unix))]
pub fn widen_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory_creates_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b");

        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());

        // Idempotent on an existing directory.
        ensure_directory_exists(&nested).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_widen_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        widen_permissions(temp_dir.path()).unwrap();

        let mode = std::fs::metadata(temp_dir.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o777);
    }
}
