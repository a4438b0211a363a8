use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// Shared set of output names that already exist in the thumbnail directory.
///
/// Seeded once before any worker starts, then mutated by insertion only.
/// The membership check and the work that follows it are deliberately not
/// atomic: two tasks colliding on one output key may both pass the check,
/// and the later writer overwrites the earlier one.
pub struct DuplicateGuard {
    generated: Mutex<HashSet<String>>,
}

impl DuplicateGuard {
    pub fn seed_from_directory(directory: &Path) -> Result<Self> {
        let mut generated = HashSet::new();
        let entries = fs::read_dir(directory)
            .with_context(|| format!("Cannot list output directory: {}", directory.display()))?;
        for entry in entries {
            let entry = entry?;
            generated.insert(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(Self {
            generated: Mutex::new(generated),
        })
    }

    #[must_use]
    pub fn exists(&self, output_key: &str) -> bool {
        self.generated
            .lock()
            .is_ok_and(|set| set.contains(output_key))
    }

    pub fn mark(&self, output_key: &str) {
        if let Ok(mut set) = self.generated.lock() {
            set.insert(output_key.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_seed_from_existing_thumbnails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("s1e2.jpg"), b"jpg").unwrap();
        fs::write(temp_dir.path().join("missing.txt"), b"log").unwrap();

        let guard = DuplicateGuard::seed_from_directory(temp_dir.path()).unwrap();

        assert!(guard.exists("s1e2.jpg"));
        assert!(guard.exists("missing.txt"));
        assert!(!guard.exists("s1e3.jpg"));
    }

    #[test]
    fn test_mark_inserts_key() {
        let temp_dir = TempDir::new().unwrap();
        let guard = DuplicateGuard::seed_from_directory(temp_dir.path()).unwrap();

        assert!(!guard.exists("s2e4.jpg"));
        guard.mark("s2e4.jpg");
        assert!(guard.exists("s2e4.jpg"));
    }

    #[test]
    fn test_seed_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");
        assert!(DuplicateGuard::seed_from_directory(&missing).is_err());
    }
}
