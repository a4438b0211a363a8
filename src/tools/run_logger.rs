use crate::config::RunConfig;
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

const RULE: &str = "==================================================";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only run log shared across workers.
///
/// Every record is written whole under the file lock, so lines from
/// concurrent workers never interleave. The file is never truncated.
pub struct RunLogger {
    file: Mutex<File>,
}

impl RunLogger {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Cannot open run log: {}", path.display()))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub fn log_run_start(&self, config: &RunConfig) -> Result<()> {
        let snapshot =
            serde_json::to_string(config).context("Cannot serialize run configuration")?;
        let mut file = self.lock()?;
        writeln!(file, "{RULE}")?;
        writeln!(
            file,
            "Run started at {}",
            Local::now().format(TIMESTAMP_FORMAT)
        )?;
        writeln!(file, "Arguments used: {snapshot}")?;
        writeln!(file, "{RULE}")?;
        Ok(())
    }

    pub fn log_run_end(&self, elapsed_seconds: f64) -> Result<()> {
        let mut file = self.lock()?;
        writeln!(file, "{RULE}")?;
        writeln!(
            file,
            "Run completed at {}",
            Local::now().format(TIMESTAMP_FORMAT)
        )?;
        writeln!(file, "Total runtime: {elapsed_seconds:.2} seconds")?;
        writeln!(file, "{RULE}")?;
        writeln!(file)?;
        Ok(())
    }

    /// Records one failed task: the output key, every focus score seen
    /// rounded to one decimal, and their average and maximum.
    pub fn log_failure(&self, output_key: &str, scores: &[f64]) -> Result<()> {
        let mut file = self.lock()?;
        if scores.is_empty() {
            writeln!(file, "{output_key} (no frames sampled)")?;
            return Ok(());
        }

        let rounded: Vec<String> = scores.iter().map(|score| format!("{score:.1}")).collect();
        let joined = rounded.join(", ");
        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        let max = scores.iter().fold(f64::MIN, |acc, score| acc.max(*score));
        writeln!(
            file,
            "{output_key} (blurriness: {joined:<50}) avg {average:.2} max {max:.2}"
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, File>> {
        self.file.lock().map_err(|_| anyhow!("Run log lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config() -> RunConfig {
        RunConfig {
            quality: 100,
            max_attempts: 10,
            time_gap_seconds: 30,
            blur_threshold: 100.0,
            start_time_minutes: 6,
            remove_bars: false,
        }
    }

    #[test]
    fn test_run_start_and_end_blocks() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("missing.txt");
        let logger = RunLogger::open(&log_path).unwrap();

        logger.log_run_start(&test_config()).unwrap();
        logger.log_run_end(12.345).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Run started at "));
        assert!(content.contains("Arguments used: "));
        assert!(content.contains("\"quality\":100"));
        assert!(content.contains("Run completed at "));
        assert!(content.contains("Total runtime: 12.35 seconds"));
    }

    #[test]
    fn test_failure_line_has_scores_average_and_max() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("missing.txt");
        let logger = RunLogger::open(&log_path).unwrap();

        logger.log_failure("s1e2.jpg", &[10.0, 20.0]).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.starts_with("s1e2.jpg (blurriness: 10.0, 20.0"));
        assert!(content.contains("avg 15.00 max 20.00"));
    }

    #[test]
    fn test_failure_line_without_samples() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("missing.txt");
        let logger = RunLogger::open(&log_path).unwrap();

        logger.log_failure("s4e1.jpg", &[]).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content, "s4e1.jpg (no frames sampled)\n");
    }

    #[test]
    fn test_log_is_append_only() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("missing.txt");
        fs::write(&log_path, "previous run\n").unwrap();

        let logger = RunLogger::open(&log_path).unwrap();
        logger.log_failure("s1e1.jpg", &[5.0]).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.starts_with("previous run\n"));
        assert!(content.contains("s1e1.jpg"));
    }
}
