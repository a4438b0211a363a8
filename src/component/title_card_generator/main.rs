use super::frame_sampler::FfmpegFrameSampler;
use super::post_process;
use super::selector::{SelectionOutcome, SelectionPolicy, select_title_card};
use super::sharpness::LaplacianScorer;
use super::task_scheduler::{run_worker_pool, worker_count_for};
use crate::config::{MISSING_LOG_NAME, OUTPUT_DIR_NAME, RunConfig};
use crate::tools::{
    DuplicateGuard, RunLogger, VideoTask, ensure_directory_exists, scan_video_tasks,
    widen_permissions,
};
use anyhow::Result;
use console::style;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

/// Outcome counts for one run.
#[derive(Debug)]
pub struct RunSummary {
    pub total: usize,
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Episode title-card generator.
///
/// One run: seed the duplicate guard from the output directory, write the
/// run-start log block, discover episode videos under the working directory,
/// drive the worker pool, write the run-end block, widen the output
/// directory permissions.
pub struct TitleCardGenerator {
    config: RunConfig,
    shutdown_signal: Arc<AtomicBool>,
}

enum TaskResolution {
    Generated,
    Failed,
}

struct TaskContext {
    config: RunConfig,
    output_dir: PathBuf,
    guard: DuplicateGuard,
    logger: RunLogger,
    shutdown_signal: Arc<AtomicBool>,
    generated: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl TitleCardGenerator {
    pub const fn new(config: RunConfig, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<RunSummary> {
        println!("{}", style("=== Episode Title Cards ===").cyan().bold());

        let input_dir = Path::new(".");
        let output_dir = input_dir.join(OUTPUT_DIR_NAME);
        ensure_directory_exists(&output_dir)?;

        let guard = DuplicateGuard::seed_from_directory(&output_dir)?;
        let logger = RunLogger::open(&output_dir.join(MISSING_LOG_NAME))?;

        let run_started = Instant::now();
        logger.log_run_start(&self.config)?;

        println!("{}", style("Scanning for episode videos...").dim());
        let tasks = scan_video_tasks(input_dir)?;
        let total = tasks.len();

        if total == 0 {
            println!("{}", style("No episode videos found").yellow());
        } else {
            println!(
                "{}",
                style(format!("Found {total} episode videos")).green()
            );
        }

        let worker_count = worker_count_for(total);
        info!("Processing {total} videos with {worker_count} workers");

        let context = Arc::new(TaskContext {
            config: self.config.clone(),
            output_dir: output_dir.clone(),
            guard,
            logger,
            shutdown_signal: Arc::clone(&self.shutdown_signal),
            generated: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        });

        {
            let context = Arc::clone(&context);
            run_worker_pool(tasks, worker_count, move |task| context.process(&task));
        }

        context
            .logger
            .log_run_end(run_started.elapsed().as_secs_f64())?;
        widen_permissions(&output_dir)?;

        let summary = RunSummary {
            total,
            generated: context.generated.load(Ordering::SeqCst),
            skipped: context.skipped.load(Ordering::SeqCst),
            failed: context.failed.load(Ordering::SeqCst),
        };
        self.print_summary(&summary);

        Ok(summary)
    }

    fn print_summary(&self, summary: &RunSummary) {
        println!();
        println!("{}", style("=== Title Card Summary ===").cyan().bold());
        println!("  Total: {} videos", summary.total);
        println!("  Generated: {}", style(summary.generated).green());

        if summary.skipped > 0 {
            println!("  Skipped: {}", style(summary.skipped).yellow());
        }
        if summary.failed > 0 {
            println!("  Failed: {}", style(summary.failed).red());
        }

        info!(
            "Run finished - generated: {}, skipped: {}, failed: {}",
            summary.generated, summary.skipped, summary.failed
        );
    }
}

impl TaskContext {
    /// Worker body and outer error boundary: nothing thrown by one task may
    /// reach the pool.
    fn process(&self, task: &VideoTask) {
        if self.shutdown_signal.load(Ordering::SeqCst) {
            return;
        }

        let key = task.tag.output_key();
        if self.guard.exists(&key) {
            println!(
                "{}",
                style(format!("Thumbnail already exists for {key}. Skipping.")).cyan()
            );
            self.skipped.fetch_add(1, Ordering::SeqCst);
            return;
        }

        match self.select_and_finish(task, &key) {
            Ok(TaskResolution::Generated) => {
                self.generated.fetch_add(1, Ordering::SeqCst);
            }
            Ok(TaskResolution::Failed) => {
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                error!("Unhandled error for {}: {e:#}", task.path.display());
                println!(
                    "{}",
                    style(format!(
                        "Error processing file {}: {e:#}",
                        task.path.display()
                    ))
                    .red()
                );
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn select_and_finish(&self, task: &VideoTask, key: &str) -> Result<TaskResolution> {
        let final_path = self.output_dir.join(key);
        let temp_path = self.output_dir.join(format!("{key}.tmp.jpg"));
        let sampler = FfmpegFrameSampler::new(self.config.quality);
        let policy = SelectionPolicy {
            start_offset_seconds: self.config.start_offset_seconds(),
            time_gap_seconds: self.config.time_gap_seconds,
            max_attempts: self.config.max_attempts,
            blur_threshold: self.config.blur_threshold,
        };

        let outcome = select_title_card(
            &sampler,
            &LaplacianScorer,
            &task.path,
            &temp_path,
            &final_path,
            &policy,
        )?;

        let resolution = match outcome {
            SelectionOutcome::Accepted { attempt, score } => {
                self.guard.mark(key);
                if let Err(e) = post_process::auto_level(&final_path) {
                    error!("Auto-level failed for {key}: {e:#}");
                    println!("{}", style(format!("Enhancement failed for {key}.")).red());
                }
                println!(
                    "{}",
                    style(format!(
                        "Thumbnail generated and enhanced for {key} (Blur value: {score:.2})."
                    ))
                    .green()
                );
                info!("Accepted {key} on attempt {attempt} with score {score:.2}");
                TaskResolution::Generated
            }
            SelectionOutcome::Exhausted { samples } => {
                println!("{}", style(format!("All attempts failed for {key}.")).red());
                warn!(
                    "No frame cleared the threshold for {} after {} attempts",
                    task.path.display(),
                    samples.len()
                );
                let scores: Vec<f64> = samples.iter().map(|sample| sample.score).collect();
                self.logger.log_failure(key, &scores)?;
                TaskResolution::Failed
            }
            SelectionOutcome::ExtractionFailed { samples, message } => {
                println!(
                    "{}",
                    style(format!("Failed to generate thumbnail for {key}.")).red()
                );
                error!("Extraction failed for {}: {message}", task.path.display());
                let scores: Vec<f64> = samples.iter().map(|sample| sample.score).collect();
                self.logger.log_failure(key, &scores)?;
                TaskResolution::Failed
            }
        };

        if self.config.remove_bars {
            // Runs on failure paths too; the missing final file makes it a no-op.
            if let Err(e) = post_process::trim_black_bars(&final_path) {
                error!("Black-bar trim failed for {key}: {e:#}");
                println!("{}", style(format!("Black-bar trim failed for {key}.")).red());
            }
        }

        Ok(resolution)
    }
}
