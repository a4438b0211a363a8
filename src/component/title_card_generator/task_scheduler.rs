use crate::tools::VideoTask;
use log::debug;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use sysinfo::System;

enum WorkerMessage {
    Task(VideoTask),
    Shutdown,
}

/// Pool size for a run: `min(available CPUs, task count)`, so an empty
/// discovery starts no workers at all.
#[must_use]
pub fn worker_count_for(task_count: usize) -> usize {
    let system = System::new_all();
    system.cpus().len().max(1).min(task_count)
}

/// Drives a fixed pool of workers over one shared FIFO queue.
///
/// Every task is queued ahead of one shutdown message per worker, so the
/// queue order itself guarantees all tasks are handled before any worker
/// stops. Returns only after every worker thread has been joined.
pub fn run_worker_pool<F>(tasks: Vec<VideoTask>, worker_count: usize, handler: F)
where
    F: Fn(VideoTask) + Send + Sync + 'static,
{
    if worker_count == 0 {
        return;
    }

    let (sender, receiver) = mpsc::channel();
    let receiver = Arc::new(Mutex::new(receiver));
    let handler = Arc::new(handler);

    for task in tasks {
        sender
            .send(WorkerMessage::Task(task))
            .expect("Queue receiver alive until workers are joined");
    }
    for _ in 0..worker_count {
        sender
            .send(WorkerMessage::Shutdown)
            .expect("Queue receiver alive until workers are joined");
    }

    let mut handles = Vec::with_capacity(worker_count);
    for worker_id in 0..worker_count {
        let receiver = Arc::clone(&receiver);
        let handler = Arc::clone(&handler);

        handles.push(thread::spawn(move || {
            loop {
                let message = match receiver.lock() {
                    Ok(receiver) => receiver.recv(),
                    Err(_) => break,
                };
                match message {
                    Ok(WorkerMessage::Task(task)) => handler(task),
                    Ok(WorkerMessage::Shutdown) | Err(_) => break,
                }
            }
            debug!("Worker {worker_id} stopped");
        }));
    }

    for handle in handles {
        // A panicked worker must not abort the rest of the run.
        let _ = handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::EpisodeTag;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make_tasks(count: u32) -> Vec<VideoTask> {
        (1..=count)
            .map(|episode| VideoTask {
                path: PathBuf::from(format!("show.s1e{episode}.mkv")),
                tag: EpisodeTag {
                    season: 1,
                    episode,
                },
            })
            .collect()
    }

    #[test]
    fn test_pool_processes_every_task() {
        let processed = Arc::new(Mutex::new(HashSet::new()));
        let tasks = make_tasks(20);

        let seen = Arc::clone(&processed);
        run_worker_pool(tasks, 4, move |task| {
            seen.lock().unwrap().insert(task.tag.episode);
        });

        assert_eq!(processed.lock().unwrap().len(), 20);
    }

    #[test]
    fn test_pool_with_single_worker_is_sequential_and_complete() {
        let counter = Arc::new(AtomicUsize::new(0));
        let tasks = make_tasks(5);

        let seen = Arc::clone(&counter);
        run_worker_pool(tasks, 1, move |_task| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_zero_workers_returns_immediately() {
        run_worker_pool(Vec::new(), 0, |_task| panic!("no worker should run"));
    }

    #[test]
    fn test_worker_count_bounded_by_task_count() {
        assert_eq!(worker_count_for(0), 0);
        assert_eq!(worker_count_for(1), 1);
        assert!(worker_count_for(10_000) >= 1);
    }
}
