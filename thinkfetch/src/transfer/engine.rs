//! Bounded worker pool executing download tasks.
//!
//! Tasks are submitted FIFO into fixed-size thread batches; completion
//! order is unconstrained, so every outcome is written into the slot of
//! its originating task rather than appended in completion order. The
//! returned vector always has exactly one outcome per submitted task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::ClientConfig;

use super::http::{FileDownloader, HttpDownloader};
use super::task::{DownloadTask, TransferOutcome};

/// Default number of concurrent download workers.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Per-task completion callback: `(tasks_done, tasks_total, task, outcome)`.
///
/// Invoked once per task as it finishes, from worker threads. The bulk
/// path reports progress per task completed, not per byte.
pub type TaskCompleteCallback =
    Box<dyn Fn(usize, usize, &DownloadTask, &TransferOutcome) + Send + Sync>;

/// The concurrent transfer engine.
pub struct TransferEngine {
    downloader: Arc<dyn FileDownloader>,
    concurrency: usize,
}

impl TransferEngine {
    /// Create an engine with its own HTTP downloader.
    ///
    /// `concurrency` below 1 is clamped to 1; callers that consider zero
    /// workers a configuration error must reject it before reaching here.
    pub fn new(
        config: &ClientConfig,
        concurrency: usize,
        timeout: Duration,
    ) -> Result<Self, super::error::TransferError> {
        let downloader = HttpDownloader::with_timeout(config, timeout)?;
        Ok(Self::with_downloader(Arc::new(downloader), concurrency))
    }

    /// Create an engine around an existing downloader (used by tests).
    pub fn with_downloader(downloader: Arc<dyn FileDownloader>, concurrency: usize) -> Self {
        Self {
            downloader,
            concurrency: concurrency.max(1),
        }
    }

    /// The effective worker count.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Execute all tasks and return one outcome per task, index-aligned
    /// with the input.
    ///
    /// Failures are per-task: a failed download never aborts siblings.
    /// All destination directories are created before any download starts.
    pub fn run(
        &self,
        tasks: &[DownloadTask],
        on_complete: Option<TaskCompleteCallback>,
    ) -> Vec<TransferOutcome> {
        if tasks.is_empty() {
            return Vec::new();
        }

        for task in tasks {
            if let Err(e) = std::fs::create_dir_all(&task.dest_dir) {
                warn!(dir = %task.dest_dir.display(), error = %e, "failed to create destination directory");
            }
        }

        let total = tasks.len();
        let slots: Mutex<Vec<Option<TransferOutcome>>> = Mutex::new(vec![None; total]);
        let done = AtomicUsize::new(0);

        for batch in (0..total).collect::<Vec<_>>().chunks(self.concurrency) {
            std::thread::scope(|scope| {
                for &index in batch {
                    let task = &tasks[index];
                    let slots = &slots;
                    let done = &done;
                    let on_complete = on_complete.as_ref();

                    scope.spawn(move || {
                        let outcome = self.execute(task);
                        let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                        if let Some(cb) = on_complete {
                            cb(finished, total, task, &outcome);
                        }
                        slots.lock().unwrap()[index] = Some(outcome);
                    });
                }
            });
        }

        slots
            .into_inner()
            .unwrap()
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| TransferOutcome::Failed {
                    reason: "worker did not report an outcome".to_string(),
                })
            })
            .collect()
    }

    /// Execute one task: idempotent skip, then streamed download.
    fn execute(&self, task: &DownloadTask) -> TransferOutcome {
        let dest = match task.dest_path() {
            Ok(dest) => dest,
            Err(e) => {
                return TransferOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        // Re-run semantics: an existing file is success, with no network
        // call and no digest or size verification.
        if dest.exists() {
            debug!(file = %dest.display(), "destination exists, skipping");
            return TransferOutcome::Skipped;
        }

        match self.downloader.download(&task.entry.url, &dest) {
            Ok(bytes) => TransferOutcome::Completed { bytes },
            Err(e) => {
                warn!(title = %task.record_title, url = %task.entry.url, error = %e, "download failed");
                TransferOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    use crate::catalog::FileEntry;
    use crate::transfer::http::tests::MockDownloader;
    use crate::transfer::task::summarize;

    fn task(url: &str, dir: &Path) -> DownloadTask {
        DownloadTask {
            entry: FileEntry {
                url: url.to_string(),
                name: String::new(),
                size: 0,
                sha256: None,
            },
            dest_dir: dir.to_path_buf(),
            record_title: "Test Driver".to_string(),
        }
    }

    #[test]
    fn test_outcome_count_matches_task_count() {
        let temp = TempDir::new().unwrap();
        let engine = TransferEngine::with_downloader(Arc::new(MockDownloader::new()), 2);

        let tasks: Vec<_> = (0..5)
            .map(|i| task(&format!("https://h/f{}.exe", i), temp.path()))
            .collect();
        let outcomes = engine.run(&tasks, None);

        assert_eq!(outcomes.len(), tasks.len());
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, TransferOutcome::Completed { .. })));
    }

    #[test]
    fn test_second_run_skips_with_zero_network_calls() {
        let temp = TempDir::new().unwrap();
        let mock = MockDownloader::new();
        let calls = Arc::clone(&mock.calls);
        let engine = TransferEngine::with_downloader(Arc::new(mock), 4);

        let tasks: Vec<_> = (0..3)
            .map(|i| task(&format!("https://h/f{}.exe", i), temp.path()))
            .collect();

        let first = engine.run(&tasks, None);
        assert_eq!(summarize(&first).completed, 3);
        let calls_after_first = calls.load(Ordering::SeqCst);
        assert_eq!(calls_after_first, 3);

        let second = engine.run(&tasks, None);
        assert!(second.iter().all(|o| *o == TransferOutcome::Skipped));
        assert_eq!(calls.load(Ordering::SeqCst), calls_after_first);
    }

    #[test]
    fn test_failed_task_leaves_no_file_and_spares_siblings() {
        let temp = TempDir::new().unwrap();
        let engine = TransferEngine::with_downloader(
            Arc::new(MockDownloader::new().failing_on("bad")),
            2,
        );

        let tasks = vec![
            task("https://h/good1.exe", temp.path()),
            task("https://h/bad.exe", temp.path()),
            task("https://h/good2.exe", temp.path()),
        ];
        let outcomes = engine.run(&tasks, None);

        // Attribution is by task identity, not completion order.
        assert!(matches!(outcomes[0], TransferOutcome::Completed { .. }));
        assert!(matches!(outcomes[1], TransferOutcome::Failed { .. }));
        assert!(matches!(outcomes[2], TransferOutcome::Completed { .. }));

        assert!(temp.path().join("good1.exe").exists());
        assert!(!temp.path().join("bad.exe").exists());
        assert!(temp.path().join("good2.exe").exists());
    }

    #[test]
    fn test_invalid_url_fails_without_network() {
        let temp = TempDir::new().unwrap();
        let mock = MockDownloader::new();
        let calls = Arc::clone(&mock.calls);
        let engine = TransferEngine::with_downloader(Arc::new(mock), 1);

        let tasks = vec![task("https://h/", temp.path())];
        let outcomes = engine.run(&tasks, None);

        assert!(matches!(outcomes[0], TransferOutcome::Failed { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_completion_callback_runs_per_task() {
        let temp = TempDir::new().unwrap();
        let engine = TransferEngine::with_downloader(Arc::new(MockDownloader::new()), 2);

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let tasks: Vec<_> = (0..4)
            .map(|i| task(&format!("https://h/f{}.exe", i), temp.path()))
            .collect();

        engine.run(
            &tasks,
            Some(Box::new(move |_done, total, _task, _outcome| {
                assert_eq!(total, 4);
                count_clone.fetch_add(1, Ordering::SeqCst);
            })),
        );

        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let engine = TransferEngine::with_downloader(Arc::new(MockDownloader::new()), 0);
        assert_eq!(engine.concurrency(), 1);
    }

    #[test]
    fn test_creates_category_directories() {
        let temp = TempDir::new().unwrap();
        let engine = TransferEngine::with_downloader(Arc::new(MockDownloader::new()), 1);

        let dir = temp.path().join("BIOS");
        let tasks = vec![task("https://h/bios.exe", &dir)];
        engine.run(&tasks, None);

        assert!(dir.join("bios.exe").exists());
    }
}
