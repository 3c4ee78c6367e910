//! Bounded-concurrency batch runner.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info};

use crate::config::BatchConfig;
use crate::fetcher::Fetcher;
use crate::pipeline::{ItemPipeline, Outcome, PipelineError, Stage, StreamEntry};
use crate::remux::Remuxer;

use super::error::LedgerError;
use super::ledger::Ledgers;

/// Counts of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &Outcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Runs every entry of a batch through an [`ItemPipeline`], at most
/// `concurrency` at a time.
///
/// Each entry runs in its own task. A failing or panicking entry only
/// produces a failure outcome; the rest of the batch keeps going. Outcomes
/// are handed back over a channel so the ledgers have a single writer.
pub struct BatchScheduler<F: Fetcher, R: Remuxer> {
    pipeline: Arc<ItemPipeline<F, R>>,
    concurrency: usize,
}

impl<F: Fetcher + 'static, R: Remuxer + 'static> BatchScheduler<F, R> {
    /// Creates a scheduler. A concurrency of zero is treated as one.
    pub fn new(pipeline: ItemPipeline<F, R>, concurrency: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(config: &BatchConfig, pipeline: ItemPipeline<F, R>) -> Self {
        Self::new(pipeline, config.concurrency)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Processes all entries and records each outcome as it completes.
    ///
    /// Returns once every entry has produced an outcome. Only ledger
    /// failures are returned as errors, and only after the whole batch ran.
    pub async fn run(
        &self,
        entries: Vec<StreamEntry>,
        ledgers: &mut Ledgers,
    ) -> Result<BatchSummary, LedgerError> {
        let start = Instant::now();
        let mut summary = BatchSummary {
            total: entries.len(),
            ..Default::default()
        };
        info!(
            total = summary.total,
            concurrency = self.concurrency,
            "Starting batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (tx, mut rx) = mpsc::channel::<Outcome>(self.concurrency);

        for entry in entries {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();

            tokio::spawn(async move {
                let outcome = {
                    // The semaphore is never closed.
                    let _permit = semaphore.acquire_owned().await.ok();
                    process_isolated(&pipeline, entry).await
                };
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        // A ledger error never stops the batch: every entry still runs and
        // the first error is returned once the channel is drained.
        let mut first_error = None;
        let mut unrecorded = 0usize;
        while let Some(outcome) = rx.recv().await {
            summary.record(&outcome);
            if let Err(e) = ledgers.record(&outcome).await {
                error!(id = outcome.entry_id(), error = %e, "Failed to record outcome");
                unrecorded += 1;
                first_error.get_or_insert(e);
            }
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch finished"
        );

        match first_error {
            Some(e) => {
                error!(unrecorded, "Some outcomes could not be recorded");
                Err(e)
            }
            None => Ok(summary),
        }
    }
}

/// Runs one entry, turning a panic into a failure outcome.
async fn process_isolated<F: Fetcher, R: Remuxer>(
    pipeline: &ItemPipeline<F, R>,
    entry: StreamEntry,
) -> Outcome {
    let fallback = entry.clone();
    match AssertUnwindSafe(pipeline.process(entry)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(id = %fallback.id, panic = %message, "Entry processing panicked");
            // The stage reached before the panic is unknown.
            let err = PipelineError::unknown(Stage::Start, format!("panicked: {}", message));
            Outcome::failure(&fallback, &err)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::time::Duration;

    use crate::fetcher::{FetchError, FetchProgress, FetchResult};
    use crate::testing::{fixtures, ConcurrencyProbe, MockFetcher, MockRemuxer};

    struct Harness {
        dir: tempfile::TempDir,
        fetcher: MockFetcher,
        remuxer: MockRemuxer,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                fetcher: MockFetcher::new(),
                remuxer: MockRemuxer::new(),
            }
        }

        fn scheduler(&self, concurrency: usize) -> BatchScheduler<MockFetcher, MockRemuxer> {
            let pipeline = ItemPipeline::new(
                self.fetcher.clone(),
                self.remuxer.clone(),
                self.dir.path(),
                self.dir.path(),
            );
            BatchScheduler::new(pipeline, concurrency)
        }

        async fn ledgers(&self) -> Ledgers {
            Ledgers::create(&self.ok_path(), &self.err_path(), false)
                .await
                .unwrap()
        }

        fn ok_path(&self) -> std::path::PathBuf {
            self.dir.path().join("downloaded_files.txt")
        }

        fn err_path(&self) -> std::path::PathBuf {
            self.dir.path().join("skipped_files.txt")
        }

        fn lines(path: &Path) -> Vec<String> {
            std::fs::read_to_string(path)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_every_entry_gets_one_outcome() {
        let h = Harness::new();
        let entries = fixtures::entries(8);
        for entry in entries.iter().filter(|e| e.id.parse::<usize>().unwrap() % 2 == 0) {
            h.fetcher
                .set_response(&entry.url, fixtures::master_playlist(&[(100, "v.m3u8")]))
                .await;
        }

        let mut ledgers = h.ledgers().await;
        let summary = h.scheduler(3).run(entries, &mut ledgers).await.unwrap();
        ledgers.finish().await.unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                total: 8,
                succeeded: 4,
                failed: 4
            }
        );

        let mut ok = Harness::lines(&h.ok_path());
        ok.sort();
        assert_eq!(
            ok,
            vec![
                "0__Stream_0.mp4success",
                "2__Stream_2.mp4success",
                "4__Stream_4.mp4success",
                "6__Stream_6.mp4success",
            ]
        );
        assert_eq!(Harness::lines(&h.err_path()).len(), 4);
    }

    #[tokio::test]
    async fn test_concurrency_cap_is_respected() {
        let probe = ConcurrencyProbe::new();
        let mut h = Harness::new();
        h.fetcher = MockFetcher::new().with_probe(probe.clone());
        h.remuxer = MockRemuxer::new().with_probe(probe.clone());
        h.fetcher.set_delay(Duration::from_millis(20)).await;
        h.remuxer.set_delay(Duration::from_millis(20)).await;

        let entries = fixtures::entries(12);
        for entry in &entries {
            h.fetcher
                .set_response(&entry.url, fixtures::master_playlist(&[(100, "v.m3u8")]))
                .await;
        }

        let mut ledgers = h.ledgers().await;
        let summary = h.scheduler(3).run(entries, &mut ledgers).await.unwrap();

        assert_eq!(summary.succeeded, 12);
        assert!(probe.max_observed() <= 3, "observed {}", probe.max_observed());
        assert!(probe.max_observed() >= 2, "batch never overlapped entries");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let h = Harness::new();
        let mut ledgers = h.ledgers().await;
        let summary = h.scheduler(5).run(Vec::new(), &mut ledgers).await.unwrap();
        ledgers.finish().await.unwrap();

        assert_eq!(summary, BatchSummary::default());
        assert!(Harness::lines(&h.ok_path()).is_empty());
        assert!(Harness::lines(&h.err_path()).is_empty());
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let h = Harness::new();
        assert_eq!(h.scheduler(0).concurrency(), 1);
    }

    /// Panics on any URL containing "boom", otherwise serves a one-variant
    /// master playlist.
    struct PanickyFetcher;

    #[async_trait]
    impl Fetcher for PanickyFetcher {
        fn name(&self) -> &str {
            "panicky"
        }

        async fn fetch(
            &self,
            url: &str,
            dest: &Path,
            _progress_tx: Option<mpsc::Sender<FetchProgress>>,
        ) -> Result<FetchResult, FetchError> {
            if url.contains("boom") {
                panic!("fetcher exploded");
            }
            let body = fixtures::master_playlist(&[(100, "v.m3u8")]);
            tokio::fs::write(dest, &body)
                .await
                .map_err(|e| FetchError::write(dest, e))?;
            Ok(FetchResult {
                url: url.to_string(),
                path: dest.to_path_buf(),
                bytes_written: body.len() as u64,
                total_bytes: None,
                duration_ms: 0,
            })
        }
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ItemPipeline::new(PanickyFetcher, MockRemuxer::new(), dir.path(), dir.path());
        let scheduler = BatchScheduler::new(pipeline, 2);

        let entries = vec![
            StreamEntry::new("1", "Fine", "https://cdn.example.com/1/master.m3u8"),
            StreamEntry::new("2", "Bad", "https://cdn.example.com/boom/master.m3u8"),
            StreamEntry::new("3", "Also fine", "https://cdn.example.com/3/master.m3u8"),
        ];

        let ok_path = dir.path().join("ok.txt");
        let err_path = dir.path().join("err.txt");
        let mut ledgers = Ledgers::create(&ok_path, &err_path, false).await.unwrap();
        let summary = scheduler.run(entries, &mut ledgers).await.unwrap();
        ledgers.finish().await.unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let failures = std::fs::read_to_string(&err_path).unwrap();
        assert!(failures.starts_with(
            "Error processing URL https://cdn.example.com/boom/master.m3u8:"
        ));
        assert!(failures.contains("fetcher exploded"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_ledger_write_error_does_not_stop_batch() {
        let h = Harness::new();
        let entries = fixtures::entries(10);

        // Every entry fails, and the failure ledger cannot be written.
        let mut ledgers = Ledgers::create(&h.ok_path(), Path::new("/dev/full"), false)
            .await
            .unwrap();
        let result = h.scheduler(2).run(entries, &mut ledgers).await;

        assert!(matches!(result, Err(LedgerError::Write { .. })));
        assert_eq!(h.fetcher.recorded_fetches().await.len(), 10);
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u32), "unknown panic");
    }
}
