//! Batch lifecycle integration tests.
//!
//! A real HTTP fetcher talks to a local mock server while the remuxer is
//! mocked, so these cover everything from the input table to the ledgers
//! except the FFmpeg process itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hlsgrab_core::{
    parse_entries,
    testing::{fixtures, ConcurrencyProbe, MockFetcher, MockRemuxer},
    BatchScheduler, BatchSummary, HttpFetcher, ItemPipeline, Ledgers, StreamEntry,
};

struct TestHarness {
    server: MockServer,
    remuxer: MockRemuxer,
    work_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/live/3/master.m3u8"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                fixtures::master_playlist(&[(500_000, "low/index.m3u8"), (1_200_000, "hi/index.m3u8")]),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/live/2/master.m3u8"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Self {
            server,
            remuxer: MockRemuxer::new(),
            work_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.work_dir.path().join("video_files")
    }

    fn temp_dir(&self) -> PathBuf {
        self.work_dir.path().join("tmp")
    }

    fn ok_path(&self) -> PathBuf {
        self.work_dir.path().join("downloaded_files.txt")
    }

    fn err_path(&self) -> PathBuf {
        self.work_dir.path().join("skipped_files.txt")
    }

    fn input_table(&self) -> Vec<StreamEntry> {
        let csv = format!(
            "id,title,real_live_url\n\
             1,Broken Link,not a url\n\
             2,Gone Away,{base}/live/2/master.m3u8\n\
             3,Evening News,{base}/live/3/master.m3u8\n",
            base = self.server.uri()
        );
        parse_entries(csv.as_bytes()).expect("valid input table")
    }

    async fn run_batch(&self, concurrency: usize) -> BatchSummary {
        std::fs::create_dir_all(self.output_dir()).unwrap();
        std::fs::create_dir_all(self.temp_dir()).unwrap();

        let pipeline = ItemPipeline::new(
            HttpFetcher::with_defaults().unwrap(),
            self.remuxer.clone(),
            self.output_dir(),
            self.temp_dir(),
        );
        let scheduler = BatchScheduler::new(pipeline, concurrency);

        let mut ledgers = Ledgers::create(&self.ok_path(), &self.err_path(), false)
            .await
            .unwrap();
        let summary = scheduler.run(self.input_table(), &mut ledgers).await.unwrap();
        ledgers.finish().await.unwrap();
        summary
    }

    fn sorted_lines(path: &Path) -> Vec<String> {
        let mut lines: Vec<String> = std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        lines.sort();
        lines
    }
}

#[tokio::test]
async fn test_mixed_batch_outcomes() {
    let h = TestHarness::new().await;
    let summary = h.run_batch(5).await;

    assert_eq!(
        summary,
        BatchSummary {
            total: 3,
            succeeded: 1,
            failed: 2
        }
    );

    assert_eq!(
        TestHarness::sorted_lines(&h.ok_path()),
        vec!["3__Evening_News.mp4success"]
    );

    let failures = TestHarness::sorted_lines(&h.err_path());
    assert_eq!(failures.len(), 2);
    assert_eq!(
        failures[0],
        format!(
            "Error processing URL {0}/live/2/master.m3u8: HTTP 404 fetching {0}/live/2/master.m3u8",
            h.server.uri()
        )
    );
    assert_eq!(failures[1], "Invalid URL: not a url");

    // Exactly one remux, of the highest-bandwidth variant.
    let jobs = h.remuxer.recorded_jobs().await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_id, "3");
    assert_eq!(
        jobs[0].input_url,
        format!("{}/live/3/hi/index.m3u8", h.server.uri())
    );
    assert_eq!(jobs[0].output_path, h.output_dir().join("3__Evening_News.mp4"));
    assert!(h.output_dir().join("3__Evening_News.mp4").exists());
}

#[tokio::test]
async fn test_no_temporary_playlists_left_behind() {
    let h = TestHarness::new().await;
    h.run_batch(2).await;

    let leftovers: Vec<_> = std::fs::read_dir(h.temp_dir())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name())
        .collect();
    assert!(leftovers.is_empty(), "leftover files: {:?}", leftovers);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let h = TestHarness::new().await;

    let first = h.run_batch(5).await;
    let ok_first = TestHarness::sorted_lines(&h.ok_path());
    let err_first = TestHarness::sorted_lines(&h.err_path());

    let second = h.run_batch(1).await;

    assert_eq!(first, second);
    assert_eq!(TestHarness::sorted_lines(&h.ok_path()), ok_first);
    assert_eq!(TestHarness::sorted_lines(&h.err_path()), err_first);

    let files: Vec<_> = std::fs::read_dir(h.output_dir())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files, vec!["3__Evening_News.mp4".to_string()]);
}

#[tokio::test]
async fn test_in_flight_entries_never_exceed_cap() {
    let probe = ConcurrencyProbe::new();
    let fetcher = MockFetcher::new().with_probe(probe.clone());
    let remuxer = MockRemuxer::new().with_probe(probe.clone());
    fetcher.set_delay(Duration::from_millis(15)).await;
    remuxer.set_delay(Duration::from_millis(15)).await;

    let entries = fixtures::entries(20);
    for entry in entries.iter().skip(1) {
        fetcher
            .set_response(&entry.url, fixtures::master_playlist(&[(800_000, "v.m3u8")]))
            .await;
    }

    let dir = TempDir::new().unwrap();
    let pipeline = ItemPipeline::new(fetcher.clone(), remuxer.clone(), dir.path(), dir.path());
    let scheduler = BatchScheduler::new(pipeline, 5);

    let mut ledgers = Ledgers::create(
        &dir.path().join("downloaded_files.txt"),
        &dir.path().join("skipped_files.txt"),
        false,
    )
    .await
    .unwrap();
    let summary = scheduler.run(entries, &mut ledgers).await.unwrap();
    ledgers.finish().await.unwrap();

    assert_eq!(summary.total, 20);
    assert_eq!(summary.succeeded, 19);
    assert_eq!(summary.failed, 1);
    assert!(probe.max_observed() <= 5, "observed {}", probe.max_observed());
    assert_eq!(probe.current(), 0);
    assert_eq!(fetcher.recorded_fetches().await.len(), 20);
    assert_eq!(remuxer.recorded_jobs().await.len(), 19);
}
