use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use ladder_fetch::{HttpClient, RetryClient};
use ladder_store::{BucketStore, Checkpoint, CheckpointFile, normalize_id, strip_volatile};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use crate::error::{CrawlError, Result};
use crate::scheduler::Scheduler;
use crate::settings::CrawlSettings;
use crate::target::Target;
use crate::worker::{Batch, WorkerPool};

/// Counters of one [`Crawler::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Page the run resumed from.
    pub first_page:   u64,
    /// Checkpoint written by the final flush.
    pub next_page:    u64,
    pub pages_issued: u64,
    pub batches:      u64,
    pub records:      u64,
    pub flushes:      u64,
}

/// Crawls one target until told to stop.
///
/// The crawler is the only writer of the bucket store and the checkpoint.
/// Workers hand it decoded batches; it stamps each record with the page it
/// came from, stores it, and persists everything on a fixed interval and
/// once more on shutdown.
pub struct Crawler<C: HttpClient> {
    target:          Target,
    settings:        CrawlSettings,
    client:          Arc<RetryClient<C>>,
    store:           BucketStore,
    checkpoint_file: CheckpointFile,
    checkpoint:      Checkpoint,
}

impl<C: HttpClient + 'static> Crawler<C> {
    /// Prepares `{data_root}/{target}` and loads the saved cursor.
    ///
    /// Fails when the settings are invalid or the storage root cannot be
    /// created or written to.
    pub fn open(target: Target, settings: CrawlSettings, client: C) -> Result<Self> {
        settings.validate()?;

        let root = settings.data_root.join(&target.name);
        ladder_fs::ensure_writable_dir(&root).map_err(|source| CrawlError::StorageRoot {
            path: root.clone(),
            source,
        })?;

        let checkpoint_file = CheckpointFile::in_root(&root);
        let checkpoint = checkpoint_file.load();
        let store = BucketStore::open(&root, settings.bucket_width)?;
        let client = Arc::new(RetryClient::new(client, settings.retry_policy()));

        info!(
            server = %target.name,
            root = %root.display(),
            page = checkpoint.page,
            "crawler ready"
        );

        Ok(Self {
            target,
            settings,
            client,
            store,
            checkpoint_file,
            checkpoint,
        })
    }

    pub fn target(&self) -> &Target { &self.target }

    pub fn storage_root(&self) -> &Path { self.store.root() }

    /// The next page to be issued.
    pub fn checkpoint(&self) -> Checkpoint { self.checkpoint }

    /// Runs until `shutdown` resolves, then flushes and returns.
    ///
    /// Fetch and persistence failures are logged and never end the run.
    /// Shutdown closes the page supply without cancelling requests already
    /// in flight; their results arrive after the final flush and are lost.
    /// Those pages are behind the saved cursor and are not fetched again.
    pub async fn run<F>(mut self, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        let mut summary = RunSummary {
            first_page: self.checkpoint.page,
            ..RunSummary::default()
        };
        let mut scheduler = Scheduler::new(self.checkpoint.page, self.settings.prefetch);
        let mut pool = WorkerPool::spawn(
            Arc::clone(&self.client),
            self.target.clone(),
            self.settings.page_size,
            self.settings.workers,
            self.settings.prefetch,
        );

        let period = self.settings.save_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            server = %self.target.name,
            page = self.checkpoint.page,
            workers = pool.worker_count(),
            prefetch = scheduler.capacity(),
            "crawl started"
        );

        tokio::pin!(shutdown);
        let mut outcome = Ok(());
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!(server = %self.target.name, "shutdown requested");
                    break;
                }
                Some(ticket) = scheduler.issue() => {
                    self.checkpoint = Checkpoint::at(scheduler.cursor());
                    summary.pages_issued += 1;
                    if !pool.dispatch(ticket).await {
                        error!(server = %self.target.name, "worker pool is gone");
                        outcome = Err(CrawlError::WorkersStopped);
                        break;
                    }
                }
                Some(batch) = pool.next_batch() => self.integrate(batch, &mut summary),
                _ = ticker.tick() => self.flush(&mut summary),
            }
        }

        scheduler.close();
        pool.close();
        self.flush(&mut summary);
        summary.next_page = self.checkpoint.page;

        info!(
            server = %self.target.name,
            next_page = summary.next_page,
            pages = summary.pages_issued,
            batches = summary.batches,
            records = summary.records,
            "crawl stopped"
        );
        outcome.map(|()| summary)
    }

    fn integrate(&mut self, batch: Batch, summary: &mut RunSummary) {
        // The ticket holds the page's window slot until the records are stored.
        let (page, records, _ticket) = batch.into_parts();
        let count = records.len();

        for mut snapshot in records {
            strip_volatile(&mut snapshot, &self.settings.volatile_fields);
            let id = normalize_id(&snapshot);
            self.store.update(&id, snapshot, page);
        }

        summary.batches += 1;
        summary.records += count as u64;
        debug!(server = %self.target.name, page, records = count, "batch integrated");
    }

    fn flush(&mut self, summary: &mut RunSummary) {
        let report = self.store.save_dirty();
        for failure in &report.failures {
            warn!(server = %self.target.name, error = %failure, "bucket not saved, will retry");
        }

        if let Err(e) = self.checkpoint_file.save(&self.checkpoint) {
            warn!(server = %self.target.name, error = %e, "checkpoint not saved, will retry");
        }

        summary.flushes += 1;
        info!(
            server = %self.target.name,
            page = self.checkpoint.page,
            buckets = report.written,
            batches = summary.batches,
            records = summary.records,
            "progress saved"
        );
    }
}
