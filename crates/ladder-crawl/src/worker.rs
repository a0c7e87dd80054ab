//! Fixed-size pool of page fetchers.

use std::sync::Arc;

use ladder_fetch::{HttpClient, RetryClient};
use ladder_store::Snapshot;
use tokio::sync::mpsc;
use tracing::debug;

use crate::decode::decode_page;
use crate::scheduler::PageTicket;
use crate::target::Target;

/// Decoded records of one page, still holding the page's window slot.
#[derive(Debug)]
pub struct Batch {
    pub page:    u64,
    pub records: Vec<Snapshot>,
    ticket:      PageTicket,
}

impl Batch {
    /// Splits the batch; keep the ticket alive until the records are stored.
    pub fn into_parts(self) -> (u64, Vec<Snapshot>, PageTicket) { (self.page, self.records, self.ticket) }
}

/// Workers pull tickets from a shared queue, fetch the page, and push
/// non-empty batches back to the single consumer.
///
/// Pages that fail after retries or decode to nothing are dropped; dropping
/// their ticket frees the window slot. Worker tasks are detached: closing or
/// dropping the pool never cancels a request that has already started.
pub struct WorkerPool {
    pages:   Option<flume::Sender<PageTicket>>,
    // Lets `close` discard pages no worker has picked up yet.
    pending: flume::Receiver<PageTicket>,
    batches: mpsc::Receiver<Batch>,
    workers: usize,
}

impl WorkerPool {
    /// Spawns `workers` tasks on the current runtime.
    ///
    /// Both queues hold `window` items, the most that can be outstanding.
    pub fn spawn<C>(client: Arc<RetryClient<C>>, target: Target, page_size: u32, workers: usize, window: usize) -> Self
    where
        C: HttpClient + 'static,
    {
        let window = window.max(1);
        let workers = workers.max(1);
        let (page_tx, page_rx) = flume::bounded::<PageTicket>(window);
        let (batch_tx, batch_rx) = mpsc::channel(window);

        for id in 0..workers {
            let worker = Worker {
                id,
                client: Arc::clone(&client),
                target: target.clone(),
                page_size,
            };
            tokio::spawn(worker.run(page_rx.clone(), batch_tx.clone()));
        }

        Self {
            pages: Some(page_tx),
            pending: page_rx,
            batches: batch_rx,
            workers,
        }
    }

    pub fn worker_count(&self) -> usize { self.workers }

    /// Queues a page for fetching.
    ///
    /// Returns `false` once the pool is closed or every worker has exited;
    /// the ticket is dropped in that case.
    pub async fn dispatch(&self, ticket: PageTicket) -> bool {
        let Some(pages) = &self.pages else {
            return false;
        };
        // `pending` is not a worker.
        if pages.receiver_count() <= 1 {
            return false;
        }
        pages.send_async(ticket).await.is_ok()
    }

    /// Next completed batch, or `None` once every worker has exited.
    pub async fn next_batch(&mut self) -> Option<Batch> { self.batches.recv().await }

    /// Stops accepting pages and discards the ones still queued.
    ///
    /// Requests already in flight run to completion; their workers then
    /// exit. Batches they produce after the pool is dropped are lost.
    pub fn close(&mut self) {
        self.pages.take();
        let discarded = self.pending.drain().count();
        if discarded > 0 {
            debug!(discarded, "queued pages discarded");
        }
    }
}

struct Worker<C: HttpClient> {
    id:        usize,
    client:    Arc<RetryClient<C>>,
    target:    Target,
    page_size: u32,
}

impl<C: HttpClient + 'static> Worker<C> {
    async fn run(self, pages: flume::Receiver<PageTicket>, batches: mpsc::Sender<Batch>) {
        while let Ok(ticket) = pages.recv_async().await {
            let page = ticket.page();
            let url = self.target.page_url(page, self.page_size);

            let records = match self.client.fetch(&url).await {
                Ok(response) => decode_page(&response.body),
                Err(e) => {
                    debug!(worker = self.id, page, error = %e, "page dropped");
                    continue;
                }
            };

            if records.is_empty() {
                debug!(worker = self.id, page, "page had no records");
                continue;
            }

            if batches.send(Batch { page, records, ticket }).await.is_err() {
                break;
            }
        }
        debug!(worker = self.id, "worker stopped");
    }
}
