use std::sync::Arc;

use ladder_store::FIRST_PAGE;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// One slot of the prefetch window, bound to the page it was issued for.
///
/// The slot is released when the ticket is dropped, which happens once the
/// page's batch has been integrated or the page has been discarded.
#[derive(Debug)]
pub struct PageTicket {
    page:    u64,
    _permit: OwnedSemaphorePermit,
}

impl PageTicket {
    pub fn page(&self) -> u64 { self.page }
}

/// Issues consecutive page numbers, bounded by a prefetch window.
#[derive(Debug)]
pub struct Scheduler {
    next_page: u64,
    window:    Arc<Semaphore>,
    capacity:  usize,
}

impl Scheduler {
    /// `window` is clamped to at least one slot.
    pub fn new(start: u64, window: usize) -> Self {
        let capacity = window.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            next_page: start.max(FIRST_PAGE),
            window: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// The next page that will be issued.
    pub fn cursor(&self) -> u64 { self.next_page }

    pub fn capacity(&self) -> usize { self.capacity }

    /// Pages issued whose tickets are still alive.
    pub fn outstanding(&self) -> usize { self.capacity - self.window.available_permits() }

    /// Waits for a free slot and issues the page under the cursor.
    ///
    /// Cancel safe: the cursor only advances once a slot is held, so a
    /// dropped call issues nothing. Returns `None` after [`close`](Self::close).
    pub async fn issue(&mut self) -> Option<PageTicket> {
        let permit = Arc::clone(&self.window).acquire_owned().await.ok()?;
        let page = self.next_page;
        self.next_page += 1;
        Some(PageTicket {
            page,
            _permit: permit,
        })
    }

    /// Stops issuing. Pending and future [`issue`](Self::issue) calls return `None`.
    pub fn close(&self) { self.window.close(); }
}
