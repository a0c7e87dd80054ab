//! Continuous, resumable crawl of a paginated leaderboard.
//!
//! # Architecture
//!
//! - [`Scheduler`] hands out strictly increasing page numbers, never more
//!   than the prefetch window ahead of integration.
//! - [`WorkerPool`] fetches and decodes pages on a fixed number of tasks.
//! - [`Crawler`] is the single writer: it owns the cursor, the
//!   [`BucketStore`](ladder_store::BucketStore) and the checkpoint, and is
//!   the only place that persists them.
//!
//! The crawl has no end condition. It keeps issuing pages until the
//! shutdown future resolves; pages past the end of the leaderboard simply
//! decode to nothing.

mod crawler;
mod decode;
mod error;
mod scheduler;
mod settings;
mod target;
mod worker;

pub use crawler::{Crawler, RunSummary};
pub use decode::{DATA_FIELD, decode_page};
pub use error::{CrawlError, Result};
pub use scheduler::{PageTicket, Scheduler};
pub use settings::CrawlSettings;
pub use target::{ENDPOINT, Target, TargetRegistry, page_url};
pub use worker::{Batch, WorkerPool};
