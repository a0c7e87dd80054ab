//! Rank-bucketed persistent store for leaderboard entities.
//!
//! Entities are partitioned by the fixed-width rank range they occupied when
//! first written, one JSON file per range:
//!
//! ```text
//! {root}/
//!   last.json               {"page": N}
//!   1to20000/data.json      {"<id>": {"latest": {...}, "pages": [..]}, ...}
//!   20001to40000/data.json
//!   0to0/data.json          entities without a usable rank
//! ```
//!
//! The store is owned by a single control flow and performs no locking.

mod bucket;
mod checkpoint;
mod error;
mod range;
mod record;

pub use bucket::{BUCKET_FILE, Bucket, BucketStore, FlushReport};
pub use checkpoint::{CHECKPOINT_FILE, Checkpoint, CheckpointFile, FIRST_PAGE};
pub use error::{Result, StoreError};
pub use range::{BucketRange, bucket_range};
pub use record::{
    EntityRecord, ID_FIELDS, RANK_FIELD, Snapshot, normalize_id, rank_of, strip_volatile,
};
