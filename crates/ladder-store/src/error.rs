use thiserror::Error;

use crate::range::BucketRange;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket width must be positive")]
    InvalidWidth,

    #[error("failed to persist bucket {range}: {source}")]
    Persist {
        range:  BucketRange,
        #[source]
        source: ladder_fs::Error,
    },

    #[error("failed to persist checkpoint: {0}")]
    Checkpoint(#[source] ladder_fs::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
