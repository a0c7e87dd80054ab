use std::path::PathBuf;

use ladder_fetch::FetchError;
use ladder_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("unknown target '{name}' (known: {known})")]
    UnknownTarget { name: String, known: String },

    #[error("target '{name}' has an invalid base URL: {url}")]
    InvalidTarget { name: String, url: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("storage root {} is unusable: {source}", path.display())]
    StorageRoot {
        path:   PathBuf,
        #[source]
        source: ladder_fs::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("every worker has stopped")]
    WorkersStopped,
}

pub type Result<T> = std::result::Result<T, CrawlError>;
