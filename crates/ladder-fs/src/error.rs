use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("path has no parent directory: {}", path.display())]
    NoParent { path: PathBuf },

    #[error("directory is not writable: {}: {source}", path.display())]
    NotWritable {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
