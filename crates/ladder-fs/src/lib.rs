//! Crash-safe file replacement for crawl state.
//!
//! Every persisted file (bucket or checkpoint) is written to a temporary file
//! in the destination directory, flushed, and then renamed over the target.
//! Readers observe either the previous complete generation or the new one.
//!
//! Loading is best-effort: a missing or undecodable file yields the type's
//! default, since defaults are valid starting states for a fresh crawl.

mod atomic;
mod error;
mod json;

pub use atomic::{AtomicWriteOptions, StagedWrite, atomic_read, atomic_write, ensure_writable_dir, stage};
pub use error::{Error, Result};
pub use json::{atomic_write_json, encode_json, read_json_or_default};
