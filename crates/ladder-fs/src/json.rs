use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{AtomicWriteOptions, Error, Result, atomic_write};

/// Two-space indented JSON with a trailing newline.
pub fn encode_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|e| Error::Encode {
        path:   path.to_path_buf(),
        source: e,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn atomic_write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_json(path, value)?;
    atomic_write(path, &bytes, AtomicWriteOptions::new())
}

/// Load `path`, falling back to `T::default()` when it is missing or unusable.
pub fn read_json_or_default<T>(path: impl AsRef<Path>) -> T
where
    T: DeserializeOwned + Default,
{
    let path = path.as_ref();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return T::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable file, starting from default");
            return T::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "undecodable file, starting from default");
            T::default()
        }
    }
}
