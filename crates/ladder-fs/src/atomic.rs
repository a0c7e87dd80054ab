use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug)]
pub struct AtomicWriteOptions {
    sync: bool,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self { Self::new() }
}

impl AtomicWriteOptions {
    pub fn new() -> Self { Self { sync: true } }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// A fully written temporary file that has not replaced its destination yet.
///
/// Dropping it without calling [`StagedWrite::commit`] removes the temporary
/// file and leaves the destination untouched.
#[derive(Debug)]
pub struct StagedWrite {
    tmp:         NamedTempFile,
    destination: PathBuf,
    sync:        bool,
}

impl StagedWrite {
    pub fn staging_path(&self) -> &Path { self.tmp.path() }

    /// Rename the staged file over the destination.
    pub fn commit(self) -> Result<()> {
        let Self {
            tmp,
            destination,
            sync,
        } = self;

        tmp.persist(&destination).map_err(|e| Error::Write {
            path:   destination.clone(),
            source: e.error,
        })?;

        if sync {
            sync_parent(&destination);
        }
        Ok(())
    }
}

/// Write `content` to a temporary sibling of `path` without publishing it.
pub fn stage(path: impl AsRef<Path>, content: &[u8], options: AtomicWriteOptions) -> Result<StagedWrite> {
    let path = path.as_ref();
    let parent = parent_of(path)?;

    fs::create_dir_all(parent).map_err(|e| Error::Write {
        path:   parent.to_path_buf(),
        source: e,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::Write {
            path:   parent.to_path_buf(),
            source: e,
        })?;

    tmp.write_all(content).map_err(|e| Error::Write {
        path:   tmp.path().to_path_buf(),
        source: e,
    })?;

    if options.sync {
        tmp.as_file().sync_all().map_err(|e| Error::Write {
            path:   tmp.path().to_path_buf(),
            source: e,
        })?;
    }

    Ok(StagedWrite {
        tmp,
        destination: path.to_path_buf(),
        sync: options.sync,
    })
}

pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: AtomicWriteOptions) -> Result<()> {
    stage(path, content, options)?.commit()
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| Error::Read {
        path:   path.to_path_buf(),
        source: e,
    })
}

/// Create `dir` if needed and prove that files can be created inside it.
pub fn ensure_writable_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::NotWritable {
        path:   dir.to_path_buf(),
        source: e,
    })?;

    tempfile::tempfile_in(dir).map_err(|e| Error::NotWritable {
        path:   dir.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn parent_of(path: &Path) -> Result<&Path> {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Ok(Path::new(".")),
        Some(p) => Ok(p),
        None => Err(Error::NoParent {
            path: path.to_path_buf(),
        }),
    }
}

// Best effort: the rename itself is already atomic.
#[cfg(unix)]
fn sync_parent(path: &Path) {
    if let Ok(parent) = parent_of(path)
        && let Ok(dir) = fs::File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        atomic_write(&path, b"hello world", AtomicWriteOptions::new()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1to20000").join("data.json");
        atomic_write(&path, b"{}", AtomicWriteOptions::new().sync(false)).unwrap();
        assert_eq!(atomic_read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_stage_is_sibling_of_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last.json");
        let staged = stage(&path, b"{}", AtomicWriteOptions::new()).unwrap();
        assert_eq!(staged.staging_path().parent(), path.parent());
        assert!(!path.exists());
        staged.commit().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_parent_of_bare_file_name() {
        assert_eq!(parent_of(Path::new("last.json")).unwrap(), Path::new("."));
    }

    #[test]
    fn test_ensure_writable_dir_creates() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Data").join("www");
        ensure_writable_dir(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_ensure_writable_dir_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, "x").unwrap();
        let err = ensure_writable_dir(&file).unwrap_err();
        assert!(matches!(err, Error::NotWritable { .. }));
    }
}
