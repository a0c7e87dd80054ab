use ladder_fs::{AtomicWriteOptions, atomic_read, atomic_write, stage};
use tempfile::tempdir;

#[test]
fn test_atomic_write_basic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    atomic_write(&path, b"hello world", AtomicWriteOptions::new()).unwrap();

    assert!(path.exists());
    assert_eq!(atomic_read(&path).unwrap(), b"hello world");
}

#[test]
fn test_atomic_write_replaces_previous_generation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    std::fs::write(&path, "original").unwrap();
    atomic_write(&path, b"new content", AtomicWriteOptions::new()).unwrap();

    assert_eq!(atomic_read(&path).unwrap(), b"new content");
}

#[test]
fn test_interrupted_write_keeps_committed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    atomic_write(&path, b"{\"generation\": 1}", AtomicWriteOptions::new()).unwrap();

    // Staged but never renamed: the process "dies" between write and rename.
    let staged = stage(&path, b"{\"generation\": 2, \"partial\"", AtomicWriteOptions::new()).unwrap();
    let staging_path = staged.staging_path().to_path_buf();
    assert!(staging_path.exists());
    assert_eq!(atomic_read(&path).unwrap(), b"{\"generation\": 1}");
    drop(staged);

    assert!(!staging_path.exists());
    assert_eq!(atomic_read(&path).unwrap(), b"{\"generation\": 1}");

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("data.json")]);
}

#[test]
fn test_reader_sees_whole_generations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let first = vec![b'a'; 64 * 1024];
    let second = vec![b'b'; 64 * 1024];

    atomic_write(&path, &first, AtomicWriteOptions::new()).unwrap();
    let staged = stage(&path, &second, AtomicWriteOptions::new()).unwrap();
    assert_eq!(atomic_read(&path).unwrap(), first);
    staged.commit().unwrap();
    assert_eq!(atomic_read(&path).unwrap(), second);
}
