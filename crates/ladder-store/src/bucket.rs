use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::range::{BucketRange, bucket_range};
use crate::record::{EntityRecord, Snapshot, rank_of};

pub const BUCKET_FILE: &str = "data.json";

/// One rank range worth of entity records.
///
/// The dirty flag lives only in memory; it is set by every update and
/// cleared once the bucket has been written out.
#[derive(Debug, Clone)]
pub struct Bucket {
    range:   BucketRange,
    entries: BTreeMap<String, EntityRecord>,
    dirty:   bool,
}

impl Bucket {
    /// Load a bucket file; missing or undecodable files give an empty bucket.
    fn load(range: BucketRange, path: &Path) -> Self {
        let raw: Map<String, Value> = ladder_fs::read_json_or_default(path);
        let mut entries = BTreeMap::new();

        for (id, value) in raw {
            match serde_json::from_value::<EntityRecord>(value) {
                Ok(record) => {
                    entries.insert(id, record);
                }
                Err(e) => {
                    tracing::warn!(%range, id = %id, error = %e, "skipping malformed record");
                }
            }
        }

        Self {
            range,
            entries,
            dirty: false,
        }
    }

    pub fn range(&self) -> BucketRange { self.range }

    pub fn entries(&self) -> &BTreeMap<String, EntityRecord> { &self.entries }

    pub fn get(&self, id: &str) -> Option<&EntityRecord> { self.entries.get(id) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn is_dirty(&self) -> bool { self.dirty }

    fn upsert(&mut self, id: &str, snapshot: Snapshot, page: u64) {
        match self.entries.get_mut(id) {
            Some(record) => record.observe(snapshot, page),
            None => {
                self.entries
                    .insert(id.to_string(), EntityRecord::new(snapshot, page));
            }
        }
        self.dirty = true;
    }
}

/// Outcome of [`BucketStore::save_dirty`].
#[derive(Debug, Default)]
pub struct FlushReport {
    pub written:  usize,
    pub failures: Vec<StoreError>,
}

impl FlushReport {
    pub fn is_clean(&self) -> bool { self.failures.is_empty() }
}

/// Lazily loaded, write-back cache of rank buckets under one storage root.
///
/// Buckets are read from disk on first access and stay resident for the
/// lifetime of the store. Entities are never moved between buckets when
/// their rank changes, so an identifier may appear under an older range.
#[derive(Debug)]
pub struct BucketStore {
    root:  PathBuf,
    width: u64,
    cache: HashMap<BucketRange, Bucket>,
}

impl BucketStore {
    pub fn open(root: impl Into<PathBuf>, width: u64) -> Result<Self> {
        if width == 0 {
            return Err(StoreError::InvalidWidth);
        }
        Ok(Self {
            root: root.into(),
            width,
            cache: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn width(&self) -> u64 { self.width }

    pub fn bucket_path(&self, range: BucketRange) -> PathBuf { bucket_file(&self.root, range) }

    /// Merge one observation of `id` into the bucket of its current rank.
    ///
    /// Returns the range the record was written to.
    pub fn update(&mut self, id: &str, snapshot: Snapshot, page: u64) -> BucketRange {
        let range = bucket_range(rank_of(&snapshot), self.width);
        self.resident_mut(range).upsert(id, snapshot, page);
        range
    }

    fn resident_mut(&mut self, range: BucketRange) -> &mut Bucket {
        let root = &self.root;
        self.cache
            .entry(range)
            .or_insert_with(|| Bucket::load(range, &bucket_file(root, range)))
    }

    /// Write every dirty bucket; failed buckets stay dirty for the next flush.
    pub fn save_dirty(&mut self) -> FlushReport {
        let mut report = FlushReport::default();

        for bucket in self.cache.values_mut().filter(|b| b.dirty) {
            let path = bucket_file(&self.root, bucket.range);
            match ladder_fs::atomic_write_json(&path, &bucket.entries) {
                Ok(()) => {
                    bucket.dirty = false;
                    report.written += 1;
                }
                Err(source) => report.failures.push(StoreError::Persist {
                    range: bucket.range,
                    source,
                }),
            }
        }

        report
    }

    pub fn bucket(&self, range: BucketRange) -> Option<&Bucket> { self.cache.get(&range) }

    pub fn dirty_count(&self) -> usize { self.cache.values().filter(|b| b.dirty).count() }
}

fn bucket_file(root: &Path, range: BucketRange) -> PathBuf {
    root.join(range.dir_name()).join(BUCKET_FILE)
}
