use std::fmt;

/// A 1-based inclusive rank range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketRange {
    pub start: u64,
    pub end:   u64,
}

impl BucketRange {
    /// Home of entities whose rank is missing, non-positive or unparseable.
    pub const SENTINEL: Self = Self { start: 0, end: 0 };

    pub fn is_sentinel(&self) -> bool { *self == Self::SENTINEL }

    pub fn contains(&self, rank: i64) -> bool {
        rank > 0 && self.start <= rank as u64 && rank as u64 <= self.end
    }

    /// Directory name of this range under the store root, e.g. `1to20000`.
    pub fn dir_name(&self) -> String { format!("{}to{}", self.start, self.end) }
}

impl fmt::Display for BucketRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Map a rank onto its fixed-width bucket.
///
/// `start = floor((rank - 1) / width) * width + 1`; ranks `<= 0` (and a zero
/// width) map to [`BucketRange::SENTINEL`].
pub fn bucket_range(rank: i64, width: u64) -> BucketRange {
    if rank <= 0 || width == 0 {
        return BucketRange::SENTINEL;
    }
    let rank = rank as u64;
    let start = ((rank - 1) / width) * width + 1;
    BucketRange {
        start,
        end: start.saturating_add(width - 1),
    }
}
