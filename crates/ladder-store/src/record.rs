use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Open attribute mapping of one leaderboard entry as observed on a page.
pub type Snapshot = Map<String, Value>;

/// Candidate identifier fields, tried in order.
pub const ID_FIELDS: [&str; 7] = [
    "id",
    "profile_id",
    "user_id",
    "player_id",
    "profileId",
    "playerId",
    "id_str",
];

pub const RANK_FIELD: &str = "rank";

/// Derive the stable identifier of a snapshot.
///
/// Uses the first present, non-null field of [`ID_FIELDS`]; strings are taken
/// verbatim, other values in their compact JSON form. Without any of them the
/// key-sorted JSON of the whole snapshot is the identifier.
pub fn normalize_id(snapshot: &Snapshot) -> String {
    for key in ID_FIELDS {
        match snapshot.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return s.clone(),
            Some(other) => return other.to_string(),
        }
    }
    canonical(&Value::Object(snapshot.clone())).to_string()
}

// Rebuilds every object from sorted keys so the output does not depend on
// whether serde_json preserves insertion order.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let sorted = keys
                .into_iter()
                .map(|k| (k.clone(), canonical(&map[k])))
                .collect::<Map<String, Value>>();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

/// Rank of a snapshot; 0 when absent or unparseable.
pub fn rank_of(snapshot: &Snapshot) -> i64 {
    match snapshot.get(RANK_FIELD) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Drop volatile attributes (time series, counters) before storage.
pub fn strip_volatile<S: AsRef<str>>(snapshot: &mut Snapshot, fields: &[S]) {
    for field in fields {
        snapshot.remove(field.as_ref());
    }
}

/// Latest snapshot of an entity and the distinct pages it was seen on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default, deserialize_with = "lenient_snapshot")]
    pub latest: Snapshot,
    #[serde(default, deserialize_with = "lenient_pages")]
    pub pages:  Vec<u64>,
}

impl EntityRecord {
    pub fn new(latest: Snapshot, page: u64) -> Self {
        Self {
            latest,
            pages: vec![page],
        }
    }

    /// Replace the snapshot wholesale and add `page` unless already present.
    pub fn observe(&mut self, latest: Snapshot, page: u64) {
        if !self.pages.contains(&page) {
            self.pages.push(page);
        }
        self.latest = latest;
    }
}

fn lenient_snapshot<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Snapshot, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Snapshot::new()),
    }
}

// Older files may carry pages as floats or strings.
fn lenient_pages<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    let mut pages = Vec::with_capacity(items.len());
    for item in items {
        let page = match item {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        if let Some(page) = page
            && !pages.contains(&page)
        {
            pages.push(page);
        }
    }
    Ok(pages)
}
