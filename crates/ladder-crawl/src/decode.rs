use ladder_store::Snapshot;
use serde_json::Value;

/// Envelope field holding the page's entries.
pub const DATA_FIELD: &str = "data";

/// Extracts entity snapshots from a page body.
///
/// Accepts `{"data": [...]}` or a bare top-level list. Anything else,
/// including malformed JSON, yields no records. Non-object list items are
/// skipped.
pub fn decode_page(body: &[u8]) -> Vec<Snapshot> {
    let items = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut envelope)) => match envelope.remove(DATA_FIELD) {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        Ok(Value::Array(items)) => items,
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(snapshot) => Some(snapshot),
            _ => None,
        })
        .collect()
}
