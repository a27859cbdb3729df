// JSON encoding of the persisted task collection

use crate::models::Task;

/// Serialize the full collection as a single JSON array
pub fn encode(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

/// Parse a persisted collection
///
/// A blank value is treated as an empty collection. Any malformed record
/// fails the whole decode; callers decide how to degrade.
pub fn decode(raw: &str) -> serde_json::Result<Vec<Task>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}
