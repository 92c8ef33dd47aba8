use crate::domain::ArgMap;
use serde_json::Value;

/// Convert and filter request arguments, returning a new mapping.
///
/// String values are trimmed, tabs become spaces, spaces become
/// underscores; entries that normalize to nothing are dropped. Non-string
/// values pass through untouched. Nothing here fails, and running the
/// result through again changes nothing.
pub fn normalize_args(args: ArgMap) -> ArgMap {
    let mut out = ArgMap::new();
    for (key, value) in args {
        match value {
            Value::String(s) => {
                let cleaned = s.trim().replace('\t', " ").replace(' ', "_");
                if !cleaned.is_empty() {
                    out.insert(key, Value::String(cleaned));
                }
            }
            other => {
                out.insert(key, other);
            }
        }
    }
    out
}
