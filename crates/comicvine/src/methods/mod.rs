//! Resource-specific request helpers.

mod issue;
mod search;
mod volume;

pub use issue::IssueMethods;
pub use search::SearchMethods;
pub use volume::VolumeMethods;

use comicvine_error::{ComicVineResult, JsonError};
use serde_json::Value;

/// Numeric resource id taken from `data["id"]`.
///
/// Accepts a JSON number or a string of digits.
fn resource_id(data: &Value) -> ComicVineResult<u64> {
    let id = data.get("id").ok_or_else(|| JsonError::new("Missing \"id\" field"))?;
    let parsed = match id {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| JsonError::new(format!("Invalid resource id: {}", id)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_id_forms() {
        assert_eq!(resource_id(&json!({"id": 6})).unwrap(), 6);
        assert_eq!(resource_id(&json!({"id": "796"})).unwrap(), 796);
        assert!(resource_id(&json!({"id": -1})).is_err());
        assert!(resource_id(&json!({"name": "x"})).is_err());
    }
}
