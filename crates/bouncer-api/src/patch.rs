//! RFC 7396 JSON Merge Patch.
//!
//! Applies the whitelist-merged document of a partial update onto the
//! stored representation of a resource:
//! - objects merge recursively;
//! - `null` in the patch deletes the key;
//! - arrays and scalars replace the target value.

use serde_json::{Map, Value};

/// Apply `patch` to `target` with merge-patch semantics.
///
/// ```
/// use serde_json::json;
/// use bouncer_api::patch::apply_merge_patch;
///
/// let target = json!({"title": "a", "author": {"name": "Ann", "email": "a@x.io"}});
/// let patch = json!({"author": {"email": null}, "tags": ["x"]});
/// assert_eq!(
///     apply_merge_patch(target, patch),
///     json!({"title": "a", "author": {"name": "Ann"}, "tags": ["x"]})
/// );
/// ```
pub fn apply_merge_patch(target: Value, patch: Value) -> Value {
    let Value::Object(patch_map) = patch else {
        return patch;
    };

    // A non-object target is replaced by an empty object before patching.
    let mut target_map = match target {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for (key, patch_value) in patch_map {
        if patch_value.is_null() {
            target_map.remove(&key);
            continue;
        }
        let existing = target_map.remove(&key).unwrap_or(Value::Null);
        target_map.insert(key, apply_merge_patch(existing, patch_value));
    }
    Value::Object(target_map)
}
