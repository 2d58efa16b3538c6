//! Recursive deep-merge over JSON configuration trees.

use serde_json::Value;

/// Key-wise recursive union of two JSON values.
///
/// Objects merge per key, with overlay entries winning on conflict after
/// recursing. Any other overlay value (scalar, array, null) replaces the
/// base wholesale.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

/// Merge `overlay` into an optional JSON slot, initializing it if unset.
pub(crate) fn merge_into_slot(slot: &mut Option<Value>, overlay: Value) {
    *slot = Some(match slot.take() {
        Some(existing) => deep_merge(existing, overlay),
        None => overlay,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn disjoint_keys_union() {
        let merged = deep_merge(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn nested_objects_merge_key_wise() {
        let merged = deep_merge(
            json!({"attrs": {"placeholder": "x"}, "label": "L"}),
            json!({"attrs": {"autoFocus": true}}),
        );
        assert_eq!(
            merged,
            json!({"attrs": {"placeholder": "x", "autoFocus": true}, "label": "L"})
        );
    }

    #[test]
    fn scalar_overlay_replaces() {
        assert_eq!(deep_merge(json!({"a": 1}), json!(7)), json!(7));
        assert_eq!(
            deep_merge(json!({"a": {"b": 1}}), json!({"a": 2})),
            json!({"a": 2})
        );
    }

    #[test]
    fn arrays_replace_not_concatenate() {
        let merged = deep_merge(json!({"xs": [1, 2]}), json!({"xs": [3]}));
        assert_eq!(merged, json!({"xs": [3]}));
    }

    #[test]
    fn merge_into_unset_slot_installs() {
        let mut slot = None;
        merge_into_slot(&mut slot, json!({"a": 1}));
        assert_eq!(slot, Some(json!({"a": 1})));
    }

    #[test]
    fn merge_into_set_slot_merges() {
        let mut slot = Some(json!({"a": {"x": 1}}));
        merge_into_slot(&mut slot, json!({"a": {"y": 2}}));
        assert_eq!(slot, Some(json!({"a": {"x": 1, "y": 2}})));
    }
}
