//! Configuration merge logic
//!
//! - Tables: deep-merge by key
//! - Arrays: REPLACE (a config file listing `sources` replaces the whole list)
//! - Scalars: override (last wins)
//!
//! This is only for configuration. Type definitions are merged shallowly
//! by `typedef_merge`.

use serde_json::Value;

/// Deep merge two JSON values, `overlay` taking precedence.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge config layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sources_array_replaced() {
        let base = json!({"sources": ["primitives", "pallets/dex", "pallets/rewards"]});
        let overlay = json!({"sources": ["runtime"]});
        let result = deep_merge(base, overlay);

        assert_eq!(result["sources"], json!(["runtime"]));
    }

    #[test]
    fn test_converter_table_deep_merged() {
        let base = json!({
            "converter": {
                "enabled": true,
                "program": "python3",
                "args": ["convert.py"]
            }
        });
        let overlay = json!({"converter": {"enabled": false}});
        let result = deep_merge(base, overlay);

        assert_eq!(result["converter"]["enabled"], false);
        assert_eq!(result["converter"]["program"], "python3");
        assert_eq!(result["converter"]["args"], json!(["convert.py"]));
    }

    #[test]
    fn test_new_key_added() {
        let result = deep_merge(json!({"root": ".."}), json!({"output": "all.json"}));
        assert_eq!(result, json!({"root": "..", "output": "all.json"}));
    }

    #[test]
    fn test_three_layers() {
        let builtin = json!({"root": "..", "output": "types.json"});
        let file = json!({"root": "/srv/runtime", "output": "merged.json"});
        let cli = json!({"root": "fixtures"});

        let result = merge_layers(vec![builtin, file, cli]);

        assert_eq!(result["root"], "fixtures");
        assert_eq!(result["output"], "merged.json");
    }

    #[test]
    fn test_no_layers_is_null() {
        assert!(merge_layers(Vec::new()).is_null());
    }
}
