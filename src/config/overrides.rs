//! CLI overrides (layer 3)

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub sources: Vec<String>,
    pub output: Option<PathBuf>,
    pub mapping_output: Option<PathBuf>,
    pub no_convert: bool,
}

impl ConfigOverrides {
    /// Convert to a JSON layer, `None` when nothing was overridden
    pub fn to_value(&self) -> Option<Value> {
        let mut layer = Map::new();
        let mut converter = Map::new();

        if let Some(ref root) = self.root {
            layer.insert("root".to_string(), path_value(root));
        }
        if !self.sources.is_empty() {
            layer.insert("sources".to_string(), json!(self.sources));
        }
        if let Some(ref output) = self.output {
            layer.insert("output".to_string(), path_value(output));
        }
        if let Some(ref mapping_output) = self.mapping_output {
            converter.insert("output".to_string(), path_value(mapping_output));
        }
        if self.no_convert {
            converter.insert("enabled".to_string(), Value::Bool(false));
        }
        if !converter.is_empty() {
            layer.insert("converter".to_string(), Value::Object(converter));
        }

        if layer.is_empty() {
            None
        } else {
            Some(Value::Object(layer))
        }
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}
