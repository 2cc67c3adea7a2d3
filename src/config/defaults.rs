//! Built-in defaults (layer 1)
//!
//! With no config file and no flags these reproduce the fixed layout:
//! run from `scripts/`, read `../<module>/types.json`, write
//! `../types.json` and `../types_mapping.json`.

use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "aggregate-types.toml";

/// Modules with custom types, in merge order.
///
/// System pallets are not listed; their types are already known downstream.
pub const DEFAULT_SOURCES: &[&str] = &[
    "primitives",
    "pallets/bullet-train",
    "pallets/rewards",
    "pallets/support",
    "pallets/dex",
];

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Common root of the source directories (default: "..")
    pub root: String,

    /// Source identifiers in merge order
    pub sources: Vec<String>,

    /// Aggregate output, relative to root (default: "types.json")
    pub output: String,

    /// Converter output, relative to root (default: "types_mapping.json")
    pub mapping_output: String,

    /// Converter program (default: "python3")
    pub converter_program: String,

    /// Arguments placed before the input path (default: ["convert.py"])
    pub converter_args: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            root: "..".to_string(),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            output: "types.json".to_string(),
            mapping_output: "types_mapping.json".to_string(),
            converter_program: "python3".to_string(),
            converter_args: vec!["convert.py".to_string()],
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "root": self.root,
            "sources": self.sources,
            "output": self.output,
            "converter": {
                "enabled": true,
                "program": self.converter_program,
                "args": self.converter_args,
                "output": self.mapping_output
            }
        })
    }
}
