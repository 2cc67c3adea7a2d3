//! Type definition aggregation
//!
//! Reads `<root>/<id>/types.json` for every configured source, folds them
//! in order with last-definition-wins, and writes the aggregate. Every
//! source is read and parsed before anything is written, so a missing or
//! malformed source leaves a previous `types.json` untouched.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use typedef_merge::{merge_layers, Collision, Layer, Merged, TypeMap};

use crate::config::AggregatorConfig;

/// File name expected in every source directory
pub const TYPES_FILE: &str = "types.json";

/// Errors while reading sources or writing the aggregate
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: top-level value must be an object, found {found}")]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render aggregate: {0}")]
    Render(#[from] serde_json::Error),
}

/// What one source contributed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceSummary {
    pub id: String,
    pub path: String,

    /// SHA-256 of the raw file bytes
    pub digest: String,

    /// Number of top-level definitions
    pub keys: usize,
}

/// Result of folding all sources
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub merged: Merged,
    pub sources: Vec<SourceSummary>,
}

impl Aggregate {
    pub fn types(&self) -> &TypeMap {
        &self.merged.types
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.merged.collisions
    }
}

/// `<root>/<id>/types.json`
pub fn source_path(root: &Path, id: &str) -> PathBuf {
    root.join(id).join(TYPES_FILE)
}

/// Read and parse one source
pub fn load_source(root: &Path, id: &str) -> Result<(Layer, SourceSummary), AggregateError> {
    let path = source_path(root, id);

    let bytes = fs::read(&path).map_err(|source| AggregateError::Io {
        path: path.clone(),
        source,
    })?;
    let digest = hex::encode(Sha256::digest(&bytes));

    let value: Value = serde_json::from_slice(&bytes).map_err(|source| AggregateError::Parse {
        path: path.clone(),
        source,
    })?;

    let types = match value {
        Value::Object(map) => map,
        other => {
            return Err(AggregateError::NotAnObject {
                path,
                found: json_kind(&other),
            })
        }
    };

    debug!("Loaded {} definitions from {}", types.len(), path.display());

    let summary = SourceSummary {
        id: id.to_string(),
        path: path.to_string_lossy().to_string(),
        digest,
        keys: types.len(),
    };

    Ok((Layer::new(id, types), summary))
}

/// Load every configured source in order and fold them.
///
/// Fails on the first source that cannot be read or parsed.
pub fn aggregate(config: &AggregatorConfig) -> Result<Aggregate, AggregateError> {
    let mut layers = Vec::with_capacity(config.sources.len());
    let mut sources = Vec::with_capacity(config.sources.len());

    for id in &config.sources {
        let (layer, summary) = load_source(&config.root, id)?;
        layers.push(layer);
        sources.push(summary);
    }

    let merged = merge_layers(layers);

    for collision in &merged.collisions {
        if collision.identical {
            debug!("{}", collision.describe());
        } else {
            warn!("{}", collision.describe());
        }
    }

    info!(
        "Aggregated {} type definitions from {} sources",
        merged.len(),
        sources.len()
    );

    Ok(Aggregate { merged, sources })
}

/// Render with 2-space indentation and no trailing newline.
///
/// Numbers and key order follow `JSON.stringify`: whole-valued floats print
/// as integers and array-index keys come first in ascending order, at every
/// nesting level.
pub fn render(types: &TypeMap) -> Result<String, AggregateError> {
    Ok(serde_json::to_string_pretty(&js_order(types))?)
}

/// 2^63, the first float outside the i64 range
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn js_normalize(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= -I64_BOUND && f < I64_BOUND => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(js_normalize).collect()),
        Value::Object(map) => Value::Object(js_order(map)),
        _ => value.clone(),
    }
}

fn js_order(map: &TypeMap) -> TypeMap {
    let mut indices: Vec<(u32, &str)> = map
        .keys()
        .filter_map(|k| array_index(k).map(|i| (i, k.as_str())))
        .collect();
    indices.sort_unstable_by_key(|(i, _)| *i);

    let mut ordered = TypeMap::new();
    for (_, key) in indices {
        ordered.insert(key.to_string(), js_normalize(&map[key]));
    }
    for (key, value) in map {
        if array_index(key).is_none() {
            ordered.insert(key.clone(), js_normalize(value));
        }
    }
    ordered
}

/// Canonical array index: decimal u32 below 2^32 - 1, no leading zeros
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|&i| i != u32::MAX)
}

/// Write atomically (write-then-rename), replacing any existing file
pub fn write_output(path: &Path, contents: &str) -> Result<(), AggregateError> {
    let write_err = |source| AggregateError::Write {
        path: path.to_path_buf(),
        source,
    };

    let temp_path = path.with_extension("json.tmp");
    if let Err(e) = fs::write(&temp_path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(e));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(e));
    }

    info!("Wrote {}", path.display());
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
