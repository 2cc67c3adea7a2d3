//! Effective configuration with provenance
//!
//! Captures the merged configuration plus where each layer came from.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// External conversion step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConverterConfig {
    /// Run the converter after writing the aggregate
    pub enabled: bool,

    /// Program to execute
    pub program: String,

    /// Arguments placed before the aggregate path
    #[serde(default)]
    pub args: Vec<String>,

    /// File receiving the converter's stdout, relative to root
    pub output: PathBuf,
}

/// Resolved aggregator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatorConfig {
    /// Common root of all source directories
    pub root: PathBuf,

    /// Source identifiers in merge order; each maps to `<root>/<id>/types.json`
    pub sources: Vec<String>,

    /// Aggregate output, relative to root
    pub output: PathBuf,

    pub converter: ConverterConfig,
}

impl AggregatorConfig {
    /// Path of the aggregate `types.json`
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    /// Path of the converter output
    pub fn mapping_path(&self) -> PathBuf {
        self.root.join(&self.converter.output)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("sources must not be empty".to_string()));
        }

        for id in &self.sources {
            if id.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "sources must not contain empty identifiers".to_string(),
                ));
            }
            if Path::new(id).is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' must be relative to root",
                    id
                )));
            }
        }

        if self.converter.enabled && self.converter.program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "converter.program must be set when the converter is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors while building the effective configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Effective configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub config: AggregatorConfig,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build the effective config.
    ///
    /// A missing `config_path` is skipped unless `required` is set, which is
    /// the case when the path was given explicitly on the command line.
    pub fn build(
        config_path: Option<&Path>,
        required: bool,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        if let Some(path) = config_path {
            if path.exists() {
                let (value, digest) = Self::load_toml_file(path)?;
                layers.push(value);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::File,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            } else if required {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let config: AggregatorConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;

        Ok(Self { config, sources })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: format!("invalid UTF-8: {}", e),
        })?;

        let table: toml::Table = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok((Self::toml_to_json(toml::Value::Table(table)), digest))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Self::toml_to_json).collect())
            }
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
