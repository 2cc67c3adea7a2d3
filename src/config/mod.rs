//! Configuration layering
//!
//! The effective configuration is built from three layers, last wins:
//! 1. Built-in defaults (the fixed source list of the runtime)
//! 2. Config file (`aggregate-types.toml`, optional)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;
mod overrides;

pub use defaults::{BuiltinDefaults, DEFAULT_CONFIG_FILE, DEFAULT_SOURCES};
pub use effective::{
    AggregatorConfig, ConfigError, ConfigOrigin, ConfigSource, ConverterConfig, EffectiveConfig,
};
pub use merge::{deep_merge, merge_layers};
pub use overrides::ConfigOverrides;
