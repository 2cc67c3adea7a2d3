//! Types aggregator
//!
//! Merges the per-module `types.json` files of a runtime into one
//! `types.json` (shallow, last definition wins) and hands the result to an
//! external converter that produces `types_mapping.json`.

pub mod aggregate;
pub mod config;
pub mod convert;
pub mod pipeline;

pub use aggregate::{Aggregate, AggregateError, SourceSummary};
pub use config::{AggregatorConfig, ConfigError, ConfigOverrides, EffectiveConfig};
pub use convert::{ConvertError, Converter};
pub use pipeline::{CheckReport, PipelineError, RunOutcome};
