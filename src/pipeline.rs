//! Pipeline orchestration
//!
//! `run`: aggregate all sources, write `types.json`, run the converter.
//! `check`: aggregate only and report, nothing is written.

use std::path::PathBuf;

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use typedef_merge::Collision;

use crate::aggregate::{self, AggregateError, SourceSummary};
use crate::config::{AggregatorConfig, ConfigError};
use crate::convert::{ConvertError, Converter};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl PipelineError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Convert(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub output: PathBuf,

    /// SHA-256 of the written aggregate
    pub output_digest: String,

    pub total_keys: usize,

    /// Converter output, when the converter ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<PathBuf>,
}

/// Aggregate without writing anything
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub sources: Vec<SourceSummary>,
    pub total_keys: usize,
    pub collisions: Vec<Collision>,
}

impl CheckReport {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report
    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Sources: {}", self.sources.len()));
        for source in &self.sources {
            let short = source.digest.get(..12).unwrap_or(&source.digest);
            lines.push(format!(
                "  {:<24} {:>4} keys  {}  ({})",
                source.id, source.keys, short, source.path
            ));
        }
        lines.push(format!("Total keys: {}", self.total_keys));

        if self.collisions.is_empty() {
            lines.push("Collisions: none".to_string());
        } else {
            lines.push(format!("Collisions: {}", self.collisions.len()));
            for collision in &self.collisions {
                lines.push(format!("  {}", collision.describe()));
            }
        }

        lines.join("\n")
    }
}

/// Aggregate, write `types.json`, then run the converter if enabled
pub fn run(config: &AggregatorConfig) -> Result<RunOutcome, PipelineError> {
    let result = aggregate::aggregate(config)?;
    let rendered = aggregate::render(result.types())?;

    let output = config.output_path();
    aggregate::write_output(&output, &rendered)?;

    let mapping = match Converter::from_config(config) {
        Some(converter) => {
            converter.run(&output)?;
            Some(converter.output)
        }
        None => None,
    };

    Ok(RunOutcome {
        output,
        output_digest: hex::encode(Sha256::digest(rendered.as_bytes())),
        total_keys: result.types().len(),
        mapping,
    })
}

/// Aggregate and report without writing
pub fn check(config: &AggregatorConfig) -> Result<CheckReport, PipelineError> {
    let result = aggregate::aggregate(config)?;

    Ok(CheckReport {
        total_keys: result.types().len(),
        collisions: result.merged.collisions,
        sources: result.sources,
    })
}
