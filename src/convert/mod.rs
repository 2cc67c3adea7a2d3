//! External conversion step
//!
//! Runs `<program> <args...> <input>` with stdout captured into the
//! mapping file. The child is waited on and its exit status is part of
//! the result. Output goes to a temporary sibling first and only replaces
//! the mapping file when the converter succeeds.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, info};

use crate::config::AggregatorConfig;

/// Errors from the conversion step
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to start converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Converter I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Converter '{program}' failed: {status}")]
    Failed { program: String, status: ExitStatus },
}

impl ConvertError {
    /// Process exit code to report for this error.
    ///
    /// A failed converter passes its own code through; anything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::Failed { status, .. } => status.code().unwrap_or(1),
            _ => 1,
        }
    }
}

/// A configured converter invocation
#[derive(Debug, Clone)]
pub struct Converter {
    pub program: String,
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl Converter {
    /// Build from config, `None` when the step is disabled
    pub fn from_config(config: &AggregatorConfig) -> Option<Self> {
        if !config.converter.enabled {
            return None;
        }
        Some(Self {
            program: config.converter.program.clone(),
            args: config.converter.args.clone(),
            output: config.mapping_path(),
        })
    }

    /// Run against `input` and wait for it to exit
    pub fn run(&self, input: &Path) -> Result<(), ConvertError> {
        let temp_path = self.output.with_extension("json.tmp");
        let io_err = |path: &Path, source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        };

        let stdout = File::create(&temp_path).map_err(|e| io_err(&temp_path, e))?;

        debug!(
            "Running converter: {} {} {}",
            self.program,
            self.args.join(" "),
            input.display()
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::inherit())
            .status();

        let status = match status {
            Ok(status) => status,
            Err(source) => {
                let _ = fs::remove_file(&temp_path);
                return Err(ConvertError::Spawn {
                    program: self.program.clone(),
                    source,
                });
            }
        };

        if !status.success() {
            let _ = fs::remove_file(&temp_path);
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status,
            });
        }

        if let Err(e) = fs::rename(&temp_path, &self.output) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(&self.output, e));
        }

        info!("Wrote {}", self.output.display());
        Ok(())
    }
}
