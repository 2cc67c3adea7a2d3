//! Test fixtures
//!
//! `runtime/` mirrors the default source layout: one `types.json` per
//! module plus `expected_types.json`, the aggregate in default order.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use types_aggregator::config::DEFAULT_SOURCES;

/// Path to the runtime fixture tree
pub fn runtime_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/runtime")
}

/// Golden aggregate for the runtime fixture
pub fn expected_types() -> String {
    fs::read_to_string(runtime_root().join("expected_types.json"))
        .expect("Failed to read expected_types.json")
}

/// Command for the built binary
pub fn aggregate_types() -> Command {
    Command::new(env!("CARGO_BIN_EXE_aggregate-types"))
}

/// Run the binary in `cwd` with `args`
pub fn run_in(cwd: &Path, args: &[&str]) -> Output {
    aggregate_types()
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("Failed to run aggregate-types")
}

/// Write `<root>/<id>/types.json`
pub fn write_source(root: &Path, id: &str, contents: &str) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).expect("Failed to create source dir");
    fs::write(dir.join("types.json"), contents).expect("Failed to write source");
}

/// Lay out the runtime fixture under `root` at the default source paths
pub fn copy_runtime(root: &Path) {
    for id in DEFAULT_SOURCES {
        let contents = fs::read_to_string(runtime_root().join(id).join("types.json"))
            .expect("Failed to read fixture source");
        write_source(root, id, &contents);
    }
}
