//! Test-only helpers for building operations and throwaway projects.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::operation::{OpKind, Operation};

/// Build an operation with the given path and kind.
pub fn op(path: &str, kind: OpKind) -> Operation {
    Operation::new(path, kind)
}

/// Build a `modify` operation, the common case in admission tests.
pub fn modify(path: &str) -> Operation {
    op(path, OpKind::Modify)
}

/// A throwaway project directory with a `.claude/` dir.
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        fs::create_dir(temp.path().join(".claude")).context("create .claude")?;
        Ok(Self { temp })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write a raw value to the phase backing file, valid or not.
    pub fn set_phase(&self, raw: &str) {
        fs::write(self.root().join(".claude").join("current_phase"), raw)
            .expect("write phase file");
    }
}
