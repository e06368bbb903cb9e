//! Durable storage for the current phase (`.claude/current_phase`).
//!
//! Two handle types split the access rights: [`PhaseReader`] can only read
//! and is what admission checks receive; [`PhaseStore`] adds the privileged
//! write and is constructed only by the transition mechanism. Serializing
//! concurrent writers is the transition mechanism's responsibility.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

use crate::core::phase::{Phase, PhaseSource};

/// Location of the phase backing file inside a project root.
pub fn phase_file_path(root: &Path) -> PathBuf {
    root.join(".claude").join("current_phase")
}

/// Read-only handle on the phase backing file.
#[derive(Debug, Clone)]
pub struct PhaseReader {
    path: PathBuf,
}

impl PhaseReader {
    pub fn new(root: &Path) -> Self {
        Self {
            path: phase_file_path(root),
        }
    }

    /// Read the persisted phase. Any failure (missing file, I/O error,
    /// unparseable content) degrades to [`Phase::Unknown`] so the caller
    /// can still issue a deny verdict.
    pub fn read(&self) -> Phase {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let phase = Phase::from_persisted(&contents);
                debug!(path = %self.path.display(), phase = phase.as_str(), "phase read");
                phase
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "phase file unreadable");
                Phase::Unknown
            }
        }
    }
}

impl PhaseSource for PhaseReader {
    fn current(&self) -> Phase {
        self.read()
    }
}

/// Read-write handle on the phase backing file.
#[derive(Debug, Clone)]
pub struct PhaseStore {
    path: PathBuf,
}

impl PhaseStore {
    pub fn new(root: &Path) -> Self {
        Self {
            path: phase_file_path(root),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Phase {
        PhaseReader {
            path: self.path.clone(),
        }
        .read()
    }

    /// Atomically overwrite the backing value (temp file + rename), so
    /// concurrent readers never observe a partial write.
    pub fn write(&self, phase: Phase) -> Result<()> {
        if phase == Phase::Unknown {
            return Err(anyhow!("refusing to persist the unknown phase sentinel"));
        }
        debug!(path = %self.path.display(), phase = phase.as_str(), "writing phase");
        let parent = self
            .path
            .parent()
            .with_context(|| format!("phase path missing parent {}", self.path.display()))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, format!("{}\n", phase.as_str()))
            .with_context(|| format!("write temp phase file {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replace phase file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file_degrades_to_unknown() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert_eq!(PhaseReader::new(temp.path()).read(), Phase::Unknown);
    }

    #[test]
    fn read_garbage_degrades_to_unknown() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = PhaseStore::new(temp.path());
        fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        fs::write(store.path(), "definitely-not-a-phase").expect("write");
        assert_eq!(store.read(), Phase::Unknown);
    }

    #[test]
    fn write_then_read_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = PhaseStore::new(temp.path());
        store.write(Phase::Testdesign).expect("write");
        assert_eq!(store.read(), Phase::Testdesign);
        assert_eq!(PhaseReader::new(temp.path()).read(), Phase::Testdesign);
    }

    #[test]
    fn write_leaves_no_temp_residue() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = PhaseStore::new(temp.path());
        store.write(Phase::Explore).expect("write");
        let entries: Vec<_> = fs::read_dir(store.path().parent().expect("parent"))
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec!["current_phase"]);
    }

    #[test]
    fn write_rejects_unknown_sentinel() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = PhaseStore::new(temp.path())
            .write(Phase::Unknown)
            .unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn stored_value_is_a_plain_text_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = PhaseStore::new(temp.path());
        store.write(Phase::Sandbox).expect("write");
        let contents = fs::read_to_string(store.path()).expect("read");
        assert_eq!(contents, "sandbox\n");
    }
}
