//! The privileged phase-transition path.
//!
//! This is the only module that constructs the read-write [`PhaseStore`]
//! handle. It bypasses the admission vetoes by construction: transitions go
//! through here or not at all.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::core::phase::Phase;
use crate::io::phase_store::{PhaseReader, PhaseStore};

/// Validate `name` against the five recognized phases and persist it.
///
/// Returns the previous and new phase.
pub fn set_phase(root: &Path, name: &str) -> Result<(Phase, Phase)> {
    let next = Phase::parse_strict(name)?;
    let store = PhaseStore::new(root);
    let previous = store.read();
    store.write(next)?;
    info!(
        previous = previous.as_str(),
        next = next.as_str(),
        "phase transition"
    );
    Ok((previous, next))
}

/// Read the current phase for display; degrades to `unknown`.
pub fn show_phase(root: &Path) -> Phase {
    PhaseReader::new(root).read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestProject;

    #[test]
    fn set_phase_persists_recognized_name() {
        let project = TestProject::new().expect("project");
        let (previous, next) = set_phase(project.root(), "plan").expect("set");
        assert_eq!(previous, Phase::Unknown);
        assert_eq!(next, Phase::Plan);
        assert_eq!(show_phase(project.root()), Phase::Plan);
    }

    #[test]
    fn set_phase_rejects_unrecognized_name() {
        let project = TestProject::new().expect("project");
        let err = set_phase(project.root(), "ship-it").unwrap_err();
        assert!(err.to_string().contains("valid phases are"));
        assert_eq!(show_phase(project.root()), Phase::Unknown);
    }

    #[test]
    fn show_phase_degrades_to_unknown_on_fresh_project() {
        let project = TestProject::new().expect("project");
        assert_eq!(show_phase(project.root()), Phase::Unknown);
    }
}
