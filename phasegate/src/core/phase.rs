//! Workflow phase values and the read-only phase handle.
//!
//! A project is always in exactly one phase. The persisted value is read on
//! every admission check, so parsing is lenient and total: anything that is
//! not one of the five recognized names maps to [`Phase::Unknown`], which
//! every policy rule denies.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// The active workflow phase gating file-operation admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Explore,
    Plan,
    Testdesign,
    Code,
    Sandbox,
    /// Sentinel for an unreadable or unrecognized persisted value.
    Unknown,
}

/// The five phases a project may legitimately be switched to.
pub const RECOGNIZED: [Phase; 5] = [
    Phase::Explore,
    Phase::Plan,
    Phase::Testdesign,
    Phase::Code,
    Phase::Sandbox,
];

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Explore => "explore",
            Phase::Plan => "plan",
            Phase::Testdesign => "testdesign",
            Phase::Code => "code",
            Phase::Sandbox => "sandbox",
            Phase::Unknown => "unknown",
        }
    }

    /// Lenient parse for persisted values. Never fails: trims whitespace,
    /// ignores case, and maps anything unrecognized to [`Phase::Unknown`].
    pub fn from_persisted(raw: &str) -> Phase {
        match raw.trim().to_ascii_lowercase().as_str() {
            "explore" => Phase::Explore,
            "plan" => Phase::Plan,
            "testdesign" => Phase::Testdesign,
            "code" => Phase::Code,
            "sandbox" => Phase::Sandbox,
            _ => Phase::Unknown,
        }
    }

    /// Strict parse for the transition mechanism. Rejects everything except
    /// the five recognized names, including `unknown`.
    pub fn parse_strict(raw: &str) -> Result<Phase> {
        let phase = Phase::from_persisted(raw);
        if phase == Phase::Unknown {
            return Err(anyhow!(
                "unrecognized phase '{}': valid phases are explore, plan, testdesign, code, sandbox",
                raw.trim()
            ));
        }
        Ok(phase)
    }
}

/// Read-only handle supplying the current phase to admission checks.
///
/// The gatekeeper receives a `PhaseSource`, never the read-write store, so
/// the privileged-writer boundary is enforced by the type system rather
/// than by convention.
pub trait PhaseSource {
    fn current(&self) -> Phase;
}

impl PhaseSource for Phase {
    fn current(&self) -> Phase {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_persisted_trims_and_lowercases() {
        assert_eq!(Phase::from_persisted("explore\n"), Phase::Explore);
        assert_eq!(Phase::from_persisted("  CODE  "), Phase::Code);
        assert_eq!(Phase::from_persisted("TestDesign"), Phase::Testdesign);
    }

    #[test]
    fn from_persisted_maps_garbage_to_unknown() {
        assert_eq!(Phase::from_persisted(""), Phase::Unknown);
        assert_eq!(Phase::from_persisted("deploy"), Phase::Unknown);
        assert_eq!(Phase::from_persisted("explore plan"), Phase::Unknown);
    }

    #[test]
    fn parse_strict_accepts_recognized_names_only() {
        for phase in RECOGNIZED {
            assert_eq!(Phase::parse_strict(phase.as_str()).expect("parse"), phase);
        }
        assert!(Phase::parse_strict("unknown").is_err());
        let err = Phase::parse_strict("shipit").unwrap_err();
        assert!(err.to_string().contains("valid phases are"));
    }

    #[test]
    fn phase_is_its_own_source() {
        assert_eq!(Phase::Sandbox.current(), Phase::Sandbox);
    }
}
