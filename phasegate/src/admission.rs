//! Admission checks: the phase gatekeeper and the phase-file guard.
//!
//! Both checks are vetoes: each produces a [`Verdict`] and never errors, so
//! a caller can never mistake a fault for an allow. They are independent
//! and may run in either order.

use std::path::Path;

use tracing::debug;

use crate::core::operation::{Operation, Verdict};
use crate::core::phase::PhaseSource;
use crate::core::policy;
use crate::io::phase_store::PhaseReader;

/// Phase-gated admission check over a read-only phase handle.
///
/// The handle is injected at construction so tests can evaluate against
/// arbitrary phases without touching the file system (a bare `Phase` is
/// itself a `PhaseSource`).
pub struct Gatekeeper<S: PhaseSource> {
    source: S,
}

impl<S: PhaseSource> Gatekeeper<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn evaluate(&self, op: &Operation) -> Verdict {
        let phase = self.source.current();
        let verdict = policy::evaluate(phase, op);
        debug!(
            phase = phase.as_str(),
            path = %op.path,
            kind = op.kind.as_str(),
            allow = verdict.allow,
            "gatekeeper verdict"
        );
        verdict
    }
}

impl Gatekeeper<PhaseReader> {
    /// Gatekeeper reading the phase from `<root>/.claude/current_phase`.
    pub fn for_root(root: &Path) -> Self {
        Self::new(PhaseReader::new(root))
    }
}

/// Standing veto over mutations of the phase store's backing file.
pub struct PhaseFileGuard;

impl PhaseFileGuard {
    pub fn guard(&self, op: &Operation) -> Verdict {
        let verdict = policy::protect(op);
        debug!(path = %op.path, allow = verdict.allow, "phase-file guard verdict");
        verdict
    }
}

/// Combine verdicts from chained checks: the first deny wins.
///
/// This is the seam external collaborators (content scanners, filename
/// linters) plug into; they produce verdicts of the same shape and carry
/// no ordering dependency.
pub fn combine(verdicts: impl IntoIterator<Item = Verdict>) -> Verdict {
    for verdict in verdicts {
        if verdict.is_deny() {
            return verdict;
        }
    }
    Verdict::allowed("all checks passed")
}
