//! Phase admission rules and the phase-file protection rule.
//!
//! The policy table is a fixed, exhaustive mapping from phase to admission
//! predicate, checked by the compiler: adding a phase without a rule is a
//! compile error, and the `Unknown` arm routes to deny (fail-closed).
//! Evaluation never errors; every input terminates in a [`Verdict`].

use std::collections::BTreeSet;
use std::path::Path;

use crate::core::operation::{Operation, Verdict};
use crate::core::phase::Phase;
use crate::core::tags::{Tag, classify};

/// Evaluate `op` against the admission rule for `phase`.
///
/// An empty path is admitted unconditionally: there is no file-system
/// effect to police.
pub fn evaluate(phase: Phase, op: &Operation) -> Verdict {
    if op.path.is_empty() {
        return Verdict::allowed("no target path; nothing to check");
    }
    let tags = classify(Path::new(&op.path));
    match phase {
        Phase::Explore => explore_rule(&tags),
        Phase::Plan => plan_rule(&tags),
        Phase::Testdesign => testdesign_rule(&tags),
        Phase::Code => Verdict::allowed("code phase allows all paths"),
        Phase::Sandbox => sandbox_rule(&tags),
        Phase::Unknown => Verdict::denied(
            "unrecognized phase: valid phases are explore, plan, testdesign, code, sandbox \
             (set one with the phase transition command)",
        ),
    }
}

/// Standing veto over the phase store's backing file.
///
/// Applies to every mutation kind in every phase, including `code`. The
/// phase value changes only through the transition mechanism; the generic
/// operation surface never writes it.
pub fn protect(op: &Operation) -> Verdict {
    let tags = classify(Path::new(&op.path));
    if tags.contains(&Tag::PhaseStateFile) {
        Verdict::denied("protected resource; use the phase-transition mechanism")
    } else {
        Verdict::allowed("path is not the phase state file")
    }
}

fn explore_rule(tags: &BTreeSet<Tag>) -> Verdict {
    if tags.contains(&Tag::ExploreAllowed) {
        Verdict::allowed("path is on the explore allow-list (TODO, QUALITY, DESIGN, CLAUDE)")
    } else {
        Verdict::denied(
            "explore phase only allows TODO, QUALITY, DESIGN, and CLAUDE files; \
             record findings there, or switch to the plan phase for other markdown",
        )
    }
}

fn plan_rule(tags: &BTreeSet<Tag>) -> Verdict {
    if tags.contains(&Tag::Markdown) {
        Verdict::allowed("markdown file allowed in plan phase")
    } else {
        Verdict::denied(
            "plan phase only allows markdown files; draft in a .md document, \
             or switch to the testdesign or code phase",
        )
    }
}

fn testdesign_rule(tags: &BTreeSet<Tag>) -> Verdict {
    if tags.contains(&Tag::Markdown) {
        Verdict::allowed("markdown file allowed in testdesign phase")
    } else if tags.contains(&Tag::TestDir) {
        Verdict::allowed("tests directory allowed in testdesign phase")
    } else if tags.contains(&Tag::TempDir) {
        Verdict::allowed("temp directory allowed in testdesign phase")
    } else {
        Verdict::denied(
            "testdesign phase only allows markdown, tests/, and temp/ paths; \
             move to temp/<name> or a tests/ directory, or switch to the code phase",
        )
    }
}

fn sandbox_rule(tags: &BTreeSet<Tag>) -> Verdict {
    if tags.contains(&Tag::TempDir) {
        Verdict::allowed("temp directory allowed in sandbox phase")
    } else {
        Verdict::denied(
            "sandbox phase only allows paths under a temp/ directory; move to temp/<name>, \
             or switch to the code phase for main project files",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operation::OpKind;
    use crate::core::phase::RECOGNIZED;
    use crate::test_support::modify;

    #[test]
    fn evaluate_is_deterministic() {
        for phase in RECOGNIZED {
            let op = modify("src/app.py");
            assert_eq!(evaluate(phase, &op), evaluate(phase, &op));
        }
    }

    #[test]
    fn unknown_phase_denies_everything() {
        for path in ["DESIGN.md", "plan.md", "temp/x.py", "src/app.py"] {
            let verdict = evaluate(Phase::Unknown, &modify(path));
            assert!(verdict.is_deny(), "expected deny for {path}");
            assert!(verdict.reason.contains("unrecognized phase"));
        }
    }

    #[test]
    fn empty_path_is_admitted_in_every_phase() {
        for phase in RECOGNIZED {
            assert!(evaluate(phase, &modify("")).allow);
        }
        // Fail-closed does not apply: there is nothing to police.
        assert!(evaluate(Phase::Unknown, &modify("")).allow);
    }

    #[test]
    fn explore_admits_allow_list_and_denies_the_rest() {
        assert!(evaluate(Phase::Explore, &modify("DESIGN.md")).allow);
        assert!(evaluate(Phase::Explore, &modify("todo.md")).allow);

        let verdict = evaluate(Phase::Explore, &modify("notes.md"));
        assert!(verdict.is_deny());
        assert!(verdict.reason.contains("TODO"));
        assert!(verdict.reason.contains("CLAUDE"));
    }

    #[test]
    fn plan_admits_markdown_only() {
        assert!(evaluate(Phase::Plan, &modify("plan.md")).allow);

        let verdict = evaluate(Phase::Plan, &modify("service.py"));
        assert!(verdict.is_deny());
        assert!(verdict.reason.contains("plan phase only allows markdown files"));
    }

    #[test]
    fn testdesign_admits_markdown_tests_and_temp() {
        assert!(evaluate(Phase::Testdesign, &modify("notes.md")).allow);
        assert!(evaluate(Phase::Testdesign, &modify("src/tests/test_app.py")).allow);
        assert!(evaluate(Phase::Testdesign, &modify("temp/scratch.py")).allow);

        let verdict = evaluate(Phase::Testdesign, &modify("src/app.py"));
        assert!(verdict.is_deny());
        assert!(verdict.reason.contains("temp/<name>"));
    }

    #[test]
    fn code_admits_any_non_protected_path() {
        for path in ["src/app.py", "Cargo.toml", "README.md", "temp/x"] {
            assert!(evaluate(Phase::Code, &modify(path)).allow);
        }
    }

    #[test]
    fn sandbox_confines_to_temp_even_for_markdown() {
        assert!(evaluate(Phase::Sandbox, &modify("temp/build/out.bin")).allow);

        let verdict = evaluate(Phase::Sandbox, &modify("README.md"));
        assert!(verdict.is_deny());
        assert!(verdict.reason.contains("temp/"));
    }

    #[test]
    fn protect_denies_phase_file_for_every_kind() {
        for kind in [OpKind::Create, OpKind::Modify, OpKind::Delete] {
            let verdict = protect(&Operation::new(".claude/current_phase", kind));
            assert!(verdict.is_deny());
            assert!(verdict.reason.contains("phase-transition mechanism"));
        }
    }

    #[test]
    fn protect_ignores_other_paths() {
        assert!(protect(&modify(".claude/settings.local.json")).allow);
        assert!(protect(&modify("current_phase")).allow);
    }
}
