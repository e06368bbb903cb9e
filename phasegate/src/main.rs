//! Phase-gated file-operation gatekeeper.
//!
//! Reads one operation request per invocation, evaluates it against the
//! project's current workflow phase (`.claude/current_phase`), and reports
//! an allow/deny verdict. Also ships the deployment and phase-transition
//! commands that install and drive the system.

use std::io::stdin;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use phasegate::admission::{Gatekeeper, PhaseFileGuard};
use phasegate::core::operation::Verdict;
use phasegate::exit_codes;
use phasegate::io::deploy::{DeployOptions, deploy};
use phasegate::io::request::read_operation;
use phasegate::logging;
use phasegate::transition::{set_phase, show_phase};

#[derive(Parser)]
#[command(
    name = "phasegate",
    version,
    about = "Phase-gated file-operation gatekeeper"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an operation request (JSON on stdin) against the current phase.
    Check {
        /// Project root holding `.claude/current_phase`.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Deny any mutation of the phase state file, regardless of phase.
    Protect,
    /// Show or set the current workflow phase.
    Phase {
        #[command(subcommand)]
        command: PhaseCommand,
    },
    /// Install the gatekeeper (hooks, commands, phase state) into a project.
    Deploy {
        /// Target project directory.
        #[arg(long)]
        target: PathBuf,
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum PhaseCommand {
    /// Print the current phase name (`unknown` when unreadable).
    Show {
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Switch to one of: explore, plan, testdesign, code, sandbox.
    Set {
        name: String,
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check { root } => cmd_check(&root),
        Command::Protect => cmd_protect(),
        Command::Phase { command } => cmd_phase(command),
        Command::Deploy { target, force } => cmd_deploy(&target, force),
    }
}

fn cmd_check(root: &std::path::Path) -> Result<i32> {
    let op = read_operation(stdin().lock())?;
    let verdict = Gatekeeper::for_root(root).evaluate(&op);
    print_verdict(&verdict)
}

fn cmd_protect() -> Result<i32> {
    let op = read_operation(stdin().lock())?;
    let verdict = PhaseFileGuard.guard(&op);
    print_verdict(&verdict)
}

fn cmd_phase(command: PhaseCommand) -> Result<i32> {
    match command {
        PhaseCommand::Show { root } => {
            println!("{}", show_phase(&root).as_str());
            Ok(exit_codes::OK)
        }
        PhaseCommand::Set { name, root } => {
            let (previous, next) = set_phase(&root, &name)?;
            println!("{} -> {}", previous.as_str(), next.as_str());
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_deploy(target: &std::path::Path, force: bool) -> Result<i32> {
    let report = deploy(
        target,
        &DeployOptions {
            force,
            hook_binary: None,
        },
    )?;
    for file in &report.files {
        println!("{} {}", file.action.as_str(), file.path.display());
    }
    Ok(exit_codes::OK)
}

fn print_verdict(verdict: &Verdict) -> Result<i32> {
    println!("{}", serde_json::to_string(verdict)?);
    Ok(if verdict.allow {
        exit_codes::OK
    } else {
        exit_codes::DENY
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check_with_default_root() {
        let cli = Cli::parse_from(["phasegate", "check"]);
        assert!(matches!(
            cli.command,
            Command::Check { root } if root == PathBuf::from(".")
        ));
    }

    #[test]
    fn parse_deploy_force() {
        let cli = Cli::parse_from(["phasegate", "deploy", "--target", "/proj", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Deploy { force: true, .. }
        ));
    }

    #[test]
    fn parse_phase_set() {
        let cli = Cli::parse_from(["phasegate", "phase", "set", "code"]);
        match cli.command {
            Command::Phase {
                command: PhaseCommand::Set { name, root },
            } => {
                assert_eq!(name, "code");
                assert_eq!(root, PathBuf::from("."));
            }
            _ => panic!("expected phase set"),
        }
    }
}
