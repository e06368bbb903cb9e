//! One-time deployment of the gatekeeper into a target project.
//!
//! Deployment is not transactional: each artifact is placed independently
//! and its outcome recorded, so a partial failure can be completed by
//! re-running (with `--force` where an overwrite is wanted).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use minijinja::{Environment, context};
use tracing::info;

use crate::core::phase::Phase;
use crate::io::phase_store::PhaseStore;
use crate::io::settings::update_settings_file;

const HOOK_BINARY_NAME: &str = "phasegate";

const COMMAND_TEMPLATES: [(&str, &str); 5] = [
    (
        "phase_01_explore.md",
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/commands/phase_01_explore.md"
        )),
    ),
    (
        "phase_02_plan.md",
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/commands/phase_02_plan.md"
        )),
    ),
    (
        "phase_03_testdesign.md",
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/commands/phase_03_testdesign.md"
        )),
    ),
    (
        "phase_04_code.md",
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/commands/phase_04_code.md"
        )),
    ),
    (
        "phase_05_sandbox.md",
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/commands/phase_05_sandbox.md"
        )),
    ),
];

/// All canonical paths under `<target>/.claude/` touched by deployment.
#[derive(Debug, Clone)]
pub struct DeployPaths {
    pub root: PathBuf,
    pub claude_dir: PathBuf,
    pub commands_dir: PathBuf,
    pub hooks_dir: PathBuf,
    pub hook_binary_path: PathBuf,
    pub settings_path: PathBuf,
    pub phase_path: PathBuf,
}

impl DeployPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let claude_dir = root.join(".claude");
        Self {
            commands_dir: claude_dir.join("commands"),
            hooks_dir: claude_dir.join("hooks"),
            hook_binary_path: claude_dir.join("hooks").join(HOOK_BINARY_NAME),
            settings_path: claude_dir.join("settings.local.json"),
            phase_path: claude_dir.join("current_phase"),
            claude_dir,
            root,
        }
    }
}

/// Options for [`deploy`].
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Overwrite artifacts that already exist in the target.
    pub force: bool,
    /// Source of the hook binary to install. Defaults to the running
    /// executable; injectable so tests can deploy without a built binary.
    pub hook_binary: Option<PathBuf>,
}

/// What happened to one deployed artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Written,
    Overwritten,
    Skipped,
    Merged,
}

impl FileAction {
    pub fn as_str(self) -> &'static str {
        match self {
            FileAction::Written => "wrote",
            FileAction::Overwritten => "overwrote",
            FileAction::Skipped => "skipped",
            FileAction::Merged => "merged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedFile {
    pub path: PathBuf,
    pub action: FileAction,
}

/// Per-artifact outcomes of one deployment run.
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    pub files: Vec<DeployedFile>,
}

impl DeployReport {
    fn record(&mut self, path: &Path, action: FileAction) {
        info!(path = %path.display(), action = action.as_str(), "deploy artifact");
        self.files.push(DeployedFile {
            path: path.to_path_buf(),
            action,
        });
    }
}

/// Deploy hook binary, command templates, settings registration, and the
/// initial phase value into `target`.
pub fn deploy(target: &Path, options: &DeployOptions) -> Result<DeployReport> {
    validate_target(target)?;
    let root = fs::canonicalize(target)
        .with_context(|| format!("resolve target directory {}", target.display()))?;
    let paths = DeployPaths::new(&root);
    info!(root = %paths.root.display(), force = options.force, "deploying gatekeeper");

    create_dir(&paths.claude_dir)?;
    create_dir(&paths.commands_dir)?;
    create_dir(&paths.hooks_dir)?;

    let mut report = DeployReport::default();

    let hook_source = match &options.hook_binary {
        Some(path) => path.clone(),
        None => env::current_exe().context("resolve gatekeeper executable")?,
    };
    let action = copy_artifact(&hook_source, &paths.hook_binary_path, options.force)?;
    report.record(&paths.hook_binary_path, action);

    let engine = command_engine();
    let root_str = paths.root.display().to_string();
    for (name, _) in COMMAND_TEMPLATES {
        let rendered = engine
            .get_template(name)
            .and_then(|template| template.render(context! { root => root_str.as_str() }))
            .with_context(|| format!("render command template {name}"))?;
        let dest = paths.commands_dir.join(name);
        let action = place_artifact(&dest, &rendered, options.force)?;
        report.record(&dest, action);
    }

    update_settings_file(&paths.settings_path, &hook_commands(&paths))?;
    report.record(&paths.settings_path, FileAction::Merged);

    let action = initialize_phase(&paths, options.force)?;
    report.record(&paths.phase_path, action);

    Ok(report)
}

/// Commands the settings document registers for the admission hooks.
pub fn hook_commands(paths: &DeployPaths) -> Vec<String> {
    let bin = paths.hook_binary_path.display();
    let root = paths.root.display();
    vec![
        format!("{bin} check --root {root}"),
        format!("{bin} protect"),
    ]
}

fn validate_target(target: &Path) -> Result<()> {
    if !target.exists() {
        return Err(anyhow!(
            "target directory does not exist: {}",
            target.display()
        ));
    }
    if !target.is_dir() {
        return Err(anyhow!(
            "target path is not a directory: {}",
            target.display()
        ));
    }
    let probe = target.join(".phasegate-write-probe");
    if let Err(err) = fs::write(&probe, b"") {
        return Err(anyhow!(
            "target directory is not writable: {} ({err})",
            target.display()
        ));
    }
    let _ = fs::remove_file(&probe);
    Ok(())
}

fn command_engine() -> Environment<'static> {
    let mut env = Environment::new();
    for (name, source) in COMMAND_TEMPLATES {
        env.add_template(name, source)
            .expect("command template should be valid");
    }
    env
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

fn place_artifact(dest: &Path, contents: &str, force: bool) -> Result<FileAction> {
    let existed = dest.exists();
    if existed && !force {
        return Ok(FileAction::Skipped);
    }
    fs::write(dest, contents).with_context(|| format!("write {}", dest.display()))?;
    Ok(if existed {
        FileAction::Overwritten
    } else {
        FileAction::Written
    })
}

fn copy_artifact(source: &Path, dest: &Path, force: bool) -> Result<FileAction> {
    let existed = dest.exists();
    if existed && !force {
        return Ok(FileAction::Skipped);
    }
    fs::copy(source, dest).with_context(|| {
        format!("copy {} to {}", source.display(), dest.display())
    })?;
    Ok(if existed {
        FileAction::Overwritten
    } else {
        FileAction::Written
    })
}

fn initialize_phase(paths: &DeployPaths, force: bool) -> Result<FileAction> {
    let existed = paths.phase_path.exists();
    if existed && !force {
        return Ok(FileAction::Skipped);
    }
    PhaseStore::new(&paths.root).write(Phase::Explore)?;
    Ok(if existed {
        FileAction::Overwritten
    } else {
        FileAction::Written
    })
}
