//! Hook registration merging for `.claude/settings.local.json`.
//!
//! The settings document belongs to the project, not to us: merging must
//! preserve every unrelated top-level key, every foreign `PreToolUse`
//! entry, and any extra commands a user added under our matcher.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value, json};
use tracing::debug;

/// Tool-name matcher the gatekeeper hooks register under.
pub const HOOK_MATCHER: &str = "Edit|Write|MultiEdit";

/// Merge `commands` into the document's `hooks.PreToolUse` section.
///
/// Creates missing intermediate structure, appends only commands not
/// already registered under [`HOOK_MATCHER`], and leaves everything else
/// untouched. Idempotent.
pub fn merge_hook_commands(doc: &mut Value, commands: &[String]) -> Result<()> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| anyhow!("settings document root must be a JSON object"))?;

    let hooks = root
        .entry("hooks")
        .or_insert_with(|| Value::Object(Map::new()));
    let hooks = hooks
        .as_object_mut()
        .ok_or_else(|| anyhow!("settings 'hooks' section must be a JSON object"))?;

    let pre_tool_use = hooks
        .entry("PreToolUse")
        .or_insert_with(|| Value::Array(Vec::new()));
    let pre_tool_use = pre_tool_use
        .as_array_mut()
        .ok_or_else(|| anyhow!("settings 'hooks.PreToolUse' section must be a JSON array"))?;

    let index = match pre_tool_use
        .iter()
        .position(|entry| entry.get("matcher").and_then(Value::as_str) == Some(HOOK_MATCHER))
    {
        Some(index) => index,
        None => {
            pre_tool_use.push(json!({ "matcher": HOOK_MATCHER, "hooks": [] }));
            pre_tool_use.len() - 1
        }
    };

    let registered = pre_tool_use[index]
        .get_mut("hooks")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| anyhow!("matcher entry 'hooks' must be a JSON array"))?;

    for command in commands {
        let already = registered
            .iter()
            .any(|hook| hook.get("command").and_then(Value::as_str) == Some(command.as_str()));
        if !already {
            registered.push(json!({ "type": "command", "command": command }));
        }
    }

    Ok(())
}

/// Load `path` (or an empty document), merge hook registrations, write back.
pub fn update_settings_file(path: &Path, commands: &[String]) -> Result<()> {
    let mut doc = if path.exists() {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))?
    } else {
        Value::Object(Map::new())
    };

    merge_hook_commands(&mut doc, commands)?;

    let mut buf = serde_json::to_string_pretty(&doc).context("serialize settings")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), commands = commands.len(), "settings updated");
    Ok(())
}
