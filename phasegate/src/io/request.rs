//! Reading operation requests from the invoking frame.

use std::io::Read;

use anyhow::{Context, Result};

use crate::core::operation::Operation;

/// Read one JSON operation request (`{"path", "kind", "payload"?}`).
///
/// A malformed request is a hard error: the frame treats it as invalid
/// input (exit code 1), never as an allow.
pub fn read_operation(mut reader: impl Read) -> Result<Operation> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .context("read operation request")?;
    let op: Operation = serde_json::from_str(&raw).context("parse operation request")?;
    Ok(op)
}
