//! Stable exit codes for gatekeeper CLI commands.

/// Operation admitted, or command succeeded.
pub const OK: i32 = 0;
/// Malformed request, invalid phase name, or failed deployment.
pub const INVALID: i32 = 1;
/// Operation vetoed; the verdict's reason says why.
pub const DENY: i32 = 2;
