//! Operation requests and admission verdicts.
//!
//! These types define the stable contract between the invoking frame and
//! the admission checks. An operation is constructed per invocation and
//! consumed entirely within one check; the verdict is the only output.

use serde::{Deserialize, Serialize};

/// Kind of file mutation the invoking frame intends to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Create,
    Modify,
    Delete,
}

impl OpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Create => "create",
            OpKind::Modify => "modify",
            OpKind::Delete => "delete",
        }
    }
}

/// A proposed file mutation, as submitted by the invoking frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Target path, as the literal string the frame supplied.
    pub path: String,
    pub kind: OpKind,
    /// Content the frame intends to write, when it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Operation {
    pub fn new(path: impl Into<String>, kind: OpKind) -> Self {
        Self {
            path: path.into(),
            kind,
            payload: None,
        }
    }
}

/// Admit/deny outcome of one admission check.
///
/// The reason names the satisfied or unmet condition so the caller can
/// self-correct; it is part of the contract, not display sugar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub allow: bool,
    pub reason: String,
}

impl Verdict {
    pub fn allowed(reason: impl Into<String>) -> Self {
        Self {
            allow: true,
            reason: reason.into(),
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allow: false,
            reason: reason.into(),
        }
    }

    pub fn is_deny(&self) -> bool {
        !self.allow
    }
}
