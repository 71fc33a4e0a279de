use crate::span::Span;
use thiserror::Error;

/// Failure of a transform call.
///
/// There is exactly one way rendering can fail: the tree contains a node
/// kind with no rendering rule. The whole transform is aborted; no partial
/// output is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranspileError {
    #[error("Unsupported syntax: {kind} at {span}")]
    UnsupportedSyntax { kind: String, span: Span },
}

impl TranspileError {
    /// The ESTree type name of the offending node.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::UnsupportedSyntax { kind, .. } => kind,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::UnsupportedSyntax { span, .. } => *span,
        }
    }
}

/// Failure to build a [`Program`](crate::Program) from ESTree JSON.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid ESTree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} node is missing required field `{field}`")]
    MissingField { kind: String, field: &'static str },

    #[error("{kind} node has an invalid `{field}`: expected {expected}")]
    InvalidField {
        kind: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unsupported binding pattern: {kind} at {span}")]
    UnsupportedPattern { kind: String, span: Span },
}
