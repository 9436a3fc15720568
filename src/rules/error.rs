// SPDX-License-Identifier: MIT

//! Typed error handling for cellrule-rs
//!
//! Every fallible surface of the crate reports through one of the enums
//! below. The expression evaluator only ever produces [`ExpressionError`];
//! call sites decide whether to propagate it or fall back.

use thiserror::Error;

/// Top-level error type for cellrule-rs
#[derive(Debug, Error)]
pub enum CellruleError {
    /// Malformed expression (unknown node kind, unknown operator, bad shape)
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// Date range parsing errors
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Component lookup / mount errors
    #[error(transparent)]
    Component(#[from] ComponentError),

    /// Grid definition problems (unknown attribute, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// A structurally invalid expression tree.
///
/// `path` locates the offending node, `$` being the root
/// (e.g. `$.body.left`).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExpressionError {
    /// `type` tag is not one of `literal`, `value`, `operator`
    #[error("Not a valid expression type: {kind} (at {path})")]
    UnknownNodeKind { kind: String, path: String },

    /// Operator symbol is not in the symbol table
    #[error("Not a valid operator: {operator} (at {path})")]
    UnknownOperator { operator: String, path: String },

    /// Node has the right tag but the wrong shape
    #[error("Malformed expression at {path}: {message}")]
    Malformed { message: String, path: String },
}

impl ExpressionError {
    pub fn unknown_node_kind(kind: impl Into<String>, path: impl Into<String>) -> Self {
        Self::UnknownNodeKind {
            kind: kind.into(),
            path: path.into(),
        }
    }

    pub fn unknown_operator(operator: impl Into<String>, path: impl Into<String>) -> Self {
        Self::UnknownOperator {
            operator: operator.into(),
            path: path.into(),
        }
    }

    pub fn malformed(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            path: path.into(),
        }
    }

    /// The offending tag, for diagnostics
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::UnknownNodeKind { kind, .. } => Some(kind),
            Self::UnknownOperator { operator, .. } => Some(operator),
            Self::Malformed { .. } => None,
        }
    }

    /// Location of the offending node
    pub fn path(&self) -> &str {
        match self {
            Self::UnknownNodeKind { path, .. }
            | Self::UnknownOperator { path, .. }
            | Self::Malformed { path, .. } => path,
        }
    }
}

/// Date range string errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DateRangeError {
    /// A bound could not be parsed as a date
    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    /// An entry has more than two bounds
    #[error("Invalid date range: '{0}'")]
    InvalidRange(String),
}

/// Component registry errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ComponentError {
    /// No component registered under this name
    #[error("Couldn't find component '{name}'. Register it before mounting.")]
    NotFound { name: String },

    /// Params did not name a component
    #[error("Missing componentName in cell params")]
    MissingName,

    /// Component refused to start
    #[error("Component '{name}' failed to initialise: {message}")]
    InitFailed { name: String, message: String },
}

impl CellruleError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<String> for CellruleError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
