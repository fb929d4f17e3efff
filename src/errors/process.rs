// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors that abort a `process` call.
//!
//! Each variant carries the offending tag and, where it helps reproduce the
//! failure, the engine kind and a snapshot of the node taken before it was
//! consumed.

use crate::engine::ResultType;
use crate::errors::SexpError;
use crate::sexp::Sexp;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    /// The tag is in the exclusion set.
    #[error("'{tag}' is not a supported node type")]
    UnsupportedNodeType { tag: String },

    /// Strict mode and no handler could be resolved.
    #[error("unknown node type '{tag}' for {kind}")]
    UnknownNodeType { tag: String, kind: String },

    /// A handler returned a value of the wrong type.
    #[error("{kind} handler for '{tag}' returned {actual}, expected {expected}")]
    ResultTypeMismatch {
        tag: String,
        kind: String,
        expected: ResultType,
        actual: &'static str,
        original: Option<Box<Sexp>>,
    },

    /// A handler returned without draining its input.
    #[error("{kind} handler for '{tag}' returned without consuming {remaining}")]
    IncompleteConsumption {
        tag: String,
        kind: String,
        remaining: Sexp,
        original: Option<Box<Sexp>>,
    },

    /// `assert_tag` contract violated.
    #[error("expected :{expected} in {found}")]
    TagMismatch { expected: String, found: Sexp },

    /// The fallback walker got back something that is not a well-formed sexp.
    #[error("malformed sexp under '{tag}': {reason}")]
    MalformedSexp { tag: String, reason: String },

    /// Rewriters kept changing a node's tag.
    #[error("rewriting '{tag}' did not settle after {rounds} rounds")]
    RewriteDiverged { tag: String, rounds: usize },

    /// A handler's own failure.
    #[error("handler for '{tag}' failed: {message}")]
    HandlerFailed { tag: String, message: String },

    #[error(transparent)]
    Sexp(#[from] SexpError),
}

impl ProcessError {
    /// Pre-consumption snapshot of the node, when one was taken.
    pub fn original(&self) -> Option<&Sexp> {
        match self {
            ProcessError::ResultTypeMismatch { original, .. }
            | ProcessError::IncompleteConsumption { original, .. } => original.as_deref(),
            _ => None,
        }
    }

    /// Convenience constructor for handler authors.
    pub fn handler_failed(tag: impl Into<String>, message: impl Into<String>) -> Self {
        ProcessError::HandlerFailed {
            tag: tag.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for processing operations.
pub type ProcessResult<T> = Result<T, ProcessError>;
