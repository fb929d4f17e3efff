// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by operations on a single sexp value.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SexpError {
    /// Field name absent from the installed field list.
    #[error("no field named '{name}' on :{tag}")]
    FieldNotFound { name: String, tag: String },

    /// Field name is registered but its position has been consumed.
    #[error("field '{name}' maps to position {index}, which is past the end")]
    FieldVacant { name: String, index: usize },

    #[error("sexp is empty")]
    EmptySexp,

    /// Element 0 is a nested sexp where an atomic tag was needed.
    #[error("element 0 is a nested sexp, not a tag")]
    NestedTag,

    #[error("expected {expected} at the front, found {found}")]
    UnexpectedElement {
        expected: &'static str,
        found: String,
    },
}
