// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{self, Display, Formatter};

/// A leaf value inside a sexp.
///
/// Symbols are the usual tag type and render with a leading colon; strings
/// render quoted so the two stay distinguishable in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Symbol(String),
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
}

impl Atom {
    /// Type name used in result-type diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Atom::Symbol(_) => "symbol",
            Atom::Str(_) => "string",
            Atom::Int(_) => "integer",
            Atom::Float(_) => "float",
            Atom::Bool(_) => "bool",
            Atom::Nil => "nil",
        }
    }

    /// Text of a symbol or string atom; `None` for every other kind.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Atom::Symbol(name) | Atom::Str(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Atom::Nil)
    }
}

/// Shorthand for `Atom::Symbol`.
pub fn sym(name: impl Into<String>) -> Atom {
    Atom::Symbol(name.into())
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(name) => write!(f, ":{}", name),
            Atom::Str(text) => write!(f, "{:?}", text),
            Atom::Int(n) => write!(f, "{}", n),
            Atom::Float(n) => write!(f, "{:?}", n),
            Atom::Bool(b) => write!(f, "{}", b),
            Atom::Nil => write!(f, "nil"),
        }
    }
}

impl From<i64> for Atom {
    fn from(n: i64) -> Self {
        Atom::Int(n)
    }
}

impl From<f64> for Atom {
    fn from(n: f64) -> Self {
        Atom::Float(n)
    }
}

impl From<bool> for Atom {
    fn from(b: bool) -> Self {
        Atom::Bool(b)
    }
}

impl From<&str> for Atom {
    fn from(text: &str) -> Self {
        Atom::Str(text.to_string())
    }
}

impl From<String> for Atom {
    fn from(text: String) -> Self {
        Atom::Str(text)
    }
}
