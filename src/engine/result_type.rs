// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::sexp::{Atom, Element};
use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Kind of value every handler result must have.
///
/// # Variants
/// * `Sexp` - A nested tree (the default for transforming processors)
/// * `Atom` - Any leaf value
/// * `Symbol`, `String`, `Integer`, `Float`, `Bool` - One specific leaf kind
/// * `Any` - No check (interpreters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    #[default]
    Sexp,
    Atom,
    Symbol,
    String,
    Integer,
    Float,
    Bool,
    Any,
}

impl ResultType {
    pub fn matches(&self, value: &Element) -> bool {
        match (self, value) {
            (ResultType::Any, _) => true,
            (ResultType::Sexp, Element::Sexp(_)) => true,
            (ResultType::Atom, Element::Atom(_)) => true,
            (ResultType::Symbol, Element::Atom(Atom::Symbol(_))) => true,
            (ResultType::String, Element::Atom(Atom::Str(_))) => true,
            (ResultType::Integer, Element::Atom(Atom::Int(_))) => true,
            (ResultType::Float, Element::Atom(Atom::Float(_))) => true,
            (ResultType::Bool, Element::Atom(Atom::Bool(_))) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResultType::Sexp => "sexp",
            ResultType::Atom => "atom",
            ResultType::Symbol => "symbol",
            ResultType::String => "string",
            ResultType::Integer => "integer",
            ResultType::Float => "float",
            ResultType::Bool => "bool",
            ResultType::Any => "any",
        }
    }
}

impl Display for ResultType {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
