// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The tagged tree value processed by the engine.
//!
//! A [`Sexp`] is an ordered sequence of [`Element`]s whose first element is
//! its tag. Elements live in a `VecDeque` so handlers can consume a node from
//! the front; whatever is left in the deque is exactly the unconsumed
//! remainder.
//!
//! ```
//! use sexp_processor::s;
//! use sexp_processor::sexp::sym;
//!
//! let mut call = s!(:call, s!(:lit, 1), sym("+"), s!(:lit, 2));
//! assert_eq!(call.tag_name(), Some("call"));
//! assert_eq!(call.to_string(), "s(:call, s(:lit, 1), :+, s(:lit, 2))");
//!
//! call.shift();
//! assert_eq!(call.len(), 3);
//! ```

mod atom;
mod fields;
mod query;

pub use atom::{sym, Atom};

use crate::config::consts::{ARRAY_LIKE_TAGS, NO_TAG};
use crate::errors::SexpError;
use std::collections::VecDeque;
use std::fmt::{self, Debug, Display, Formatter};

/// Builds a [`Sexp`] literal: `s!(:tag, elem, ...)`.
///
/// The tag is written as a symbol; every following argument goes through
/// `Into<Element>`, so nested `s!` calls, atoms and plain literals mix freely.
#[macro_export]
macro_rules! s {
    () => {
        $crate::sexp::Sexp::new()
    };
    (: $tag:ident $(, $elem:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut sexp = $crate::sexp::Sexp::with_tag($crate::sexp::sym(stringify!($tag)));
        $( sexp.push($elem); )*
        sexp
    }};
}

/// One position of a sexp: a leaf atom or a nested sexp.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Atom(Atom),
    Sexp(Sexp),
}

impl Element {
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Atom(atom) => atom.type_name(),
            Element::Sexp(_) => "sexp",
        }
    }

    pub fn is_sexp(&self) -> bool {
        matches!(self, Element::Sexp(_))
    }

    pub fn as_sexp(&self) -> Option<&Sexp> {
        match self {
            Element::Sexp(sexp) => Some(sexp),
            Element::Atom(_) => None,
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Element::Atom(atom) => Some(atom),
            Element::Sexp(_) => None,
        }
    }

    pub fn into_sexp(self) -> Option<Sexp> {
        match self {
            Element::Sexp(sexp) => Some(sexp),
            Element::Atom(_) => None,
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Element::Atom(atom) => Display::fmt(atom, f),
            Element::Sexp(sexp) => Display::fmt(sexp, f),
        }
    }
}

impl From<Atom> for Element {
    fn from(atom: Atom) -> Self {
        Element::Atom(atom)
    }
}

impl From<Sexp> for Element {
    fn from(sexp: Sexp) -> Self {
        Element::Sexp(sexp)
    }
}

impl From<i64> for Element {
    fn from(n: i64) -> Self {
        Element::Atom(Atom::Int(n))
    }
}

impl From<f64> for Element {
    fn from(n: f64) -> Self {
        Element::Atom(Atom::Float(n))
    }
}

impl From<bool> for Element {
    fn from(b: bool) -> Self {
        Element::Atom(Atom::Bool(b))
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::Atom(Atom::from(text))
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::Atom(Atom::Str(text))
    }
}

/// A tagged, ordered, heterogeneous tree node.
///
/// Equality compares the element sequence only; the field view and the line
/// number are scratch metadata and never take part in it.
#[derive(Clone, Default)]
pub struct Sexp {
    elements: VecDeque<Element>,
    fields: Vec<String>,
    line: Option<u32>,
}

impl Sexp {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sexp holding only its tag.
    pub fn with_tag(tag: impl Into<Atom>) -> Self {
        let mut sexp = Self::new();
        sexp.elements.push_back(Element::Atom(tag.into()));
        sexp
    }

    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        Self {
            elements: elements.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True once every element has been consumed.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element 0 when it is an atom.
    pub fn tag(&self) -> Option<&Atom> {
        self.elements.front().and_then(Element::as_atom)
    }

    /// The dispatch key: the text of a symbol or string tag.
    pub fn tag_name(&self) -> Option<&str> {
        self.tag().and_then(Atom::as_name)
    }

    /// Overwrites element 0 with `tag`.
    ///
    /// Fails on an empty sexp and when element 0 is a nested sexp, since
    /// overwriting it would drop a subtree.
    pub fn set_tag(&mut self, tag: impl Into<Atom>) -> Result<(), SexpError> {
        match self.elements.front_mut() {
            None => Err(SexpError::EmptySexp),
            Some(Element::Sexp(_)) => Err(SexpError::NestedTag),
            Some(slot) => {
                *slot = Element::Atom(tag.into());
                Ok(())
            }
        }
    }

    /// Elements after the tag, copied.
    pub fn body(&self) -> Vec<Element> {
        self.elements.iter().skip(1).cloned().collect()
    }

    /// True for untyped sequence tags such as `array` and `args`.
    pub fn is_array_like(&self) -> bool {
        self.tag_name()
            .is_some_and(|tag| ARRAY_LIKE_TAGS.contains(&tag))
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.elements.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push_back(element.into());
    }

    pub fn unshift(&mut self, element: impl Into<Element>) {
        self.elements.push_front(element.into());
    }

    /// Removes and returns the front element.
    pub fn shift(&mut self) -> Option<Element> {
        self.elements.pop_front()
    }

    /// Removes the front element, which must be a nested sexp.
    ///
    /// The sexp is left untouched when the front element is anything else.
    pub fn shift_sexp(&mut self) -> Result<Sexp, SexpError> {
        match self.elements.front() {
            Some(Element::Sexp(_)) => match self.elements.pop_front() {
                Some(Element::Sexp(sexp)) => Ok(sexp),
                _ => Err(SexpError::EmptySexp),
            },
            Some(other) => Err(SexpError::UnexpectedElement {
                expected: "sexp",
                found: other.to_string(),
            }),
            None => Err(SexpError::EmptySexp),
        }
    }

    /// Removes the front element, which must be an atom.
    pub fn shift_atom(&mut self) -> Result<Atom, SexpError> {
        match self.elements.front() {
            Some(Element::Atom(_)) => match self.elements.pop_front() {
                Some(Element::Atom(atom)) => Ok(atom),
                _ => Err(SexpError::EmptySexp),
            },
            Some(other) => Err(SexpError::UnexpectedElement {
                expected: "atom",
                found: other.to_string(),
            }),
            None => Err(SexpError::EmptySexp),
        }
    }

    /// Drops every remaining element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn set_line(&mut self, line: Option<u32>) {
        self.line = line;
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Tag text for diagnostics, `nil` when there is none.
    pub(crate) fn tag_label(&self) -> String {
        self.tag_name().unwrap_or(NO_TAG).to_string()
    }
}

impl PartialEq for Sexp {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Display for Sexp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "s(")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", element)?;
        }
        write!(f, ")")
    }
}

impl Debug for Sexp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromIterator<Element> for Sexp {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self::from_elements(iter)
    }
}

impl IntoIterator for Sexp {
    type Item = Element;
    type IntoIter = std::collections::vec_deque::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s;

    #[test]
    fn test_tag_and_body() {
        let sexp = s!(:call, Atom::Nil, sym("puts"), s!(:str, "hi"));

        assert_eq!(sexp.tag(), Some(&sym("call")));
        assert_eq!(sexp.tag_name(), Some("call"));
        assert_eq!(
            sexp.body(),
            vec![
                Element::Atom(Atom::Nil),
                Element::Atom(sym("puts")),
                Element::Sexp(s!(:str, "hi")),
            ]
        );
        // body() copies, it does not consume
        assert_eq!(sexp.len(), 4);
    }

    #[test]
    fn test_empty_sexp_has_no_tag() {
        let sexp = Sexp::new();
        assert_eq!(sexp.tag(), None);
        assert_eq!(sexp.tag_name(), None);
        assert!(sexp.body().is_empty());
        assert!(!sexp.is_array_like());
    }

    #[test]
    fn test_array_like_tags() {
        struct TestCase {
            sexp: Sexp,
            expected: bool,
        }

        let test_cases = vec![
            TestCase { sexp: s!(:array, 1, 2), expected: true },
            TestCase { sexp: s!(:args, sym("a")), expected: true },
            TestCase { sexp: s!(:call), expected: false },
            TestCase { sexp: s!(:lit, 1), expected: false },
        ];

        for case in test_cases {
            assert_eq!(case.sexp.is_array_like(), case.expected, "sexp: {}", case.sexp);
        }
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(s!(:lit, 1), s!(:lit, 1));
        assert_ne!(s!(:lit, 1), s!(:lit, 2));
        assert_eq!(s!(:a, s!(:b, "x")), s!(:a, s!(:b, "x")));

        // a nested sexp never equals an atom, even one that renders alike
        let tree = Element::Sexp(s!(:lit));
        let atom = Element::Atom(sym("lit"));
        assert_ne!(tree, atom);
    }

    #[test]
    fn test_equality_ignores_fields_and_line() {
        let mut left = s!(:call, 1).with_line(7);
        left.set_fields(vec!["arg".to_string()]);
        assert_eq!(left, s!(:call, 1));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = s!(:a, s!(:b, 1));
        let mut copy = original.clone();
        copy.replace_atomic(&Atom::Int(1), &Atom::Int(9));
        copy.shift();

        assert_eq!(original, s!(:a, s!(:b, 1)));
        assert_eq!(copy, Sexp::from_elements(vec![Element::Sexp(s!(:b, 9))]));
    }

    #[test]
    fn test_unshift_restores_a_shifted_tag() {
        let mut sexp = s!(:lit, 1);
        let tag = sexp.shift().unwrap();
        sexp.unshift(tag);
        assert_eq!(sexp, s!(:lit, 1));

        sexp.unshift(sym("wrapped"));
        assert_eq!(sexp.tag_name(), Some("wrapped"));
        assert_eq!(sexp.len(), 3);
    }

    #[test]
    fn test_shift_drains_from_front() {
        let mut sexp = s!(:lit, 1);
        assert_eq!(sexp.shift(), Some(Element::Atom(sym("lit"))));
        assert_eq!(sexp.shift(), Some(Element::Atom(Atom::Int(1))));
        assert_eq!(sexp.shift(), None);
        assert!(sexp.is_empty());
    }

    #[test]
    fn test_typed_shift_leaves_sexp_alone_on_mismatch() {
        let mut sexp = s!(:call, s!(:lit, 1));
        assert!(matches!(
            sexp.shift_sexp(),
            Err(SexpError::UnexpectedElement { expected: "sexp", .. })
        ));
        assert_eq!(sexp.len(), 2);

        assert_eq!(sexp.shift_atom().unwrap(), sym("call"));
        assert_eq!(sexp.shift_sexp().unwrap(), s!(:lit, 1));
        assert!(matches!(sexp.shift_atom(), Err(SexpError::EmptySexp)));
    }

    #[test]
    fn test_set_tag() {
        let mut sexp = s!(:old, 1);
        sexp.set_tag(sym("new")).unwrap();
        assert_eq!(sexp, s!(:new, 1));

        let mut empty = Sexp::new();
        assert!(matches!(empty.set_tag(sym("x")), Err(SexpError::EmptySexp)));

        let mut headless = Sexp::from_elements(vec![Element::Sexp(s!(:lit, 1))]);
        assert!(matches!(headless.set_tag(sym("x")), Err(SexpError::NestedTag)));
        assert_eq!(headless.len(), 1);
    }

    #[test]
    fn test_display_renders_inspect_form() {
        let sexp = s!(:call, Atom::Nil, sym("foo"), "bar", 1, 2.5, false, s!(:args));
        assert_eq!(
            sexp.to_string(),
            "s(:call, nil, :foo, \"bar\", 1, 2.5, false, s(:args))"
        );
        assert_eq!(format!("{:?}", s!()), "s()");
    }
}
