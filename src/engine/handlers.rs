// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reusable handlers.

use crate::config::consts::DUMMY_TAG;
use crate::errors::ProcessResult;
use crate::sexp::{sym, Element, Sexp};

use super::SexpProcessor;

/// Rebuilds a node under a fresh `dummy` tag.
///
/// Drains the input front to back, processing nested sexps and keeping
/// atoms, and appends each result. This is the shape handlers that
/// synthesize new structure follow.
pub fn process_dummy<S>(processor: &mut SexpProcessor<S>, sexp: &mut Sexp) -> ProcessResult<Element> {
    let mut result = Sexp::with_tag(sym(DUMMY_TAG));
    while let Some(element) = sexp.shift() {
        result.push(processor.process_element(element)?);
    }
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessorConfig;
    use crate::engine::HandlerRegistry;
    use crate::s;

    #[test]
    fn test_dummy_drains_and_retags() {
        let mut registry = HandlerRegistry::<()>::new();
        registry.register("wrap", process_dummy);
        let mut p = SexpProcessor::from_registry("Dummy", (), registry, ProcessorConfig::default());

        let mut tree = s!(:wrap, 1, s!(:lit, 2));
        let result = p.process(&mut tree).unwrap();

        assert_eq!(result, Element::Sexp(s!(:dummy, sym("wrap"), 1, s!(:lit, 2))));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_dummy_as_default_handler() {
        let mut registry = HandlerRegistry::<()>::new();
        registry.register(DUMMY_TAG, process_dummy);
        let config = ProcessorConfig::default()
            .with_default_handler(DUMMY_TAG)
            .with_excluded("cfunc");
        let mut p = SexpProcessor::from_registry("Dummy", (), registry, config);

        let result = p.process(&mut s!(:if, s!(:true), s!(:lit, 1))).unwrap();

        // every level goes through the default handler
        assert_eq!(
            result,
            Element::Sexp(s!(
                :dummy,
                sym("if"),
                s!(:dummy, sym("true")),
                s!(:dummy, sym("lit"), 1)
            ))
        );
    }
}
