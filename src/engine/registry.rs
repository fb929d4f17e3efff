// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ProcessError, ProcessResult};
use crate::observability::messages::{engine::HandlerReplaced, StructuredLog};
use crate::sexp::{Element, Sexp};
use crate::traits::{Recovery, Rewriter, SexpHandlers, TagHandler};
use std::collections::HashMap;
use std::sync::Arc;

use super::SexpProcessor;

/// Tag-keyed dispatch tables for one processor.
///
/// The registry maps each tag to the handler that consumes nodes with that
/// tag, plus optional rewriters and recovery hooks. Entries are wrapped in
/// `Arc` so the processor can hold a handler while handing itself to it
/// mutably. A processor takes ownership of its registry at construction and
/// only exposes it by shared reference afterwards, so the table cannot change
/// while the processor is in use.
///
/// # Examples
///
/// ```
/// use sexp_processor::engine::{HandlerRegistry, SexpProcessor};
/// use sexp_processor::config::ProcessorConfig;
/// use sexp_processor::sexp::{Atom, Element};
/// use sexp_processor::s;
///
/// let mut registry = HandlerRegistry::<()>::new();
/// registry.register("lit", |_p, sexp| {
///     sexp.shift();
///     let value = sexp.shift_atom()?;
///     Ok(Element::Atom(value))
/// });
///
/// assert!(registry.contains("lit"));
///
/// let config = ProcessorConfig::interpreter();
/// let mut processor = SexpProcessor::from_registry("LitReader", (), registry, config);
/// let value = processor.process(&mut s!(:lit, 42)).unwrap();
/// assert_eq!(value, Element::Atom(Atom::Int(42)));
/// ```
pub struct HandlerRegistry<S> {
    handlers: HashMap<String, Arc<dyn TagHandler<S>>>,
    rewriters: HashMap<String, Arc<dyn Rewriter<S>>>,
    recoveries: HashMap<String, Arc<dyn Recovery<S>>>,
}

impl<S> HandlerRegistry<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            rewriters: HashMap::new(),
            recoveries: HashMap::new(),
        }
    }

    /// Build the table a processor kind declares
    pub fn for_kind() -> Self
    where
        S: SexpHandlers,
    {
        let mut registry = Self::new();
        S::register(&mut registry);
        registry
    }

    /// Register the handler for `tag`, replacing any earlier one
    pub fn register<F>(&mut self, tag: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut SexpProcessor<S>, &mut Sexp) -> ProcessResult<Element> + Send + Sync + 'static,
        S: 'static,
    {
        self.register_handler(tag, Arc::new(handler))
    }

    /// Register an already shared handler, e.g. a stateful struct
    pub fn register_handler(
        &mut self,
        tag: impl Into<String>,
        handler: Arc<dyn TagHandler<S>>,
    ) -> &mut Self {
        let tag = tag.into();
        if self.handlers.insert(tag.clone(), handler).is_some() {
            HandlerReplaced { tag: &tag, table: "handler" }.log();
        }
        self
    }

    /// Register the rewriter for `tag`
    pub fn register_rewriter<F>(&mut self, tag: impl Into<String>, rewriter: F) -> &mut Self
    where
        F: Fn(&mut SexpProcessor<S>, Sexp) -> ProcessResult<Sexp> + Send + Sync + 'static,
        S: 'static,
    {
        let tag = tag.into();
        if self.rewriters.insert(tag.clone(), Arc::new(rewriter)).is_some() {
            HandlerReplaced { tag: &tag, table: "rewriter" }.log();
        }
        self
    }

    /// Register a recovery hook around the handler for `tag`
    pub fn on_error_in<F>(&mut self, tag: impl Into<String>, recovery: F) -> &mut Self
    where
        F: Fn(&mut SexpProcessor<S>, &mut Sexp, &Sexp, ProcessError) -> ProcessResult<Element>
            + Send
            + Sync
            + 'static,
        S: 'static,
    {
        let tag = tag.into();
        if self.recoveries.insert(tag.clone(), Arc::new(recovery)).is_some() {
            HandlerReplaced { tag: &tag, table: "recovery" }.log();
        }
        self
    }

    pub fn handler(&self, tag: &str) -> Option<&Arc<dyn TagHandler<S>>> {
        self.handlers.get(tag)
    }

    pub fn rewriter(&self, tag: &str) -> Option<&Arc<dyn Rewriter<S>>> {
        self.rewriters.get(tag)
    }

    pub fn recovery(&self, tag: &str) -> Option<&Arc<dyn Recovery<S>>> {
        self.recoveries.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn has_rewriters(&self) -> bool {
        !self.rewriters.is_empty()
    }

    /// Handled tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Number of tag handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<S> Default for HandlerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for HandlerRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rewriters: Vec<&String> = self.rewriters.keys().collect();
        rewriters.sort_unstable();
        let mut recoveries: Vec<&String> = self.recoveries.keys().collect();
        recoveries.sort_unstable();

        f.debug_struct("HandlerRegistry")
            .field("handler_tags", &self.tags())
            .field("rewriter_tags", &rewriters)
            .field("recovery_tags", &recoveries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s;

    struct Tagger;

    impl SexpHandlers for Tagger {
        fn kind() -> &'static str {
            "Tagger"
        }

        fn register(registry: &mut HandlerRegistry<Self>) {
            registry
                .register("lit", |_p, sexp| {
                    let out = sexp.clone();
                    sexp.clear();
                    Ok(out.into())
                })
                .register("str", |_p, sexp| {
                    sexp.clear();
                    Ok(s!(:str).into())
                })
                .register_rewriter("attrasgn", |_p, sexp| Ok(sexp));
        }
    }

    #[test]
    fn test_for_kind_collects_registered_tags() {
        let registry = HandlerRegistry::<Tagger>::for_kind();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tags(), vec!["lit", "str"]);
        assert!(registry.contains("lit"));
        assert!(!registry.contains("attrasgn"));
        assert!(registry.rewriter("attrasgn").is_some());
        assert!(registry.has_rewriters());
        assert!(registry.recovery("lit").is_none());
    }

    #[test]
    fn test_register_replaces_existing_handler() {
        let mut registry = HandlerRegistry::<()>::new();
        registry.register("lit", |_p, _sexp| Ok(s!(:first).into()));
        registry.register("lit", |_p, _sexp| Ok(s!(:second).into()));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_registry() {
        let registry = HandlerRegistry::<()>::default();

        assert!(registry.is_empty());
        assert!(!registry.has_rewriters());
        assert!(registry.handler("lit").is_none());
        assert_eq!(
            format!("{:?}", registry),
            "HandlerRegistry { handler_tags: [], rewriter_tags: [], recovery_tags: [] }"
        );
    }
}
