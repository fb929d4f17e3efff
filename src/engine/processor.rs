// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tag-dispatching sexp processor.
//!
//! `process` routes a node to the handler registered for its tag, checks the
//! handler's result against the configured contract and, when no handler
//! exists, drains the node with a generic walker that rebuilds it from its
//! processed children.
//!
//! # Dispatch order
//!
//! 1. Top-level calls run the rewriter pass first when rewriters exist.
//! 2. Matching debug trace patterns are logged.
//! 3. The tag's field list is installed (or cleared).
//! 4. Excluded tags fail with `UnsupportedNodeType`.
//! 5. The tag's handler, or the default tag's handler, is invoked and its
//!    result checked for type and complete consumption.
//! 6. Without a handler: strict mode fails with `UnknownNodeType`, otherwise
//!    the generic walker runs.

use crate::config::consts::NO_TAG;
use crate::config::ProcessorConfig;
use crate::errors::{ProcessError, ProcessResult, SexpError};
use crate::observability::messages::engine::{
    DebugTraceMatched, DefaultHandlerUsed, ErrorRecovered, NodeDispatched, ProcessorBuilt,
    TraceStage,
};
use crate::observability::messages::StructuredLog;
use crate::sexp::{Element, Sexp};
use crate::traits::{Rewriter, SexpHandlers, TagHandler};
use std::sync::Arc;

use super::{Environment, HandlerRegistry};

/// A configured processor bound to one handler table and one state value.
///
/// `S` is the processor kind's state, reachable from handlers through
/// [`state_mut`](Self::state_mut). Handlers, configuration and state are the
/// only things that persist between `process` calls; the context stack is
/// empty again once a top-level call returns.
pub struct SexpProcessor<S = ()> {
    kind: String,
    config: ProcessorConfig,
    registry: HandlerRegistry<S>,
    state: S,
    context: Vec<String>,
    env: Environment<Element>,
}

impl<S: SexpHandlers> SexpProcessor<S> {
    /// Build a processor of kind `S` with the kind's default configuration
    pub fn new(state: S) -> Self {
        Self::with_config(state, S::config())
    }

    pub fn with_config(state: S, config: ProcessorConfig) -> Self {
        Self::from_registry(S::kind(), state, HandlerRegistry::for_kind(), config)
    }
}

impl<S> SexpProcessor<S> {
    /// Build a processor from an explicit handler table
    pub fn from_registry(
        kind: impl Into<String>,
        state: S,
        registry: HandlerRegistry<S>,
        config: ProcessorConfig,
    ) -> Self {
        let processor = Self {
            kind: kind.into(),
            config,
            registry,
            state,
            context: Vec::new(),
            env: Environment::new(),
        };

        ProcessorBuilt {
            kind: &processor.kind,
            handler_count: processor.registry.len(),
            strict: processor.config.strict,
            expected: processor.config.expected,
        }
        .log();

        processor
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ProcessorConfig {
        &mut self.config
    }

    pub fn registry(&self) -> &HandlerRegistry<S> {
        &self.registry
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Tags of the nodes being processed, outermost first.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Tag of the node enclosing the one currently being processed.
    pub fn parent_tag(&self) -> Option<&str> {
        let len = self.context.len();
        if len >= 2 {
            Some(self.context[len - 2].as_str())
        } else {
            None
        }
    }

    pub fn env(&self) -> &Environment<Element> {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment<Element> {
        &mut self.env
    }

    /// Run `f` inside a fresh environment scope.
    pub fn scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.env.push_scope();
        let result = f(self);
        self.env.pop_scope();
        result
    }

    /// [`process`](Self::process) for an optional node; `None` passes through.
    pub fn process_opt(&mut self, sexp: Option<&mut Sexp>) -> ProcessResult<Option<Element>> {
        match sexp {
            Some(sexp) => self.process(sexp).map(Some),
            None => Ok(None),
        }
    }

    /// Process one node, consuming it.
    ///
    /// On success the node has been drained as far as its handler (or the
    /// generic walker) consumed it; the returned element is the result.
    pub fn process(&mut self, sexp: &mut Sexp) -> ProcessResult<Element> {
        if self.context.is_empty() && self.registry.has_rewriters() {
            // the caller keeps its tree untouched when a rewriter fails
            *sexp = self.rewrite(sexp.clone())?;
        }

        let tag = sexp.tag_name().map(str::to_owned);
        let label = tag.clone().unwrap_or_else(|| NO_TAG.to_string());

        let span = NodeDispatched {
            tag: &label,
            depth: self.context.len(),
        }
        .span("process");
        let _guard = span.enter();

        self.enter_context(label.clone());
        let result = self.dispatch(sexp, tag.as_deref(), &label);
        self.leave_context();
        result
    }

    /// Process a nested sexp; atoms pass through unchanged.
    pub fn process_element(&mut self, element: Element) -> ProcessResult<Element> {
        match element {
            Element::Sexp(mut sexp) => self.process(&mut sexp),
            atom => Ok(atom),
        }
    }

    pub(super) fn enter_context(&mut self, tag: String) {
        self.context.push(tag);
    }

    pub(super) fn leave_context(&mut self) {
        self.context.pop();
    }

    pub(super) fn rewriter_for(&self, tag: Option<&str>) -> Option<Arc<dyn Rewriter<S>>> {
        tag.and_then(|tag| self.registry.rewriter(tag)).cloned()
    }

    fn dispatch(&mut self, sexp: &mut Sexp, tag: Option<&str>, label: &str) -> ProcessResult<Element> {
        let traced = self.trace_original(sexp, tag, label);
        let original = self
            .wants_snapshot(tag)
            .then(|| Box::new(sexp.clone()));

        match tag.and_then(|tag| self.config.field_accessors.get(tag)) {
            Some(fields) => sexp.set_fields(fields.clone()),
            None => sexp.clear_fields(),
        }

        if tag.is_some_and(|tag| self.config.excluded_tags.contains(tag)) {
            return Err(ProcessError::UnsupportedNodeType {
                tag: label.to_string(),
            });
        }

        let result = match self.resolve(tag) {
            Some((handler, is_default)) => {
                self.invoke(handler, is_default, sexp, tag, label, original)?
            }
            None if self.config.strict => {
                return Err(ProcessError::UnknownNodeType {
                    tag: label.to_string(),
                    kind: self.kind.clone(),
                });
            }
            None => {
                let walked = Element::Sexp(self.walk(sexp, label)?);
                self.check_result_type(&walked, label, original)?;
                walked
            }
        };

        if traced {
            DebugTraceMatched {
                tag: label,
                stage: TraceStage::Processed,
                rendered: &result.to_string(),
            }
            .log();
        }

        Ok(result)
    }

    /// The tag's own handler, else the default tag's handler. The flag is
    /// true when the handler is the default one.
    fn resolve(&self, tag: Option<&str>) -> Option<(Arc<dyn TagHandler<S>>, bool)> {
        let default_tag = self.config.default_handler.as_deref();

        if let Some(handler) = tag.and_then(|tag| self.registry.handler(tag)) {
            return Some((Arc::clone(handler), tag == default_tag));
        }

        default_tag
            .and_then(|tag| self.registry.handler(tag))
            .map(|handler| (Arc::clone(handler), true))
    }

    fn invoke(
        &mut self,
        handler: Arc<dyn TagHandler<S>>,
        is_default: bool,
        sexp: &mut Sexp,
        tag: Option<&str>,
        label: &str,
        original: Option<Box<Sexp>>,
    ) -> ProcessResult<Element> {
        self.announce_default(is_default, label);

        if self.config.auto_shift_tag && !is_default {
            sexp.shift();
        }

        let result = match handler.handle(self, sexp) {
            Ok(value) => value,
            Err(error) => {
                let recovery = tag.and_then(|tag| self.registry.recovery(tag)).cloned();
                match (recovery, original.as_deref()) {
                    (Some(recovery), Some(snapshot)) => {
                        ErrorRecovered {
                            tag: label,
                            kind: &self.kind,
                            error: &error,
                        }
                        .log();
                        recovery.recover(self, sexp, snapshot, error)?
                    }
                    _ => return Err(error),
                }
            }
        };

        if !self.config.expected.matches(&result) {
            return Err(self.result_type_mismatch(&result, label, original));
        }

        if self.config.require_empty && !sexp.is_empty() {
            return Err(ProcessError::IncompleteConsumption {
                tag: label.to_string(),
                kind: self.kind.clone(),
                remaining: sexp.clone(),
                original,
            });
        }

        Ok(result)
    }

    fn check_result_type(
        &self,
        result: &Element,
        label: &str,
        original: Option<Box<Sexp>>,
    ) -> ProcessResult<()> {
        if self.config.expected.matches(result) {
            Ok(())
        } else {
            Err(self.result_type_mismatch(result, label, original))
        }
    }

    fn result_type_mismatch(
        &self,
        result: &Element,
        label: &str,
        original: Option<Box<Sexp>>,
    ) -> ProcessError {
        ProcessError::ResultTypeMismatch {
            tag: label.to_string(),
            kind: self.kind.clone(),
            expected: self.config.expected,
            actual: result.type_name(),
            original,
        }
    }

    /// Generic walker: drains `sexp` into a new sexp, processing nested
    /// sexps and keeping atoms as they are.
    fn walk(&mut self, sexp: &mut Sexp, label: &str) -> ProcessResult<Sexp> {
        let head = sexp.tag().cloned();
        let mut result = Sexp::new();
        result.set_line(sexp.line());

        while let Some(element) = sexp.shift() {
            match element {
                Element::Sexp(mut child) => {
                    let processed = self.process(&mut child)?;
                    result.push(expect_tagged_sexp(processed, label)?);
                }
                atom => result.push(atom),
            }
        }

        // Best-effort: a rejected retag leaves the result exactly as drained.
        let _ = head
            .ok_or(SexpError::EmptySexp)
            .and_then(|head| result.set_tag(head));

        Ok(result)
    }

    fn trace_original(&self, sexp: &Sexp, tag: Option<&str>, label: &str) -> bool {
        let Some(pattern) = tag.and_then(|tag| self.config.debug_trace.get(tag)) else {
            return false;
        };

        let rendered = sexp.to_string();
        if !pattern.is_match(&rendered) {
            return false;
        }

        DebugTraceMatched {
            tag: label,
            stage: TraceStage::Original,
            rendered: &rendered,
        }
        .log();
        true
    }

    /// Logs `DefaultHandlerUsed` when enabled; true when it did.
    fn announce_default(&self, is_default: bool, label: &str) -> bool {
        if !(is_default && self.config.warn_on_default) {
            return false;
        }

        DefaultHandlerUsed {
            tag: label,
            kind: &self.kind,
        }
        .log();
        true
    }

    fn wants_snapshot(&self, tag: Option<&str>) -> bool {
        self.config.capture_original
            || tag.is_some_and(|tag| {
                self.config.debug_trace.contains_key(tag) || self.registry.recovery(tag).is_some()
            })
    }
}

impl<S> std::fmt::Debug for SexpProcessor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SexpProcessor")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("context", &self.context)
            .finish()
    }
}

/// Fails with `TagMismatch` unless `sexp` is tagged `expected`.
pub fn assert_tag(sexp: &Sexp, expected: &str) -> ProcessResult<()> {
    if sexp.tag_name() == Some(expected) {
        Ok(())
    } else {
        Err(ProcessError::TagMismatch {
            expected: expected.to_string(),
            found: sexp.clone(),
        })
    }
}

/// A recursively processed child must stay a sexp with an atomic head.
fn expect_tagged_sexp(value: Element, parent: &str) -> ProcessResult<Sexp> {
    match value {
        Element::Sexp(sexp) if sexp.get(0).is_some_and(Element::is_sexp) => {
            Err(ProcessError::MalformedSexp {
                tag: parent.to_string(),
                reason: format!("processed child {} does not start with a tag", sexp),
            })
        }
        Element::Sexp(sexp) => Ok(sexp),
        other => Err(ProcessError::MalformedSexp {
            tag: parent.to_string(),
            reason: format!("processed child became {} {}", other.type_name(), other),
        }),
    }
}
