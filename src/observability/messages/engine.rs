// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processor construction and dispatch events.
//!
//! This module contains message types for logging events related to:
//! * Processor construction
//! * Per-node dispatch spans and debug traces
//! * Default handler fallbacks and handler table replacements
//! * Rewriter steps and error recovery

use crate::engine::ResultType;
use crate::errors::ProcessError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A processor was built from its handler table and configuration.
///
/// # Log Level
/// `debug!` - Construction detail
///
/// # Example
/// ```
/// use sexp_processor::engine::ResultType;
/// use sexp_processor::observability::messages::engine::ProcessorBuilt;
///
/// let msg = ProcessorBuilt {
///     kind: "Printer",
///     handler_count: 12,
///     strict: true,
///     expected: ResultType::String,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ProcessorBuilt<'a> {
    pub kind: &'a str,
    pub handler_count: usize,
    pub strict: bool,
    pub expected: ResultType,
}

impl Display for ProcessorBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built {} processor: {} handlers, strict={}, expected={}",
            self.kind, self.handler_count, self.strict, self.expected
        )
    }
}

impl StructuredLog for ProcessorBuilt<'_> {
    fn log(&self) {
        tracing::debug!(
            kind = self.kind,
            handler_count = self.handler_count,
            strict = self.strict,
            expected = %self.expected,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "processor_built",
            span_name = name,
            kind = self.kind,
            handler_count = self.handler_count,
        )
    }
}

/// A node is being dispatched.
///
/// Used mainly through [`StructuredLog::span`], which wraps each `process`
/// call so nested dispatches show up as nested spans.
///
/// # Log Level
/// `trace!` - Per-node detail
pub struct NodeDispatched<'a> {
    pub tag: &'a str,
    pub depth: usize,
}

impl Display for NodeDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dispatching :{} at depth {}", self.tag, self.depth)
    }
}

impl StructuredLog for NodeDispatched<'_> {
    fn log(&self) {
        tracing::trace!(tag = self.tag, depth = self.depth, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "dispatch",
            span_name = name,
            tag = self.tag,
            depth = self.depth,
        )
    }
}

/// No handler matched and the default handler took the node.
///
/// # Log Level
/// `warn!` - Usually a missing handler
///
/// # Example
/// ```
/// use sexp_processor::observability::messages::engine::DefaultHandlerUsed;
///
/// let msg = DefaultHandlerUsed {
///     tag: "while",
///     kind: "Printer",
/// };
///
/// assert_eq!(msg.to_string(), "No handler for :while in Printer, using default handler");
/// ```
pub struct DefaultHandlerUsed<'a> {
    pub tag: &'a str,
    pub kind: &'a str,
}

impl Display for DefaultHandlerUsed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No handler for :{} in {}, using default handler",
            self.tag, self.kind
        )
    }
}

impl StructuredLog for DefaultHandlerUsed<'_> {
    fn log(&self) {
        tracing::warn!(tag = self.tag, kind = self.kind, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "default_handler",
            span_name = name,
            tag = self.tag,
            kind = self.kind,
        )
    }
}

/// Which side of a dispatch a debug trace shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceStage {
    Original,
    Processed,
}

impl Display for TraceStage {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            TraceStage::Original => write!(f, "original"),
            TraceStage::Processed => write!(f, "processed"),
        }
    }
}

/// A node matched its tag's debug trace pattern.
///
/// # Log Level
/// `debug!` - Opt-in tracing of selected nodes
///
/// # Example
/// ```
/// use sexp_processor::observability::messages::engine::{DebugTraceMatched, TraceStage};
///
/// let msg = DebugTraceMatched {
///     tag: "call",
///     stage: TraceStage::Original,
///     rendered: "s(:call, nil, :puts)",
/// };
///
/// assert_eq!(msg.to_string(), ":call original: s(:call, nil, :puts)");
/// ```
pub struct DebugTraceMatched<'a> {
    pub tag: &'a str,
    pub stage: TraceStage,
    pub rendered: &'a str,
}

impl Display for DebugTraceMatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, ":{} {}: {}", self.tag, self.stage, self.rendered)
    }
}

impl StructuredLog for DebugTraceMatched<'_> {
    fn log(&self) {
        tracing::debug!(tag = self.tag, stage = %self.stage, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "debug_trace",
            span_name = name,
            tag = self.tag,
            stage = %self.stage,
        )
    }
}

/// A registration replaced an existing entry for the same tag.
///
/// # Log Level
/// `warn!` - Likely a duplicate registration
pub struct HandlerReplaced<'a> {
    pub tag: &'a str,
    pub table: &'static str,
}

impl Display for HandlerReplaced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Replaced existing {} for :{}", self.table, self.tag)
    }
}

impl StructuredLog for HandlerReplaced<'_> {
    fn log(&self) {
        tracing::warn!(tag = self.tag, table = self.table, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "handler_replaced",
            span_name = name,
            tag = self.tag,
            table = self.table,
        )
    }
}

/// A handler failed and its tag's recovery hook took over.
///
/// # Log Level
/// `warn!` - The error was handled but should not go unnoticed
pub struct ErrorRecovered<'a> {
    pub tag: &'a str,
    pub kind: &'a str,
    pub error: &'a ProcessError,
}

impl Display for ErrorRecovered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recovering from error in :{} ({}): {}",
            self.tag, self.kind, self.error
        )
    }
}

impl StructuredLog for ErrorRecovered<'_> {
    fn log(&self) {
        tracing::warn!(
            tag = self.tag,
            kind = self.kind,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "error_recovered",
            span_name = name,
            tag = self.tag,
            kind = self.kind,
            error = %self.error,
        )
    }
}

/// A rewriter ran on a node.
///
/// # Log Level
/// `trace!` - Per-node detail
pub struct RewriteApplied<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for RewriteApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rewrote :{} to :{}", self.from, self.to)
    }
}

impl StructuredLog for RewriteApplied<'_> {
    fn log(&self) {
        tracing::trace!(from = self.from, to = self.to, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("rewrite", span_name = name, from = self.from, to = self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_rendering() {
        struct TestCase {
            name: &'static str,
            rendered: String,
            expected: &'static str,
        }

        let error = ProcessError::handler_failed("lit", "boom");
        let test_cases = vec![
            TestCase {
                name: "processor built",
                rendered: ProcessorBuilt {
                    kind: "Printer",
                    handler_count: 3,
                    strict: false,
                    expected: ResultType::Sexp,
                }
                .to_string(),
                expected: "Built Printer processor: 3 handlers, strict=false, expected=sexp",
            },
            TestCase {
                name: "node dispatched",
                rendered: NodeDispatched { tag: "if", depth: 1 }.to_string(),
                expected: "Dispatching :if at depth 1",
            },
            TestCase {
                name: "handler replaced",
                rendered: HandlerReplaced {
                    tag: "lit",
                    table: "rewriter",
                }
                .to_string(),
                expected: "Replaced existing rewriter for :lit",
            },
            TestCase {
                name: "rewrite applied",
                rendered: RewriteApplied {
                    from: "attrasgn",
                    to: "call",
                }
                .to_string(),
                expected: "Rewrote :attrasgn to :call",
            },
            TestCase {
                name: "processed trace",
                rendered: DebugTraceMatched {
                    tag: "lit",
                    stage: TraceStage::Processed,
                    rendered: "s(:lit, 1)",
                }
                .to_string(),
                expected: ":lit processed: s(:lit, 1)",
            },
        ];

        for test_case in test_cases {
            assert_eq!(
                test_case.rendered, test_case.expected,
                "Test case '{}' failed",
                test_case.name
            );
        }

        let recovered = ErrorRecovered {
            tag: "lit",
            kind: "Printer",
            error: &error,
        }
        .to_string();
        assert!(recovered.starts_with("Recovering from error in :lit (Printer): "));
        assert!(recovered.contains("boom"));
    }
}
