// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for consistent, human-readable
//! output and [`StructuredLog`] to emit itself with structured fields.
//!
//! # Organization
//!
//! * `engine` - processor construction, dispatch and handler events
//! * `config` - configuration loading events
//!
//! # Usage Pattern
//!
//! ```rust
//! use sexp_processor::observability::messages::engine::NodeDispatched;
//! use sexp_processor::observability::messages::StructuredLog;
//!
//! let msg = NodeDispatched { tag: "call", depth: 2 };
//! let span = msg.span("process");
//! let _guard = span.enter();
//! ```

use tracing::Span;

pub mod config;
pub mod engine;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
