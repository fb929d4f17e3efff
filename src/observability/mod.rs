// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic output goes through message structs rather than inline format
//! strings. Each message implements `Display` for the human-readable text and
//! [`StructuredLog`](messages::StructuredLog) to emit itself at its own level
//! with its fields attached.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - dispatch, default handler, rewriter and recovery events
//! * `messages::config` - configuration loading events
//!
//! # Usage
//!
//! ```rust
//! use sexp_processor::observability::messages::engine::DefaultHandlerUsed;
//! use sexp_processor::observability::messages::StructuredLog;
//!
//! DefaultHandlerUsed {
//!     tag: "while",
//!     kind: "Printer",
//! }
//! .log();
//! ```

use crate::config::consts::DEFAULT_LOG_FILTER;
use tracing_subscriber::EnvFilter;

pub mod messages;

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// Falls back to `warn` when `RUST_LOG` is unset or invalid. Calling it again
/// after a subscriber is installed does nothing.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
