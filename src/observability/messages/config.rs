// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading.

use crate::config::ConfigFormat;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A processor configuration file was loaded and parsed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use sexp_processor::config::ConfigFormat;
/// use sexp_processor::observability::messages::config::ConfigLoaded;
///
/// let msg = ConfigLoaded {
///     path: "printer.yaml",
///     format: ConfigFormat::Yaml,
///     strict: true,
///     excluded_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub format: ConfigFormat,
    pub strict: bool,
    pub excluded_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {:?} processor config from {}: strict={}, {} excluded tags",
            self.format, self.path, self.strict, self.excluded_count
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            format = ?self.format,
            strict = self.strict,
            excluded_count = self.excluded_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_loaded",
            span_name = name,
            path = self.path,
            format = ?self.format,
        )
    }
}
