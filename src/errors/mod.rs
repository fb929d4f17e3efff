// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod process;
mod sexp;

pub use config::ConfigError;
pub use process::{ProcessError, ProcessResult};
pub use sexp::SexpError;
