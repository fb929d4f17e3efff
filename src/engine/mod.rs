// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod environment;
mod handlers;
mod processor;
mod registry;
mod result_type;
mod rewrite;


pub use environment::Environment;
pub use handlers::process_dummy;
pub use processor::{assert_tag, SexpProcessor};
pub use registry::HandlerRegistry;
pub use result_type::ResultType;
