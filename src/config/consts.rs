/// Tags that denote untyped sequences rather than typed nodes
pub const ARRAY_LIKE_TAGS: &[&str] = &["array", "args"];
/// Rendering of a missing tag in diagnostics
pub const NO_TAG: &str = "nil";
/// Tag of the node built by `process_dummy`
pub const DUMMY_TAG: &str = "dummy";
/// Default cap on how many times rewriters may change one node's tag
pub const DEFAULT_MAX_REWRITE_ROUNDS: usize = 64;
/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";
