pub mod handler;

pub use handler::{Recovery, Rewriter, SexpHandlers, TagHandler};
