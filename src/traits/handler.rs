// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Contracts for the functions a processor dispatches to.
//!
//! Each trait has a blanket implementation for matching closures and `fn`
//! items, so most handlers are plain functions registered by tag.

use crate::config::ProcessorConfig;
use crate::engine::{HandlerRegistry, SexpProcessor};
use crate::errors::{ProcessError, ProcessResult};
use crate::sexp::{Element, Sexp};

/// Consumes a node dispatched by tag and produces the processor's result.
///
/// The node arrives with its tag removed when `auto_shift_tag` is on and
/// the handler is not the default one. Handlers drain what they use from the
/// front and recurse into children through `processor.process`.
pub trait TagHandler<S>: Send + Sync {
    fn handle(&self, processor: &mut SexpProcessor<S>, sexp: &mut Sexp) -> ProcessResult<Element>;
}

impl<S, F> TagHandler<S> for F
where
    F: Fn(&mut SexpProcessor<S>, &mut Sexp) -> ProcessResult<Element> + Send + Sync,
{
    fn handle(&self, processor: &mut SexpProcessor<S>, sexp: &mut Sexp) -> ProcessResult<Element> {
        self(processor, sexp)
    }
}

/// Turns a node into an equivalent node before dispatch.
pub trait Rewriter<S>: Send + Sync {
    fn rewrite(&self, processor: &mut SexpProcessor<S>, sexp: Sexp) -> ProcessResult<Sexp>;
}

impl<S, F> Rewriter<S> for F
where
    F: Fn(&mut SexpProcessor<S>, Sexp) -> ProcessResult<Sexp> + Send + Sync,
{
    fn rewrite(&self, processor: &mut SexpProcessor<S>, sexp: Sexp) -> ProcessResult<Sexp> {
        self(processor, sexp)
    }
}

/// Replaces the result of a handler that failed.
///
/// Receives the live remainder of the node, the snapshot taken before the
/// handler ran and the error. Returning `Err` lets the failure propagate.
pub trait Recovery<S>: Send + Sync {
    fn recover(
        &self,
        processor: &mut SexpProcessor<S>,
        remaining: &mut Sexp,
        original: &Sexp,
        error: ProcessError,
    ) -> ProcessResult<Element>;
}

impl<S, F> Recovery<S> for F
where
    F: Fn(&mut SexpProcessor<S>, &mut Sexp, &Sexp, ProcessError) -> ProcessResult<Element>
        + Send
        + Sync,
{
    fn recover(
        &self,
        processor: &mut SexpProcessor<S>,
        remaining: &mut Sexp,
        original: &Sexp,
        error: ProcessError,
    ) -> ProcessResult<Element> {
        self(processor, remaining, original, error)
    }
}

/// A processor kind: the state type plus the handlers it registers.
///
/// `SexpProcessor::new` calls `register` exactly once; the resulting table
/// is fixed for the processor's lifetime.
///
/// ```
/// use sexp_processor::engine::{HandlerRegistry, SexpProcessor};
/// use sexp_processor::errors::ProcessResult;
/// use sexp_processor::sexp::{Element, Sexp};
/// use sexp_processor::traits::SexpHandlers;
/// use sexp_processor::s;
///
/// #[derive(Default)]
/// struct LitCounter {
///     seen: usize,
/// }
///
/// fn process_lit(p: &mut SexpProcessor<LitCounter>, sexp: &mut Sexp) -> ProcessResult<Element> {
///     p.state_mut().seen += 1;
///     let out = sexp.clone();
///     sexp.clear();
///     Ok(out.into())
/// }
///
/// impl SexpHandlers for LitCounter {
///     fn kind() -> &'static str {
///         "LitCounter"
///     }
///
///     fn register(registry: &mut HandlerRegistry<Self>) {
///         registry.register("lit", process_lit);
///     }
/// }
///
/// let mut processor = SexpProcessor::new(LitCounter::default());
/// processor.process(&mut s!(:block, s!(:lit, 1), s!(:lit, 2))).unwrap();
/// assert_eq!(processor.state().seen, 2);
/// ```
pub trait SexpHandlers: Sized + 'static {
    /// Name reported in diagnostics.
    fn kind() -> &'static str;

    fn register(registry: &mut HandlerRegistry<Self>);

    fn config() -> ProcessorConfig {
        ProcessorConfig::default()
    }
}
