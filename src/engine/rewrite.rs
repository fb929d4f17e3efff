// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bottom-up rewriter pass run before dispatch.
//!
//! Children are rewritten before their parent. A node is then handed to the
//! rewriter registered for its tag, repeatedly, until no rewriter matches or
//! a rewriter returns the node with its tag unchanged.

use crate::errors::{ProcessError, ProcessResult};
use crate::observability::messages::{engine::RewriteApplied, StructuredLog};
use crate::sexp::{Element, Sexp};

use super::SexpProcessor;

impl<S> SexpProcessor<S> {
    /// Rewrite a whole tree.
    ///
    /// `process` calls this once per top-level call when any rewriter is
    /// registered; handlers may also call it on trees they build.
    pub fn rewrite(&mut self, sexp: Sexp) -> ProcessResult<Sexp> {
        let label = sexp.tag_label();
        let line = sexp.line();

        self.enter_context(label.clone());
        let children = self.rewrite_children(sexp);
        self.leave_context();

        let mut sexp = children?;
        sexp.set_line(line);

        let mut tag = sexp.tag_name().map(str::to_owned);
        let mut rounds = 0;
        loop {
            let Some(rewriter) = self.rewriter_for(tag.as_deref()) else {
                break;
            };

            sexp = rewriter.rewrite(self, sexp)?;
            let new_tag = sexp.tag_name().map(str::to_owned);

            RewriteApplied {
                from: tag.as_deref().unwrap_or_default(),
                to: &sexp.tag_label(),
            }
            .log();

            if new_tag == tag {
                break;
            }

            rounds += 1;
            if rounds >= self.config().max_rewrite_rounds {
                return Err(ProcessError::RewriteDiverged { tag: label, rounds });
            }
            tag = new_tag;
        }

        Ok(sexp)
    }

    fn rewrite_children(&mut self, sexp: Sexp) -> ProcessResult<Sexp> {
        sexp.into_iter()
            .map(|element| match element {
                Element::Sexp(child) => self.rewrite(child).map(Element::Sexp),
                atom => Ok(atom),
            })
            .collect()
    }
}
