// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recursive search, visiting and scalar replacement over a sexp.

use super::{Atom, Element, Sexp};

impl Sexp {
    /// Calls `visit` on every nested sexp tagged `tag`.
    ///
    /// Children are searched before they are tested themselves, so a match
    /// nested inside another match is reported first. The receiver itself is
    /// never tested and atoms never trigger the callback.
    pub fn visit_by_tag<F>(&self, tag: &str, mut visit: F)
    where
        F: FnMut(&Sexp),
    {
        self.visit_by_tag_inner(tag, &mut visit);
    }

    fn visit_by_tag_inner<F>(&self, tag: &str, visit: &mut F)
    where
        F: FnMut(&Sexp),
    {
        for element in &self.elements {
            if let Element::Sexp(child) = element {
                child.visit_by_tag_inner(tag, visit);
                if child.tag_name() == Some(tag) {
                    visit(child);
                }
            }
        }
    }

    /// Mutable counterpart of [`Sexp::visit_by_tag`], same ordering.
    pub fn visit_by_tag_mut<F>(&mut self, tag: &str, mut visit: F)
    where
        F: FnMut(&mut Sexp),
    {
        self.visit_by_tag_mut_inner(tag, &mut visit);
    }

    fn visit_by_tag_mut_inner<F>(&mut self, tag: &str, visit: &mut F)
    where
        F: FnMut(&mut Sexp),
    {
        for element in self.elements.iter_mut() {
            if let Element::Sexp(child) = element {
                child.visit_by_tag_mut_inner(tag, visit);
                if child.tag_name() == Some(tag) {
                    visit(child);
                }
            }
        }
    }

    /// Replaces every atom equal to `from` with `to`, at any depth.
    ///
    /// Nested sexps are only searched, never compared against `from`.
    pub fn replace_atomic(&mut self, from: &Atom, to: &Atom) {
        for element in self.elements.iter_mut() {
            match element {
                Element::Sexp(child) => child.replace_atomic(from, to),
                Element::Atom(atom) if atom == from => *atom = to.clone(),
                Element::Atom(_) => {}
            }
        }
    }

    /// Direct children that are sexps.
    pub fn each_sexp(&self) -> impl Iterator<Item = &Sexp> {
        self.elements.iter().filter_map(Element::as_sexp)
    }

    /// Direct children tagged `tag`.
    pub fn find_nodes(&self, tag: &str) -> Vec<&Sexp> {
        self.each_sexp()
            .filter(|child| child.tag_name() == Some(tag))
            .collect()
    }

    pub fn find_node(&self, tag: &str) -> Option<&Sexp> {
        self.each_sexp().find(|child| child.tag_name() == Some(tag))
    }

    /// Pre-order walk over every nested sexp, excluding the receiver.
    pub fn deep_each<F>(&self, mut f: F)
    where
        F: FnMut(&Sexp),
    {
        self.deep_each_inner(&mut f);
    }

    fn deep_each_inner<F>(&self, f: &mut F)
    where
        F: FnMut(&Sexp),
    {
        for child in self.each_sexp() {
            f(child);
            child.deep_each_inner(f);
        }
    }

    /// Number of sexps in the tree, receiver included.
    pub fn mass(&self) -> usize {
        1 + self.each_sexp().map(Sexp::mass).sum::<usize>()
    }

    /// Nesting depth; a sexp without sexp children has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.each_sexp().map(Sexp::depth).max().unwrap_or(0)
    }

    /// Tag-only skeleton: atoms below the tag are dropped.
    pub fn structure(&self) -> Sexp {
        let mut result = match self.tag() {
            Some(tag) => Sexp::with_tag(tag.clone()),
            None => Sexp::new(),
        };
        for child in self.each_sexp() {
            result.push(child.structure());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::s;
    use crate::sexp::{sym, Atom, Sexp};

    fn nested() -> Sexp {
        s!(:a, s!(:b, 1), s!(:a, s!(:b, 2)))
    }

    #[test]
    fn test_visit_by_tag_reports_inner_matches_first() {
        let tree = nested();
        let mut seen = Vec::new();
        tree.visit_by_tag("b", |found| seen.push(found.clone()));

        assert_eq!(seen, vec![s!(:b, 1), s!(:b, 2)]);
    }

    #[test]
    fn test_visit_by_tag_is_post_order() {
        let tree = s!(:root, nested());
        let mut order = Vec::new();
        tree.visit_by_tag("a", |found| order.push(found.len()));

        // nested s(:a, s(:b, 2)) has 2 elements, the outer s(:a, ...) has 3
        assert_eq!(order, vec![2, 3]);
    }

    #[test]
    fn test_visit_by_tag_skips_receiver_and_atoms() {
        let tree = s!(:b, sym("b"), "b");
        let mut count = 0;
        tree.visit_by_tag("b", |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_visit_by_tag_mut_rewrites_matches() {
        let mut tree = s!(:block, s!(:lit, 1), s!(:call, s!(:lit, 2)));
        tree.visit_by_tag_mut("lit", |lit| lit.push(sym("seen")));

        assert_eq!(
            tree,
            s!(:block, s!(:lit, 1, sym("seen")), s!(:call, s!(:lit, 2, sym("seen"))))
        );
    }

    #[test]
    fn test_replace_atomic_rewrites_interior_atoms() {
        let mut tree = s!(:lit, 1, s!(:lit, 1));
        tree.replace_atomic(&Atom::Int(1), &Atom::Int(2));
        assert_eq!(tree, s!(:lit, 2, s!(:lit, 2)));
    }

    #[test]
    fn test_replace_atomic_touches_tags_too() {
        let mut tree = s!(:lvar, s!(:lvar, sym("x")));
        tree.replace_atomic(&sym("lvar"), &sym("ivar"));
        assert_eq!(tree, s!(:ivar, s!(:ivar, sym("x"))));
    }

    #[test]
    fn test_find_nodes_only_searches_direct_children() {
        let tree = s!(:block, s!(:lit, 1), s!(:call, s!(:lit, 2)), s!(:lit, 3));

        assert_eq!(tree.find_nodes("lit"), vec![&s!(:lit, 1), &s!(:lit, 3)]);
        assert_eq!(tree.find_node("call"), Some(&s!(:call, s!(:lit, 2))));
        assert_eq!(tree.find_node("defn"), None);
    }

    #[test]
    fn test_deep_each_is_pre_order() {
        let tree = s!(:a, s!(:b, s!(:c)), s!(:d));
        let mut tags = Vec::new();
        tree.deep_each(|node| tags.push(node.tag_label()));
        assert_eq!(tags, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_mass_depth_and_structure() {
        let tree = s!(:a, 1, s!(:b, s!(:c, "x")), s!(:d));

        assert_eq!(tree.mass(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.structure(), s!(:a, s!(:b, s!(:c)), s!(:d)));
        assert_eq!(Sexp::new().structure(), Sexp::new());
    }
}
