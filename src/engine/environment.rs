// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Scoped name table for handlers that track lexical bindings.
///
/// Scopes stack innermost last. The root scope always exists.
#[derive(Debug, Clone)]
pub struct Environment<V> {
    scopes: Vec<HashMap<String, V>>,
}

impl<V> Environment<V> {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Number of live scopes, root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Innermost binding of `name`.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Updates the innermost scope that already binds `name`, otherwise
    /// binds it in the current scope.
    pub fn set(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        let index = self
            .scopes
            .iter()
            .rposition(|scope| scope.contains_key(&name))
            .unwrap_or(self.scopes.len() - 1);
        self.scopes[index].insert(name, value);
    }

    /// Binds `name` in the current scope, shadowing outer bindings.
    pub fn define(&mut self, name: impl Into<String>, value: V) {
        if let Some(current) = self.scopes.last_mut() {
            current.insert(name.into(), value);
        }
    }

    /// Bindings of the current scope only.
    pub fn current(&self) -> &HashMap<String, V> {
        &self.scopes[self.scopes.len() - 1]
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Drops the innermost scope; the root scope is kept.
    pub fn pop_scope(&mut self) -> Option<HashMap<String, V>> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }
}

impl<V: Clone> Environment<V> {
    /// Every visible binding, inner scopes winning.
    pub fn all(&self) -> HashMap<String, V> {
        let mut merged = HashMap::new();
        for scope in &self.scopes {
            for (name, value) in scope {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }
}

impl<V> Default for Environment<V> {
    fn default() -> Self {
        Self::new()
    }
}
