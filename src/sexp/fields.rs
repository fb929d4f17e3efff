// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Named-field view over a sexp's positional elements.
//!
//! The processor installs a field list before dispatch; name `i` of the list
//! addresses element `i + 1`, since element 0 is the tag.

use super::{Element, Sexp};
use crate::errors::SexpError;

impl Sexp {
    /// Field names currently installed.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn set_fields(&mut self, fields: Vec<String>) {
        self.fields = fields;
    }

    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    /// Element index a field name maps to.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field == name)
            .map(|position| position + 1)
    }

    /// Reads a named field.
    ///
    /// Fails with `FieldNotFound` for names missing from the installed list
    /// and with `FieldVacant` when the position has already been consumed.
    pub fn field(&self, name: &str) -> Result<&Element, SexpError> {
        let index = self.resolve_field(name)?;
        self.elements.get(index).ok_or_else(|| SexpError::FieldVacant {
            name: name.to_string(),
            index,
        })
    }

    pub fn field_mut(&mut self, name: &str) -> Result<&mut Element, SexpError> {
        let index = self.resolve_field(name)?;
        self.elements.get_mut(index).ok_or_else(|| SexpError::FieldVacant {
            name: name.to_string(),
            index,
        })
    }

    /// Overwrites a named field in place.
    pub fn set_field(&mut self, name: &str, value: impl Into<Element>) -> Result<(), SexpError> {
        *self.field_mut(name)? = value.into();
        Ok(())
    }

    fn resolve_field(&self, name: &str) -> Result<usize, SexpError> {
        self.field_index(name).ok_or_else(|| SexpError::FieldNotFound {
            name: name.to_string(),
            tag: self.tag_label(),
        })
    }
}
