// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lazy struct (and union variant) access.

use super::{over, Lazy};
use crate::codec::struct_field_offset;
use crate::descriptor::{FieldDescriptor, StructDescriptor};
use crate::error::{Result, ViewError};
use crate::value::Value;
use std::collections::HashMap;

/// Struct whose fields decode on access.
#[derive(Debug, Clone, Copy)]
pub struct LazyStruct<'a> {
    layout: &'a StructDescriptor,
    bytes: &'a [u8],
    base: usize,
    tag: Option<u8>,
}

impl<'a> LazyStruct<'a> {
    pub(crate) fn new(layout: &'a StructDescriptor, bytes: &'a [u8], base: usize) -> Self {
        Self {
            layout,
            bytes,
            base,
            tag: None,
        }
    }

    pub(crate) fn with_tag(mut self, tag: u8) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Union tag that selected this layout, if it is a union variant.
    pub fn tag(&self) -> Option<u8> {
        self.tag
    }

    pub fn layout(&self) -> &'a StructDescriptor {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Field names in declared order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.layout.fields.iter().map(|f| f.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layout.field(name).is_some()
    }

    /// Decode field `name`, locating it through the header.
    pub fn get(&self, name: &str) -> Result<Lazy<'a>> {
        let index = self
            .layout
            .field_index(name)
            .ok_or_else(|| ViewError::UnknownField(name.to_string()))?;
        self.get_index(index)
    }

    fn get_index(&self, index: usize) -> Result<Lazy<'a>> {
        let field: &'a FieldDescriptor = &self.layout.fields[index];
        let at = struct_field_offset(self.bytes, self.base, index)?;
        over(&field.type_desc, self.bytes, at)
    }

    /// Decode field `name` fully.
    pub fn get_value(&self, name: &str) -> Result<Value> {
        self.get(name)?.to_value()
    }

    /// `(name, field)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Result<Lazy<'a>>)> + 'a {
        let this = *self;
        self.layout
            .fields
            .iter()
            .enumerate()
            .map(move |(index, f)| (f.name.as_str(), this.get_index(index)))
    }

    pub fn to_value(&self) -> Result<Value> {
        let mut fields = HashMap::with_capacity(self.len());
        for (name, field) in self.iter() {
            fields.insert(name.to_string(), field?.to_value()?);
        }
        Ok(Value::Struct(fields))
    }
}
