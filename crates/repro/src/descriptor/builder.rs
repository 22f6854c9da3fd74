// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for struct and union descriptors.

use super::{Descriptor, FieldDescriptor, StructDescriptor, UnionDescriptor};
use std::sync::Arc;

/// Builder for struct descriptors. Fields keep insertion order, which is
/// also their wire order.
#[derive(Debug, Default)]
pub struct StructBuilder {
    fields: Vec<FieldDescriptor>,
    nullable: bool,
}

impl StructBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, type_desc: impl Into<Arc<Descriptor>>) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, Descriptor::string())
    }

    /// Add a fixed-width char field.
    pub fn char_field(self, name: impl Into<String>, bytes: usize) -> Self {
        self.field(name, Descriptor::char(bytes))
    }

    /// Add a nullable field.
    pub fn optional_field(self, name: impl Into<String>, type_desc: Descriptor) -> Self {
        self.field(name, type_desc.nullable())
    }

    /// Make the struct itself nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Build the struct layout alone (for union variants).
    pub fn into_struct(self) -> StructDescriptor {
        StructDescriptor::new(self.fields)
    }

    /// Build the descriptor.
    pub fn build(self) -> Descriptor {
        let nullable = self.nullable;
        let mut desc = Descriptor::from(self.into_struct());
        desc.nullable = nullable;
        desc
    }
}

impl From<StructBuilder> for StructDescriptor {
    fn from(builder: StructBuilder) -> Self {
        builder.into_struct()
    }
}

/// Builder for union descriptors.
#[derive(Debug)]
pub struct UnionBuilder {
    union: UnionDescriptor,
    nullable: bool,
}

impl UnionBuilder {
    /// Create a builder discriminated by `tag_field`.
    pub fn new(tag_field: impl Into<String>) -> Self {
        Self {
            union: UnionDescriptor::new(tag_field),
            nullable: false,
        }
    }

    /// Add (or replace) the variant selected by `tag`.
    pub fn variant(mut self, tag: u8, layout: impl Into<StructDescriptor>) -> Self {
        self.union.variants.insert(tag, layout.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> Descriptor {
        let mut desc = Descriptor::from(self.union);
        desc.nullable = self.nullable;
        desc
    }
}
