// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Layout descriptors.
//!
//! A [`Descriptor`] is the immutable layout specification for one type. The
//! set of kinds is closed: integer, float, fixed-width char, string, UUID,
//! boolean, byte buffer, fixed array, vector, map, struct and tagged union.
//! Any descriptor may be nullable, which prepends a one-byte presence flag.
//!
//! Descriptors are built once (usually from generated code or a JSON literal)
//! and shared behind `Arc` afterwards.

mod builder;
#[cfg(feature = "literals")]
pub mod literal;

pub use builder::{StructBuilder, UnionBuilder};

use crate::config::{ByteLengths, UUID_SIZE};
use crate::error::{Result, ViewError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Integer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntBits {
    B8,
    B16,
    B32,
    B64,
}

impl IntBits {
    /// Width for a bit count (8, 16, 32 or 64).
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::B8),
            16 => Some(Self::B16),
            32 => Some(Self::B32),
            64 => Some(Self::B64),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::B8 => ByteLengths::INT8,
            Self::B16 => ByteLengths::INT16,
            Self::B32 => ByteLengths::INT32,
            Self::B64 => ByteLengths::INT64,
        }
    }
}

/// IEEE-754 width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatBits {
    B32,
    B64,
}

impl FloatBits {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Self::B32),
            64 => Some(Self::B64),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::B32 => ByteLengths::INT32,
            Self::B64 => ByteLengths::INT64,
        }
    }
}

/// Descriptor kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorKind {
    /// Fixed-width integer.
    Integer { signed: bool, bits: IntBits },
    /// IEEE-754 float.
    Float { bits: FloatBits },
    /// Fixed-width UTF-8 text slot, truncated or NUL-padded to `bytes`.
    Char { bytes: usize },
    /// Length-prefixed UTF-8 text.
    String,
    /// 16 raw bytes.
    Uuid,
    /// One byte, 0 or 1. `value` marks a literal used as a discriminant.
    Bool { value: Option<bool> },
    /// Length-prefixed opaque bytes.
    Buffer,
    /// Fixed count of fixed-size items, no header.
    Array(ArrayDescriptor),
    /// Variable count of items behind a count/offset header.
    Vector(VectorDescriptor),
    /// Variable count of key/value entries.
    Map(MapDescriptor),
    /// Ordered named fields behind an offset header.
    Struct(StructDescriptor),
    /// One-byte tag selecting a struct layout.
    Union(UnionDescriptor),
}

impl DescriptorKind {
    /// Short kind name, as used in descriptor literals.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer { .. } => "integer",
            Self::Float { .. } => "float",
            Self::Char { .. } => "char",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Bool { .. } => "bool",
            Self::Buffer => "buffer",
            Self::Array(_) => "array",
            Self::Vector(_) => "vector",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
            Self::Union(_) => "union",
        }
    }

    /// Encoded size when it depends only on the descriptor.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Integer { bits, .. } => Some(bits.bytes()),
            Self::Float { bits } => Some(bits.bytes()),
            Self::Char { bytes } => Some(*bytes),
            Self::Uuid => Some(UUID_SIZE),
            Self::Bool { .. } => Some(ByteLengths::INT8),
            Self::Array(arr) => arr.byte_size(),
            Self::String | Self::Buffer | Self::Vector(_) | Self::Map(_) => None,
            Self::Struct(_) | Self::Union(_) => None,
        }
    }
}

/// A complete descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Layout kind.
    pub kind: DescriptorKind,
    /// Prepend a presence flag; absent values occupy only the flag.
    pub nullable: bool,
}

impl Descriptor {
    /// Create a non-nullable descriptor.
    pub fn new(kind: DescriptorKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    pub fn integer(signed: bool, bits: IntBits) -> Self {
        Self::new(DescriptorKind::Integer { signed, bits })
    }

    pub fn uint8() -> Self {
        Self::integer(false, IntBits::B8)
    }

    pub fn uint16() -> Self {
        Self::integer(false, IntBits::B16)
    }

    pub fn uint32() -> Self {
        Self::integer(false, IntBits::B32)
    }

    pub fn uint64() -> Self {
        Self::integer(false, IntBits::B64)
    }

    pub fn int8() -> Self {
        Self::integer(true, IntBits::B8)
    }

    pub fn int16() -> Self {
        Self::integer(true, IntBits::B16)
    }

    pub fn int32() -> Self {
        Self::integer(true, IntBits::B32)
    }

    pub fn int64() -> Self {
        Self::integer(true, IntBits::B64)
    }

    pub fn float32() -> Self {
        Self::new(DescriptorKind::Float {
            bits: FloatBits::B32,
        })
    }

    pub fn float64() -> Self {
        Self::new(DescriptorKind::Float {
            bits: FloatBits::B64,
        })
    }

    /// Fixed-width text slot of `bytes` UTF-8 bytes.
    pub fn char(bytes: usize) -> Self {
        Self::new(DescriptorKind::Char { bytes })
    }

    pub fn string() -> Self {
        Self::new(DescriptorKind::String)
    }

    pub fn uuid() -> Self {
        Self::new(DescriptorKind::Uuid)
    }

    pub fn boolean() -> Self {
        Self::new(DescriptorKind::Bool { value: None })
    }

    /// Boolean literal (discriminant).
    pub fn bool_literal(value: bool) -> Self {
        Self::new(DescriptorKind::Bool { value: Some(value) })
    }

    pub fn buffer() -> Self {
        Self::new(DescriptorKind::Buffer)
    }

    pub fn array(size: usize, items: impl Into<Arc<Descriptor>>) -> Self {
        Self::new(DescriptorKind::Array(ArrayDescriptor::new(size, items)))
    }

    pub fn vector(items: impl Into<Arc<Descriptor>>) -> Self {
        Self::new(DescriptorKind::Vector(VectorDescriptor::new(items)))
    }

    pub fn map(key: impl Into<Arc<Descriptor>>, value: impl Into<Arc<Descriptor>>) -> Self {
        Self::new(DescriptorKind::Map(MapDescriptor::new(key, value)))
    }

    /// Start a struct descriptor.
    pub fn struct_builder() -> StructBuilder {
        StructBuilder::new()
    }

    /// Start a union descriptor discriminated by `tag_field`.
    pub fn union_builder(tag_field: impl Into<String>) -> UnionBuilder {
        UnionBuilder::new(tag_field)
    }

    /// Mark as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Nullable copy of this descriptor; `self` is left untouched.
    pub fn to_nullable(&self) -> Self {
        self.clone().nullable()
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// True for kinds whose size never depends on the value (integer, float,
    /// char, bool, uuid, array). Nullability is checked separately.
    pub fn is_fixed_length(&self) -> bool {
        self.kind.fixed_size().is_some()
    }

    /// Encoded size when it depends only on the descriptor, including the
    /// presence flag. Nullable descriptors are never fixed: an absent value
    /// occupies one byte.
    pub fn fixed_size(&self) -> Option<usize> {
        if self.nullable {
            None
        } else {
            self.kind.fixed_size()
        }
    }

    /// Get struct layout if this is a struct.
    pub fn as_struct(&self) -> Option<&StructDescriptor> {
        match &self.kind {
            DescriptorKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Get union layout if this is a union.
    pub fn as_union(&self) -> Option<&UnionDescriptor> {
        match &self.kind {
            DescriptorKind::Union(u) => Some(u),
            _ => None,
        }
    }

    /// Verify the descriptor tree describes a layout the codec supports.
    pub fn check(&self) -> Result<()> {
        match &self.kind {
            DescriptorKind::Char { bytes } if *bytes == 0 => {
                Err(ViewError::UnsupportedKind("char width must be non-zero".into()))
            }
            DescriptorKind::Array(arr) => {
                arr.items.check()?;
                if arr.items.fixed_size().is_none() {
                    return Err(ViewError::UnsupportedKind(format!(
                        "array items must be fixed-length and non-nullable, found {}{}",
                        if arr.items.nullable { "nullable " } else { "" },
                        arr.items.kind_name()
                    )));
                }
                if arr.byte_size().is_none() {
                    return Err(ViewError::UnsupportedKind(format!(
                        "array of {} {} items overflows the addressable size",
                        arr.size,
                        arr.items.kind_name()
                    )));
                }
                Ok(())
            }
            DescriptorKind::Vector(vec) => vec.items.check(),
            DescriptorKind::Map(map) => {
                let string_like = matches!(
                    map.key.kind,
                    DescriptorKind::String | DescriptorKind::Char { .. }
                );
                if !string_like || map.key.nullable {
                    return Err(ViewError::UnsupportedKind(format!(
                        "map keys must be non-nullable string or char, found {}",
                        map.key.kind_name()
                    )));
                }
                map.key.check()?;
                map.value.check()
            }
            DescriptorKind::Struct(s) => s.check(),
            DescriptorKind::Union(u) => {
                for (tag, variant) in &u.variants {
                    if variant.field(&u.tag_field).is_none() {
                        return Err(ViewError::UnsupportedKind(format!(
                            "union variant {} does not declare tag field `{}`",
                            tag, u.tag_field
                        )));
                    }
                    variant.check()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl From<StructDescriptor> for Descriptor {
    fn from(s: StructDescriptor) -> Self {
        Self::new(DescriptorKind::Struct(s))
    }
}

impl From<UnionDescriptor> for Descriptor {
    fn from(u: UnionDescriptor) -> Self {
        Self::new(DescriptorKind::Union(u))
    }
}

/// Array descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element count.
    pub size: usize,
    /// Element layout (fixed-length).
    pub items: Arc<Descriptor>,
}

impl ArrayDescriptor {
    pub fn new(size: usize, items: impl Into<Arc<Descriptor>>) -> Self {
        Self {
            size,
            items: items.into(),
        }
    }

    /// Byte distance between consecutive elements. `None` when the items
    /// are not fixed-length or the whole array would not fit in `usize`.
    pub fn stride(&self) -> Option<usize> {
        self.byte_size().and(self.items.fixed_size())
    }

    /// Total encoded size, `size * stride`.
    pub fn byte_size(&self) -> Option<usize> {
        self.items
            .fixed_size()
            .and_then(|item| item.checked_mul(self.size))
    }
}

/// Vector descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDescriptor {
    pub items: Arc<Descriptor>,
}

impl VectorDescriptor {
    pub fn new(items: impl Into<Arc<Descriptor>>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

/// Map descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    /// String-like key layout.
    pub key: Arc<Descriptor>,
    pub value: Arc<Descriptor>,
}

impl MapDescriptor {
    pub fn new(key: impl Into<Arc<Descriptor>>, value: impl Into<Arc<Descriptor>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field layout.
    pub type_desc: Arc<Descriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_desc: impl Into<Arc<Descriptor>>) -> Self {
        Self {
            name: name.into(),
            type_desc: type_desc.into(),
        }
    }
}

/// Struct descriptor: fields in declared (wire) order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructDescriptor {
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn check(&self) -> Result<()> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(ViewError::UnsupportedKind(format!(
                    "duplicate struct field `{}`",
                    field.name
                )));
            }
            field.type_desc.check()?;
        }
        Ok(())
    }
}

/// Union descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDescriptor {
    /// Struct property holding the discriminant.
    pub tag_field: String,
    /// Struct layout per tag value.
    pub variants: BTreeMap<u8, StructDescriptor>,
}

impl UnionDescriptor {
    pub fn new(tag_field: impl Into<String>) -> Self {
        Self {
            tag_field: tag_field.into(),
            variants: BTreeMap::new(),
        }
    }

    /// Get variant by tag.
    pub fn variant(&self, tag: u8) -> Option<&StructDescriptor> {
        self.variants.get(&tag)
    }
}
