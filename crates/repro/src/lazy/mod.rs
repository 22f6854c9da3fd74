// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lazy decoding over an encoded buffer.
//!
//! [`over`] returns a [`Lazy`] that borrows the buffer and decodes nothing
//! up front beyond container headers. Primitives decode immediately (there is
//! nothing to defer); structs, unions, vectors, arrays and maps become
//! accessor tables that decode one sub-region per access:
//!
//! - [`LazyStruct`] re-reads the field offset from the header on every access.
//! - [`LazyList`] addresses items through the vector offset table, or by
//!   `index * stride` for arrays.
//! - [`LazyMap`] decodes its keys once and each value on access.
//!
//! [`Lens`] is the root of such a tree: it keeps the backing slice so the
//! view can hand it back on re-encode instead of serializing again.
//! [`LensMut`] adds in-place writes for fixed-length fields.

mod lens_mut;
mod list;
mod map;
mod record;

pub use lens_mut::LensMut;
pub use list::LazyList;
pub use map::LazyMap;
pub use record::LazyStruct;

use crate::codec::{decode_at, read_tag, Cursor};
use crate::config::{ABSENT, PRESENCE_SIZE, TAG_SIZE};
use crate::descriptor::{Descriptor, DescriptorKind};
use crate::error::{Result, ViewError};
use crate::value::Value;
use std::ops::Deref;

/// A value decoded on demand from a borrowed buffer.
#[derive(Debug, Clone)]
pub enum Lazy<'a> {
    /// Primitive (or absent nullable) value, already decoded.
    Value(Value),
    /// Struct, or the selected variant of a union.
    Struct(LazyStruct<'a>),
    /// Vector or array.
    List(LazyList<'a>),
    Map(LazyMap<'a>),
}

/// Materialize the value of `desc` starting at `offset` lazily.
pub fn over<'a>(desc: &'a Descriptor, bytes: &'a [u8], offset: usize) -> Result<Lazy<'a>> {
    let container = matches!(
        desc.kind,
        DescriptorKind::Struct(_)
            | DescriptorKind::Union(_)
            | DescriptorKind::Vector(_)
            | DescriptorKind::Array(_)
            | DescriptorKind::Map(_)
    );
    if !container {
        return decode_at(desc, bytes, offset).map(Lazy::Value);
    }

    let mut offset = offset;
    if desc.nullable {
        if Cursor::at(bytes, offset)?.read_u8()? == ABSENT {
            return Ok(Lazy::Value(Value::Null));
        }
        offset += PRESENCE_SIZE;
    }

    match &desc.kind {
        DescriptorKind::Struct(s) => Ok(Lazy::Struct(LazyStruct::new(s, bytes, offset))),
        DescriptorKind::Union(u) => {
            let tag = read_tag(bytes, offset)?;
            let variant = u.variant(tag).ok_or(ViewError::UnknownTag(tag))?;
            Ok(Lazy::Struct(
                LazyStruct::new(variant, bytes, offset + TAG_SIZE).with_tag(tag),
            ))
        }
        DescriptorKind::Vector(vec) => LazyList::vector(&vec.items, bytes, offset).map(Lazy::List),
        DescriptorKind::Array(arr) => LazyList::array(arr, bytes, offset).map(Lazy::List),
        DescriptorKind::Map(map) => LazyMap::new(map, bytes, offset).map(Lazy::Map),
        other => Err(ViewError::UnsupportedKind(other.name().to_string())),
    }
}

impl<'a> Lazy<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&LazyStruct<'a>> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&LazyList<'a>> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&LazyMap<'a>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Struct field by name.
    pub fn field(&self, name: &str) -> Result<Lazy<'a>> {
        match self {
            Self::Struct(s) => s.get(name),
            other => Err(ViewError::TypeMismatch {
                expected: "struct".into(),
                found: other.kind_name().into(),
            }),
        }
    }

    /// One navigation step: a struct field, a list index or a map key.
    ///
    /// Out-of-range indices, missing keys and absent nullable values yield
    /// `None`; unknown struct fields are an error.
    pub fn get(&self, segment: &str) -> Result<Option<Lazy<'a>>> {
        match self {
            Self::Struct(s) => s.get(segment).map(Some),
            Self::List(l) => match segment.parse::<usize>() {
                Ok(index) => l.get(index),
                Err(_) => Err(ViewError::TypeMismatch {
                    expected: "list index".into(),
                    found: format!("`{}`", segment),
                }),
            },
            Self::Map(m) => m.get(segment),
            Self::Value(Value::Null) => Ok(None),
            Self::Value(v) => Err(ViewError::TypeMismatch {
                expected: "container".into(),
                found: v.type_name().into(),
            }),
        }
    }

    /// Follow a dot-separated path such as `f.f2.f2a` or `g.1`, decoding
    /// only the regions along the way.
    pub fn path(&self, path: &str) -> Result<Option<Lazy<'a>>> {
        let mut current = self.clone();
        if path.is_empty() {
            return Ok(Some(current));
        }
        for segment in path.split('.') {
            match current.get(segment)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Decode everything reachable into an owned value tree.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Self::Value(v) => Ok(v.clone()),
            Self::Struct(s) => s.to_value(),
            Self::List(l) => l.to_value(),
            Self::Map(m) => m.to_value(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Value(v) => v.type_name(),
            Self::Struct(_) => "struct",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

/// Root of a lazy value, tied to the buffer it reads from.
#[derive(Debug, Clone)]
pub struct Lens<'a> {
    descriptor: &'a Descriptor,
    bytes: &'a [u8],
    root: Lazy<'a>,
}

impl<'a> Lens<'a> {
    /// Lazily materialize the whole of `bytes` as one value of `descriptor`.
    pub fn new(descriptor: &'a Descriptor, bytes: &'a [u8]) -> Result<Self> {
        log::trace!(
            "[lazy] over {} ({} bytes)",
            descriptor.kind_name(),
            bytes.len()
        );
        let root = over(descriptor, bytes, 0)?;
        Ok(Self {
            descriptor,
            bytes,
            root,
        })
    }

    /// The encoded buffer backing this lens.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn descriptor(&self) -> &'a Descriptor {
        self.descriptor
    }

    pub fn root(&self) -> &Lazy<'a> {
        &self.root
    }
}

impl<'a> Deref for Lens<'a> {
    type Target = Lazy<'a>;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}
