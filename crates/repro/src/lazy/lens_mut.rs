// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-place writes through a mutable lens.
//!
//! Only fields whose encoded size cannot change may be overwritten: the
//! field must be fixed-length and non-nullable, and must not be the tag of a
//! union variant (changing it would reinterpret the rest of the bytes).

use super::{over, Lazy};
use crate::codec::{
    encode, read_tag, struct_field_offset, vector_item_offset, Cursor, CursorMut,
};
use crate::config::{ABSENT, OFFSET_SIZE, PRESENCE_SIZE, TAG_SIZE};
use crate::descriptor::{Descriptor, DescriptorKind, StructDescriptor};
use crate::error::{Result, ViewError};
use crate::value::Value;

/// Mutable lens over a struct or union inside a borrowed buffer.
#[derive(Debug)]
pub struct LensMut<'a> {
    descriptor: &'a Descriptor,
    bytes: &'a mut [u8],
    offset: usize,
}

/// Struct layout resolved at the lens position.
struct Resolved<'d> {
    layout: &'d StructDescriptor,
    base: usize,
    tag_field: Option<&'d str>,
}

impl<'a> LensMut<'a> {
    /// Lens over the whole buffer.
    pub fn new(descriptor: &'a Descriptor, bytes: &'a mut [u8]) -> Self {
        log::trace!(
            "[lazy] over_mut {} ({} bytes)",
            descriptor.kind_name(),
            bytes.len()
        );
        Self {
            descriptor,
            bytes,
            offset: 0,
        }
    }

    pub fn descriptor(&self) -> &'a Descriptor {
        self.descriptor
    }

    pub fn as_bytes(&self) -> &[u8] {
        &*self.bytes
    }

    /// Read-only view of the current position.
    pub fn lazy(&self) -> Result<Lazy<'_>> {
        over(self.descriptor, &*self.bytes, self.offset)
    }

    pub fn to_value(&self) -> Result<Value> {
        self.lazy()?.to_value()
    }

    /// Decode field `name` of the struct at this position.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.lazy()?.field(name)?.to_value()
    }

    fn resolve(&self) -> Result<Resolved<'a>> {
        let descriptor: &'a Descriptor = self.descriptor;
        let mut base = self.offset;
        if descriptor.nullable {
            if Cursor::at(&*self.bytes, base)?.read_u8()? == ABSENT {
                return Err(ViewError::TypeMismatch {
                    expected: "struct".into(),
                    found: "null".into(),
                });
            }
            base += PRESENCE_SIZE;
        }

        match &descriptor.kind {
            DescriptorKind::Struct(layout) => Ok(Resolved {
                layout,
                base,
                tag_field: None,
            }),
            DescriptorKind::Union(union) => {
                let tag = read_tag(&*self.bytes, base)?;
                let layout = union.variant(tag).ok_or(ViewError::UnknownTag(tag))?;
                Ok(Resolved {
                    layout,
                    base: base + TAG_SIZE,
                    tag_field: Some(union.tag_field.as_str()),
                })
            }
            other => Err(ViewError::TypeMismatch {
                expected: "struct".into(),
                found: other.name().into(),
            }),
        }
    }

    /// Overwrite field `name` in place.
    ///
    /// Fails with [`ViewError::TagField`], [`ViewError::VariableLengthField`]
    /// or [`ViewError::NullableField`], checked in that order, when the field
    /// cannot be rewritten without moving bytes. The buffer is left untouched
    /// on any error.
    pub fn set(&mut self, name: &str, value: &Value) -> Result<()> {
        let resolved = self.resolve()?;
        let index = resolved
            .layout
            .field_index(name)
            .ok_or_else(|| ViewError::UnknownField(name.to_string()))?;
        let field_desc = &resolved.layout.fields[index].type_desc;

        let rejection = if resolved.tag_field == Some(name) {
            Some(ViewError::TagField(name.to_string()))
        } else if !field_desc.is_fixed_length() {
            Some(ViewError::VariableLengthField(name.to_string()))
        } else if field_desc.nullable {
            Some(ViewError::NullableField(name.to_string()))
        } else {
            None
        };
        if let Some(err) = rejection {
            log::debug!("[lazy] rejected write: {}", err);
            return Err(err);
        }

        let at = struct_field_offset(&*self.bytes, resolved.base, index)?;
        let encoded = encode(field_desc, value)?;
        CursorMut::at(&mut *self.bytes, at)?.write_bytes(&encoded)
    }

    /// Mutable lens over the struct or union held in field `name`.
    pub fn field_mut(&mut self, name: &str) -> Result<LensMut<'_>> {
        let resolved = self.resolve()?;
        let index = resolved
            .layout
            .field_index(name)
            .ok_or_else(|| ViewError::UnknownField(name.to_string()))?;
        let offset = struct_field_offset(&*self.bytes, resolved.base, index)?;
        Ok(LensMut {
            descriptor: &resolved.layout.fields[index].type_desc,
            bytes: &mut *self.bytes,
            offset,
        })
    }

    /// Mutable lens over item `index` of the vector at this position.
    pub fn item_mut(&mut self, index: usize) -> Result<LensMut<'_>> {
        let descriptor: &'a Descriptor = self.descriptor;
        let DescriptorKind::Vector(vec) = &descriptor.kind else {
            return Err(ViewError::TypeMismatch {
                expected: "vector".into(),
                found: descriptor.kind_name().into(),
            });
        };
        let mut base = self.offset;
        if descriptor.nullable {
            base += PRESENCE_SIZE;
        }

        // Absent nullable vectors count as empty.
        let len = self.lazy()?.as_list().map_or(0, |l| l.len());
        if index >= len {
            return Err(ViewError::OutOfBounds {
                offset: base + OFFSET_SIZE + index * OFFSET_SIZE,
                need: OFFSET_SIZE,
                have: 0,
            });
        }
        let offset = vector_item_offset(&*self.bytes, base, index)?;
        Ok(LensMut {
            descriptor: &vec.items,
            bytes: &mut *self.bytes,
            offset,
        })
    }
}
