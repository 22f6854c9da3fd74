// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lazy vector and array access.

use super::{over, Lazy};
use crate::codec::cursor::read_u32_at;
use crate::codec::vector_item_offset;
use crate::descriptor::{ArrayDescriptor, Descriptor};
use crate::error::{Result, ViewError};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Addressing {
    /// Per-item offsets in the vector header.
    OffsetTable,
    /// `index * stride` from the array start.
    Stride(usize),
}

/// Fixed-length list shell whose items decode on access.
#[derive(Debug, Clone, Copy)]
pub struct LazyList<'a> {
    items: &'a Descriptor,
    bytes: &'a [u8],
    base: usize,
    len: usize,
    addressing: Addressing,
}

impl<'a> LazyList<'a> {
    /// Vector at `base`; reads the count only.
    pub(crate) fn vector(items: &'a Descriptor, bytes: &'a [u8], base: usize) -> Result<Self> {
        let len = read_u32_at(bytes, base)?;
        Ok(Self {
            items,
            bytes,
            base,
            len,
            addressing: Addressing::OffsetTable,
        })
    }

    /// Array at `base`; length and stride come from the descriptor.
    pub(crate) fn array(arr: &'a ArrayDescriptor, bytes: &'a [u8], base: usize) -> Result<Self> {
        let stride = arr.stride().ok_or_else(|| {
            ViewError::UnsupportedKind(format!(
                "array of variable-length {}",
                arr.items.kind_name()
            ))
        })?;
        Ok(Self {
            items: &arr.items,
            bytes,
            base,
            len: arr.size,
            addressing: Addressing::Stride(stride),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Item descriptor.
    pub fn items(&self) -> &'a Descriptor {
        self.items
    }

    /// Decode item `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Result<Option<Lazy<'a>>> {
        if index >= self.len {
            return Ok(None);
        }
        self.item(index).map(Some)
    }

    fn item(&self, index: usize) -> Result<Lazy<'a>> {
        let at = match self.addressing {
            Addressing::OffsetTable => vector_item_offset(self.bytes, self.base, index)?,
            Addressing::Stride(stride) => {
                self.base
                    .checked_add(index * stride)
                    .ok_or(ViewError::OutOfBounds {
                        offset: self.base,
                        need: index * stride,
                        have: self.bytes.len(),
                    })?
            }
        };
        over(self.items, self.bytes, at)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Lazy<'a>>> + 'a {
        let this = *self;
        (0..self.len).map(move |index| this.item(index))
    }

    pub fn to_value(&self) -> Result<Value> {
        self.iter()
            .map(|item| item?.to_value())
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }
}
