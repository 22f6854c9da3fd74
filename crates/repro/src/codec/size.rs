// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoded size calculation.

use super::{
    expect_list, expect_map, expect_str, expect_struct, field_value, mismatch, union_variant,
};
use crate::config::{OFFSET_SIZE, PRESENCE_SIZE, TAG_SIZE};
use crate::descriptor::{Descriptor, DescriptorKind, StructDescriptor};
use crate::error::{Result, ViewError};
use crate::value::Value;

/// Exact number of bytes `value` occupies when encoded under `desc`.
///
/// Fixed-length kinds are sized from the descriptor alone; strings, buffers
/// and containers inspect the value.
pub fn byte_length(desc: &Descriptor, value: &Value) -> Result<usize> {
    if desc.nullable {
        if value.is_null() {
            return Ok(PRESENCE_SIZE);
        }
        return Ok(PRESENCE_SIZE + data_length(&desc.kind, value)?);
    }
    data_length(&desc.kind, value)
}

fn data_length(kind: &DescriptorKind, value: &Value) -> Result<usize> {
    if let Some(size) = kind.fixed_size() {
        return Ok(size);
    }

    match kind {
        DescriptorKind::String => Ok(OFFSET_SIZE + expect_str(value, "string")?.len()),
        DescriptorKind::Buffer => value
            .as_bytes()
            .map(|bytes| OFFSET_SIZE + bytes.len())
            .ok_or_else(|| mismatch("bytes", value)),
        DescriptorKind::Vector(vec) => {
            let items = expect_list(value, "vector")?;
            let mut total = OFFSET_SIZE + items.len() * OFFSET_SIZE;
            for item in items {
                total += byte_length(&vec.items, item)?;
            }
            Ok(total)
        }
        DescriptorKind::Map(map) => {
            let entries = expect_map(value)?;
            let mut total = OFFSET_SIZE;
            for (key, entry) in entries {
                total += key_length(&map.key.kind, key)? + OFFSET_SIZE;
                total += byte_length(&map.value, entry)?;
            }
            Ok(total)
        }
        DescriptorKind::Struct(s) => struct_length(s, value),
        DescriptorKind::Union(u) => {
            let (_, variant) = union_variant(u, value)?;
            Ok(TAG_SIZE + struct_length(variant, value)?)
        }
        other => Err(ViewError::UnsupportedKind(format!(
            "{} without a fixed size",
            other.name()
        ))),
    }
}

/// Header plus payload size of a struct layout.
pub(crate) fn struct_length(layout: &StructDescriptor, value: &Value) -> Result<usize> {
    let fields = expect_struct(value)?;
    let mut total = layout.len() * OFFSET_SIZE;
    for field in &layout.fields {
        total += byte_length(&field.type_desc, field_value(fields, field)?)?;
    }
    Ok(total)
}

/// Size of a map key slot.
pub(crate) fn key_length(kind: &DescriptorKind, key: &str) -> Result<usize> {
    match kind {
        DescriptorKind::Char { bytes } => Ok(*bytes),
        DescriptorKind::String => Ok(OFFSET_SIZE + key.len()),
        other => Err(ViewError::UnsupportedKind(format!(
            "map key of kind {}",
            other.name()
        ))),
    }
}
