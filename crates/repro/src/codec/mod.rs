// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary codec: size calculation, encoding and eager decoding.
//!
//! # Wire layout
//!
//! All multi-byte integers are little-endian; offsets and counts are u32.
//!
//! ```text
//! nullable  [flag: u8 (0 absent | 1 present)] [value if present]
//! string    [len: u32] [utf-8 bytes]
//! buffer    [len: u32] [raw bytes]
//! array     [item 0] [item 1] ...                     (fixed-size items)
//! vector    [count: u32] [off 0: u32] ... [item 0] [item 1] ...
//! map       [count: u32] [key 0] [off 0: u32] ... [value 0] [value 1] ...
//! struct    [off 0: u32] ... [field 0] [field 1] ...
//! union     [tag: u8] [struct]
//! ```
//!
//! Container offsets are relative to the container's own start (for unions,
//! the byte after the tag). Encoding is two-pass: [`byte_length`] measures,
//! then [`encode_into`] writes into a destination of exactly that size.

pub mod cursor;
mod decode;
mod encode;
mod size;

pub use cursor::{Cursor, CursorMut};
pub use decode::{decode, decode_at};
pub use encode::{encode, encode_into};
pub use size::byte_length;

pub(crate) use decode::{map_entries, read_tag, struct_field_offset, vector_item_offset};

use crate::descriptor::{FieldDescriptor, StructDescriptor, UnionDescriptor};
use crate::error::{Result, ViewError};
use crate::value::Value;
use std::collections::HashMap;

static NULL: Value = Value::Null;

pub(crate) fn mismatch(expected: &str, found: &Value) -> ViewError {
    ViewError::TypeMismatch {
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

pub(crate) fn expect_str<'v>(value: &'v Value, expected: &str) -> Result<&'v str> {
    value.as_str().ok_or_else(|| mismatch(expected, value))
}

pub(crate) fn expect_list<'v>(value: &'v Value, expected: &str) -> Result<&'v [Value]> {
    value.as_list().ok_or_else(|| mismatch(expected, value))
}

pub(crate) fn expect_map(value: &Value) -> Result<&[(String, Value)]> {
    value.as_map().ok_or_else(|| mismatch("map", value))
}

pub(crate) fn expect_struct(value: &Value) -> Result<&HashMap<String, Value>> {
    match value {
        Value::Struct(fields) => Ok(fields),
        other => Err(mismatch("struct", other)),
    }
}

/// Value of a declared field. Absent keys read as null for nullable fields.
pub(crate) fn field_value<'v>(
    fields: &'v HashMap<String, Value>,
    field: &FieldDescriptor,
) -> Result<&'v Value> {
    match fields.get(&field.name) {
        Some(value) => Ok(value),
        None if field.type_desc.nullable => Ok(&NULL),
        None => Err(ViewError::MissingField(field.name.clone())),
    }
}

/// Discriminant carried by a value's tag field.
pub(crate) fn tag_of(value: &Value) -> Result<u8> {
    match value {
        Value::Bool(b) => Ok(u8::from(*b)),
        Value::Int(_) | Value::UInt(_) => value
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| ViewError::OutOfRange {
                value: format!("{:?}", value),
                target: "union tag (u8)".into(),
            }),
        other => Err(mismatch("integer tag", other)),
    }
}

/// Select the union variant named by the value's tag field.
pub(crate) fn union_variant<'d>(
    union: &'d UnionDescriptor,
    value: &Value,
) -> Result<(u8, &'d StructDescriptor)> {
    let fields = expect_struct(value)?;
    let tag_value = fields
        .get(&union.tag_field)
        .ok_or_else(|| ViewError::MissingField(union.tag_field.clone()))?;
    let tag = tag_of(tag_value)?;
    let variant = union.variant(tag).ok_or(ViewError::UnknownTag(tag))?;
    Ok((tag, variant))
}

/// Convert a byte count into a u32 header slot.
pub(crate) fn header_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| ViewError::OutOfRange {
        value: len.to_string(),
        target: "u32 header".into(),
    })
}
