// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoder: writes a value into a pre-sized buffer.

use super::cursor::CursorMut;
use super::size::key_length;
use super::{
    byte_length, expect_list, expect_map, expect_str, expect_struct, field_value, header_u32,
    mismatch, union_variant,
};
use crate::config::{ABSENT, OFFSET_SIZE, PRESENT};
use crate::descriptor::{Descriptor, DescriptorKind, FloatBits, IntBits, StructDescriptor};
use crate::error::{Result, ViewError};
use crate::value::Value;

/// Encode `value` under `desc` into a freshly allocated buffer of exactly
/// [`byte_length`] bytes.
pub fn encode(desc: &Descriptor, value: &Value) -> Result<Vec<u8>> {
    let len = byte_length(desc, value)?;
    let mut buf = vec![0u8; len];
    let mut cursor = CursorMut::new(&mut buf);
    encode_into(desc, value, &mut cursor)?;
    debug_assert_eq!(cursor.offset(), len);
    log::trace!("[codec] encoded {} ({} bytes)", desc.kind_name(), len);
    Ok(buf)
}

/// Encode `value` at the cursor position, advancing it by exactly
/// `byte_length(desc, value)` bytes.
pub fn encode_into(desc: &Descriptor, value: &Value, cursor: &mut CursorMut<'_>) -> Result<()> {
    if desc.nullable {
        if value.is_null() {
            return cursor.write_u8(ABSENT);
        }
        cursor.write_u8(PRESENT)?;
    }

    match &desc.kind {
        DescriptorKind::Integer { signed, bits } => encode_integer(*signed, *bits, value, cursor),
        DescriptorKind::Float { bits } => {
            let v = match value {
                Value::Float(v) => *v,
                Value::Int(v) => *v as f64,
                Value::UInt(v) => *v as f64,
                other => return Err(mismatch("float", other)),
            };
            match bits {
                FloatBits::B32 => cursor.write_f32_le(v as f32),
                FloatBits::B64 => cursor.write_f64_le(v),
            }
        }
        DescriptorKind::Char { bytes } => write_char(*bytes, expect_str(value, "char")?, cursor),
        DescriptorKind::String => write_string(expect_str(value, "string")?, cursor),
        DescriptorKind::Uuid => {
            let uuid = uuid::Uuid::parse_str(expect_str(value, "uuid")?)?;
            cursor.write_bytes(uuid.as_bytes())
        }
        DescriptorKind::Bool { .. } => {
            let b = value.as_bool().ok_or_else(|| mismatch("bool", value))?;
            cursor.write_u8(u8::from(b))
        }
        DescriptorKind::Buffer => {
            let bytes = value.as_bytes().ok_or_else(|| mismatch("bytes", value))?;
            cursor.write_u32_le(header_u32(bytes.len())?)?;
            cursor.write_bytes(bytes)
        }
        DescriptorKind::Array(arr) => {
            let items = expect_list(value, "array")?;
            if items.len() != arr.size {
                return Err(ViewError::InvalidData(format!(
                    "array length mismatch: expected {}, got {}",
                    arr.size,
                    items.len()
                )));
            }
            for item in items {
                encode_into(&arr.items, item, cursor)?;
            }
            Ok(())
        }
        DescriptorKind::Vector(vec) => {
            let items = expect_list(value, "vector")?;
            cursor.write_u32_le(header_u32(items.len())?)?;

            let mut offset = OFFSET_SIZE + items.len() * OFFSET_SIZE;
            for item in items {
                cursor.write_u32_le(header_u32(offset)?)?;
                offset += byte_length(&vec.items, item)?;
            }
            for item in items {
                encode_into(&vec.items, item, cursor)?;
            }
            Ok(())
        }
        DescriptorKind::Map(map) => {
            let entries = expect_map(value)?;
            cursor.write_u32_le(header_u32(entries.len())?)?;

            let mut offset = OFFSET_SIZE;
            for (key, _) in entries {
                offset += key_length(&map.key.kind, key)? + OFFSET_SIZE;
            }
            for (key, entry) in entries {
                write_key(&map.key.kind, key, cursor)?;
                cursor.write_u32_le(header_u32(offset)?)?;
                offset += byte_length(&map.value, entry)?;
            }
            for (_, entry) in entries {
                encode_into(&map.value, entry, cursor)?;
            }
            Ok(())
        }
        DescriptorKind::Struct(s) => encode_struct(s, value, cursor),
        DescriptorKind::Union(u) => {
            let (tag, variant) = union_variant(u, value)?;
            cursor.write_u8(tag)?;
            encode_struct(variant, value, cursor)
        }
    }
}

fn encode_struct(layout: &StructDescriptor, value: &Value, cursor: &mut CursorMut<'_>) -> Result<()> {
    let fields = expect_struct(value)?;

    let mut offset = layout.len() * OFFSET_SIZE;
    for field in &layout.fields {
        cursor.write_u32_le(header_u32(offset)?)?;
        offset += byte_length(&field.type_desc, field_value(fields, field)?)?;
    }
    for field in &layout.fields {
        encode_into(&field.type_desc, field_value(fields, field)?, cursor)?;
    }
    Ok(())
}

fn encode_integer(signed: bool, bits: IntBits, value: &Value, cursor: &mut CursorMut<'_>) -> Result<()> {
    match (signed, bits) {
        (false, IntBits::B8) => cursor.write_u8(narrow(value, "uint8")?),
        (false, IntBits::B16) => cursor.write_u16_le(narrow(value, "uint16")?),
        (false, IntBits::B32) => cursor.write_u32_le(narrow(value, "uint32")?),
        (false, IntBits::B64) => cursor.write_u64_le(narrow(value, "uint64")?),
        (true, IntBits::B8) => cursor.write_i8(narrow(value, "int8")?),
        (true, IntBits::B16) => cursor.write_i16_le(narrow(value, "int16")?),
        (true, IntBits::B32) => cursor.write_i32_le(narrow(value, "int32")?),
        (true, IntBits::B64) => cursor.write_i64_le(narrow(value, "int64")?),
    }
}

/// Narrow either integer variant to the declared width.
fn narrow<T>(value: &Value, target: &str) -> Result<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let narrowed = match value {
        Value::Int(v) => T::try_from(*v).ok(),
        Value::UInt(v) => T::try_from(*v).ok(),
        other => return Err(mismatch("integer", other)),
    };
    narrowed.ok_or_else(|| ViewError::OutOfRange {
        value: match value {
            Value::Int(v) => v.to_string(),
            Value::UInt(v) => v.to_string(),
            _ => String::new(),
        },
        target: target.to_string(),
    })
}

/// Write `text` into a `width`-byte slot: truncated at a code point boundary,
/// NUL-padded to the full width.
fn write_char(width: usize, text: &str, cursor: &mut CursorMut<'_>) -> Result<()> {
    let mut end = text.len().min(width);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    cursor.write_bytes(&text.as_bytes()[..end])?;
    cursor.write_zeros(width - end)
}

fn write_string(text: &str, cursor: &mut CursorMut<'_>) -> Result<()> {
    cursor.write_u32_le(header_u32(text.len())?)?;
    cursor.write_bytes(text.as_bytes())
}

fn write_key(kind: &DescriptorKind, key: &str, cursor: &mut CursorMut<'_>) -> Result<()> {
    match kind {
        DescriptorKind::Char { bytes } => write_char(*bytes, key, cursor),
        DescriptorKind::String => write_string(key, cursor),
        other => Err(ViewError::UnsupportedKind(format!(
            "map key of kind {}",
            other.name()
        ))),
    }
}
