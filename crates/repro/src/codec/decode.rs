// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Eager decoder: materializes a full [`Value`] tree.
//!
//! The header helpers at the bottom are shared with the lazy views, which
//! resolve the same offsets without decoding the payloads.

use super::cursor::{read_u32_at, Cursor};
use crate::config::{ABSENT, OFFSET_SIZE, PRESENCE_SIZE, TAG_SIZE, UUID_SIZE};
use crate::descriptor::{Descriptor, DescriptorKind, FloatBits, IntBits, MapDescriptor, StructDescriptor};
use crate::error::{Result, ViewError};
use crate::value::Value;
use std::collections::HashMap;

/// Decode a whole buffer holding one value of `desc`.
pub fn decode(desc: &Descriptor, bytes: &[u8]) -> Result<Value> {
    log::trace!("[codec] decode {} from {} bytes", desc.kind_name(), bytes.len());
    decode_at(desc, bytes, 0)
}

/// Decode the value of `desc` that starts at absolute `offset`.
pub fn decode_at(desc: &Descriptor, bytes: &[u8], offset: usize) -> Result<Value> {
    let mut offset = offset;
    if desc.nullable {
        if Cursor::at(bytes, offset)?.read_u8()? == ABSENT {
            return Ok(Value::Null);
        }
        offset += PRESENCE_SIZE;
    }
    decode_kind(&desc.kind, bytes, offset)
}

fn decode_kind(kind: &DescriptorKind, bytes: &[u8], offset: usize) -> Result<Value> {
    let mut cursor = Cursor::at(bytes, offset)?;
    match kind {
        DescriptorKind::Integer { signed: false, bits } => Ok(Value::UInt(match bits {
            IntBits::B8 => u64::from(cursor.read_u8()?),
            IntBits::B16 => u64::from(cursor.read_u16_le()?),
            IntBits::B32 => u64::from(cursor.read_u32_le()?),
            IntBits::B64 => cursor.read_u64_le()?,
        })),
        DescriptorKind::Integer { signed: true, bits } => Ok(Value::Int(match bits {
            IntBits::B8 => i64::from(cursor.read_i8()?),
            IntBits::B16 => i64::from(cursor.read_i16_le()?),
            IntBits::B32 => i64::from(cursor.read_i32_le()?),
            IntBits::B64 => cursor.read_i64_le()?,
        })),
        DescriptorKind::Float { bits } => Ok(Value::Float(match bits {
            FloatBits::B32 => f64::from(cursor.read_f32_le()?),
            FloatBits::B64 => cursor.read_f64_le()?,
        })),
        DescriptorKind::Char { bytes: width } => {
            Ok(Value::String(read_char(&mut cursor, *width)?.to_string()))
        }
        DescriptorKind::String => Ok(Value::String(read_string(&mut cursor)?.to_string())),
        DescriptorKind::Uuid => {
            let raw = cursor.read_bytes(UUID_SIZE)?;
            let uuid = uuid::Uuid::from_slice(raw)?;
            Ok(Value::String(uuid.hyphenated().to_string()))
        }
        DescriptorKind::Bool { .. } => Ok(Value::Bool(cursor.read_u8()? != 0)),
        DescriptorKind::Buffer => {
            let len = cursor.read_len()?;
            Ok(Value::Bytes(cursor.read_bytes(len)?.to_vec()))
        }
        DescriptorKind::Array(arr) => {
            let stride = arr.stride().ok_or_else(|| {
                ViewError::UnsupportedKind(format!(
                    "array of variable-length {}",
                    arr.items.kind_name()
                ))
            })?;
            (0..arr.size)
                .map(|i| {
                    let at = offset.checked_add(i * stride).ok_or(ViewError::OutOfBounds {
                        offset,
                        need: i * stride,
                        have: bytes.len(),
                    })?;
                    decode_at(&arr.items, bytes, at)
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::List)
        }
        DescriptorKind::Vector(vec) => {
            let count = cursor.read_len()?;
            let mut items = Vec::with_capacity(count.min(cursor.remaining() / OFFSET_SIZE));
            for index in 0..count {
                let item = vector_item_offset(bytes, offset, index)?;
                items.push(decode_at(&vec.items, bytes, item)?);
            }
            Ok(Value::List(items))
        }
        DescriptorKind::Map(map) => {
            let entries = map_entries(map, bytes, offset)?;
            let mut out = Vec::with_capacity(entries.len());
            for (key, value_offset) in entries {
                out.push((key, decode_at(&map.value, bytes, value_offset)?));
            }
            Ok(Value::Map(out))
        }
        DescriptorKind::Struct(s) => decode_struct(s, bytes, offset),
        DescriptorKind::Union(u) => {
            let tag = read_tag(bytes, offset)?;
            let variant = u.variant(tag).ok_or(ViewError::UnknownTag(tag))?;
            decode_struct(variant, bytes, offset + TAG_SIZE)
        }
    }
}

fn decode_struct(layout: &StructDescriptor, bytes: &[u8], base: usize) -> Result<Value> {
    let mut fields = HashMap::with_capacity(layout.len());
    for (index, field) in layout.fields.iter().enumerate() {
        let at = struct_field_offset(bytes, base, index)?;
        fields.insert(field.name.clone(), decode_at(&field.type_desc, bytes, at)?);
    }
    Ok(Value::Struct(fields))
}

/// Read a char slot, dropping NUL padding.
fn read_char<'a>(cursor: &mut Cursor<'a>, width: usize) -> Result<&'a str> {
    let raw = cursor.read_bytes(width)?;
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    Ok(std::str::from_utf8(&raw[..end])?)
}

fn read_string<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str> {
    let len = cursor.read_len()?;
    Ok(std::str::from_utf8(cursor.read_bytes(len)?)?)
}

// =======================================================================
// Header helpers
// =======================================================================

/// Union discriminant at `offset`.
pub(crate) fn read_tag(bytes: &[u8], offset: usize) -> Result<u8> {
    Cursor::at(bytes, offset)?.read_u8()
}

/// Absolute position of field `index` of the struct starting at `base`.
pub(crate) fn struct_field_offset(bytes: &[u8], base: usize, index: usize) -> Result<usize> {
    Ok(base + read_u32_at(bytes, base + index * OFFSET_SIZE)?)
}

/// Absolute position of item `index` of the vector starting at `base`.
pub(crate) fn vector_item_offset(bytes: &[u8], base: usize, index: usize) -> Result<usize> {
    Ok(base + read_u32_at(bytes, base + OFFSET_SIZE + index * OFFSET_SIZE)?)
}

/// Keys and absolute value positions of the map starting at `base`, in
/// wire order.
pub(crate) fn map_entries(
    map: &MapDescriptor,
    bytes: &[u8],
    base: usize,
) -> Result<Vec<(String, usize)>> {
    let mut cursor = Cursor::at(bytes, base)?;
    let count = cursor.read_len()?;
    let mut entries = Vec::with_capacity(count.min(cursor.remaining() / OFFSET_SIZE));
    for _ in 0..count {
        let key = match map.key.kind {
            DescriptorKind::Char { bytes: width } => read_char(&mut cursor, width)?,
            DescriptorKind::String => read_string(&mut cursor)?,
            ref other => {
                return Err(ViewError::UnsupportedKind(format!(
                    "map key of kind {}",
                    other.name()
                )))
            }
        };
        let value_offset = cursor.read_len()?;
        entries.push((key.to_string(), base + value_offset));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;

    #[test]
    fn test_decode_little_endian_integers() {
        assert_eq!(
            decode(&Descriptor::uint16(), &[0x34, 0x12]),
            Ok(Value::UInt(0x1234))
        );
        assert_eq!(
            decode(&Descriptor::int16(), &[0xFE, 0xFF]),
            Ok(Value::Int(-2))
        );
    }

    #[test]
    fn test_decode_char_strips_padding() {
        assert_eq!(
            decode(&Descriptor::char(5), b"ab\0\0\0"),
            Ok(Value::from("ab"))
        );
        assert_eq!(decode(&Descriptor::char(3), b"\0\0\0"), Ok(Value::from("")));
    }

    #[test]
    fn test_decode_nullable_absent() {
        let desc = Descriptor::string().nullable();
        assert_eq!(decode(&desc, &[0]), Ok(Value::Null));
        assert_eq!(
            decode(&desc, &[1, 1, 0, 0, 0, b'x']),
            Ok(Value::from("x"))
        );
    }

    #[test]
    fn test_decode_uuid_is_hyphenated_lowercase() {
        let raw: Vec<u8> = (0u8..16).collect();
        assert_eq!(
            decode(&Descriptor::uuid(), &raw),
            Ok(Value::from("00010203-0405-0607-0809-0a0b0c0d0e0f"))
        );
    }

    #[test]
    fn test_decode_truncated_buffer() {
        assert!(matches!(
            decode(&Descriptor::uint32(), &[1, 2]),
            Err(ViewError::OutOfBounds { .. })
        ));
        // String length prefix claims more bytes than are present.
        assert!(matches!(
            decode(&Descriptor::string(), &[9, 0, 0, 0, b'a']),
            Err(ViewError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert!(matches!(
            decode(&Descriptor::string(), &[2, 0, 0, 0, 0xC3, 0x28]),
            Err(ViewError::InvalidData(_))
        ));
    }

    #[test]
    fn test_decode_unknown_tag() {
        let desc = Descriptor::union_builder("type")
            .variant(
                0,
                Descriptor::struct_builder().field("type", Descriptor::uint8()),
            )
            .build();
        assert_eq!(decode(&desc, &[7]), Err(ViewError::UnknownTag(7)));
    }

    #[test]
    fn test_map_entries_positions() {
        let desc = Descriptor::map(Descriptor::string(), Descriptor::uint8());
        let value = Value::map([("k1", Value::from(1u8)), ("k2", Value::from(2u8))]);
        let bytes = encode(&desc, &value).expect("encode");

        let DescriptorKind::Map(map) = &desc.kind else {
            panic!("map descriptor");
        };
        let entries = map_entries(map, &bytes, 0).expect("entries");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "k1");
        assert_eq!(bytes[entries[0].1], 1);
        assert_eq!(bytes[entries[1].1], 2);
    }

    #[test]
    fn test_decode_at_nested_offset() {
        let desc = Descriptor::vector(Descriptor::uint16());
        let bytes = encode(&desc, &Value::from(vec![10u16, 20, 30])).expect("encode");
        let second = vector_item_offset(&bytes, 0, 1).expect("offset");
        assert_eq!(
            decode_at(&Descriptor::uint16(), &bytes, second),
            Ok(Value::UInt(20))
        );
    }
}
