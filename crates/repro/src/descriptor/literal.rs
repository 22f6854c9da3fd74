// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON descriptor literals and JSON <-> [`Value`] conversion.
//!
//! The literal format is the language-neutral tree emitted by schema
//! generators:
//!
//! ```json
//! {"type": "struct", "fields": [
//!     ["id",   {"type": "integer", "signed": false, "bits": 32}],
//!     ["name", {"type": "string", "nullable": true}],
//!     ["tags", {"type": "vector", "items": {"type": "char", "bytes": 8}}]
//! ]}
//! ```
//!
//! Unions carry `tagField` and a `descriptors` object keyed by tag number.

use super::{
    ArrayDescriptor, Descriptor, DescriptorKind, FieldDescriptor, FloatBits, IntBits,
    MapDescriptor, StructDescriptor, UnionDescriptor, VectorDescriptor,
};
use crate::codec::tag_of;
use crate::error::{Result, ViewError};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LiteralNode {
    #[serde(flatten)]
    kind: LiteralKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    nullable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LiteralKind {
    Integer {
        signed: bool,
        bits: u32,
    },
    Float {
        bits: u32,
    },
    Char {
        bytes: usize,
    },
    String,
    Uuid,
    Bool {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<bool>,
    },
    Buffer,
    Array {
        size: usize,
        items: Box<LiteralNode>,
    },
    Vector {
        items: Box<LiteralNode>,
    },
    Map {
        key: Box<LiteralNode>,
        value: Box<LiteralNode>,
    },
    Struct {
        fields: Vec<(String, LiteralNode)>,
    },
    Union {
        #[serde(rename = "tagField")]
        tag_field: String,
        descriptors: BTreeMap<String, LiteralNode>,
    },
    #[serde(other)]
    Unknown,
}

impl Descriptor {
    /// Parse and check a JSON descriptor literal.
    pub fn from_json(json: &str) -> Result<Self> {
        let node: LiteralNode =
            serde_json::from_str(json).map_err(|e| ViewError::Literal(e.to_string()))?;
        let desc = node.into_descriptor()?;
        desc.check()?;
        Ok(desc)
    }

    /// Serialize as a JSON descriptor literal.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&LiteralNode::from(self))
            .map_err(|e| ViewError::Literal(e.to_string()))
    }
}

impl LiteralNode {
    fn into_descriptor(self) -> Result<Descriptor> {
        let kind = match self.kind {
            LiteralKind::Integer { signed, bits } => DescriptorKind::Integer {
                signed,
                bits: IntBits::from_bits(bits).ok_or_else(|| {
                    ViewError::UnsupportedKind(format!("integer of {} bits", bits))
                })?,
            },
            LiteralKind::Float { bits } => DescriptorKind::Float {
                bits: FloatBits::from_bits(bits).ok_or_else(|| {
                    ViewError::UnsupportedKind(format!("float of {} bits", bits))
                })?,
            },
            LiteralKind::Char { bytes } => DescriptorKind::Char { bytes },
            LiteralKind::String => DescriptorKind::String,
            LiteralKind::Uuid => DescriptorKind::Uuid,
            LiteralKind::Bool { value } => DescriptorKind::Bool { value },
            LiteralKind::Buffer => DescriptorKind::Buffer,
            LiteralKind::Array { size, items } => {
                DescriptorKind::Array(ArrayDescriptor::new(size, items.into_descriptor()?))
            }
            LiteralKind::Vector { items } => {
                DescriptorKind::Vector(VectorDescriptor::new(items.into_descriptor()?))
            }
            LiteralKind::Map { key, value } => DescriptorKind::Map(MapDescriptor::new(
                key.into_descriptor()?,
                value.into_descriptor()?,
            )),
            LiteralKind::Struct { fields } => DescriptorKind::Struct(into_struct(fields)?),
            LiteralKind::Union {
                tag_field,
                descriptors,
            } => {
                let mut union = UnionDescriptor::new(tag_field);
                for (key, node) in descriptors {
                    let tag: u8 = key.parse().map_err(|_| {
                        ViewError::UnsupportedKind(format!("union tag `{}` is not a u8", key))
                    })?;
                    let LiteralKind::Struct { fields } = node.kind else {
                        return Err(ViewError::UnsupportedKind(format!(
                            "union variant {} is not a struct",
                            tag
                        )));
                    };
                    union.variants.insert(tag, into_struct(fields)?);
                }
                DescriptorKind::Union(union)
            }
            LiteralKind::Unknown => {
                return Err(ViewError::UnsupportedKind("unknown descriptor type".into()))
            }
        };
        Ok(Descriptor {
            kind,
            nullable: self.nullable,
        })
    }
}

fn into_struct(fields: Vec<(String, LiteralNode)>) -> Result<StructDescriptor> {
    fields
        .into_iter()
        .map(|(name, node)| Ok(FieldDescriptor::new(name, node.into_descriptor()?)))
        .collect::<Result<Vec<_>>>()
        .map(StructDescriptor::new)
}

fn struct_literal(layout: &StructDescriptor) -> LiteralKind {
    LiteralKind::Struct {
        fields: layout
            .fields
            .iter()
            .map(|f| (f.name.clone(), LiteralNode::from(&*f.type_desc)))
            .collect(),
    }
}

impl From<&Descriptor> for LiteralNode {
    fn from(desc: &Descriptor) -> Self {
        let boxed = |d: &Arc<Descriptor>| Box::new(LiteralNode::from(&**d));
        let kind = match &desc.kind {
            DescriptorKind::Integer { signed, bits } => LiteralKind::Integer {
                signed: *signed,
                bits: bits.bits(),
            },
            DescriptorKind::Float { bits } => LiteralKind::Float { bits: bits.bits() },
            DescriptorKind::Char { bytes } => LiteralKind::Char { bytes: *bytes },
            DescriptorKind::String => LiteralKind::String,
            DescriptorKind::Uuid => LiteralKind::Uuid,
            DescriptorKind::Bool { value } => LiteralKind::Bool { value: *value },
            DescriptorKind::Buffer => LiteralKind::Buffer,
            DescriptorKind::Array(arr) => LiteralKind::Array {
                size: arr.size,
                items: boxed(&arr.items),
            },
            DescriptorKind::Vector(vec) => LiteralKind::Vector {
                items: boxed(&vec.items),
            },
            DescriptorKind::Map(map) => LiteralKind::Map {
                key: boxed(&map.key),
                value: boxed(&map.value),
            },
            DescriptorKind::Struct(s) => struct_literal(s),
            DescriptorKind::Union(u) => LiteralKind::Union {
                tag_field: u.tag_field.clone(),
                descriptors: u
                    .variants
                    .iter()
                    .map(|(tag, layout)| {
                        (
                            tag.to_string(),
                            LiteralNode {
                                kind: struct_literal(layout),
                                nullable: false,
                            },
                        )
                    })
                    .collect(),
            },
        };
        LiteralNode {
            kind,
            nullable: desc.nullable,
        }
    }
}

// =======================================================================
// JSON values
// =======================================================================

fn json_mismatch(expected: &str, found: &serde_json::Value) -> ViewError {
    let found = match found {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    };
    ViewError::TypeMismatch {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Convert a JSON value to a [`Value`] shaped by `desc`.
///
/// Integers keep the signedness of the descriptor where they fit, buffers
/// are arrays of byte values, and map entries follow the JSON object's
/// iteration order.
pub fn value_from_json(desc: &Descriptor, json: &serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    if json.is_null() {
        return if desc.nullable {
            Ok(Value::Null)
        } else {
            Err(json_mismatch(desc.kind_name(), json))
        };
    }

    match &desc.kind {
        DescriptorKind::Integer { signed, .. } => {
            let Json::Number(n) = json else {
                return Err(json_mismatch("integer", json));
            };
            match (n.as_i64(), n.as_u64()) {
                (Some(i), _) if *signed || i < 0 => Ok(Value::Int(i)),
                (_, Some(u)) => Ok(Value::UInt(u)),
                _ => Err(ViewError::TypeMismatch {
                    expected: "integer".into(),
                    found: n.to_string(),
                }),
            }
        }
        DescriptorKind::Float { .. } => json
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| json_mismatch("number", json)),
        DescriptorKind::Char { .. } | DescriptorKind::String | DescriptorKind::Uuid => json
            .as_str()
            .map(Value::from)
            .ok_or_else(|| json_mismatch("string", json)),
        DescriptorKind::Bool { .. } => json
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| json_mismatch("bool", json)),
        DescriptorKind::Buffer => {
            let items = json.as_array().ok_or_else(|| json_mismatch("byte array", json))?;
            items
                .iter()
                .map(|b| {
                    b.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| json_mismatch("byte", b))
                })
                .collect::<Result<Vec<u8>>>()
                .map(Value::Bytes)
        }
        DescriptorKind::Array(ArrayDescriptor { items, .. })
        | DescriptorKind::Vector(VectorDescriptor { items }) => {
            let list = json.as_array().ok_or_else(|| json_mismatch("array", json))?;
            list.iter()
                .map(|item| value_from_json(items, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List)
        }
        DescriptorKind::Map(map) => {
            let object = json.as_object().ok_or_else(|| json_mismatch("object", json))?;
            object
                .iter()
                .map(|(k, v)| Ok((k.clone(), value_from_json(&map.value, v)?)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Map)
        }
        DescriptorKind::Struct(s) => struct_from_json(s, json),
        DescriptorKind::Union(u) => {
            let object = json.as_object().ok_or_else(|| json_mismatch("object", json))?;
            let tag_json = object
                .get(&u.tag_field)
                .ok_or_else(|| ViewError::MissingField(u.tag_field.clone()))?;
            let tag_value = match tag_json {
                Json::Bool(b) => Value::Bool(*b),
                other => other
                    .as_u64()
                    .map(Value::UInt)
                    .ok_or_else(|| json_mismatch("integer tag", other))?,
            };
            let tag = tag_of(&tag_value)?;
            let variant = u.variant(tag).ok_or(ViewError::UnknownTag(tag))?;
            struct_from_json(variant, json)
        }
    }
}

fn struct_from_json(layout: &StructDescriptor, json: &serde_json::Value) -> Result<Value> {
    let object = json.as_object().ok_or_else(|| json_mismatch("object", json))?;
    let mut fields = std::collections::HashMap::with_capacity(layout.len());
    for field in &layout.fields {
        if let Some(v) = object.get(&field.name) {
            fields.insert(field.name.clone(), value_from_json(&field.type_desc, v)?);
        }
    }
    Ok(Value::Struct(fields))
}

/// Convert a [`Value`] to JSON. Bytes become arrays of numbers; non-finite
/// floats become `null`.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::UInt(u) => Json::from(*u),
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::String(s) => Json::String(s.clone()),
        Value::Bytes(b) => Json::Array(b.iter().map(|&b| Json::from(b)).collect()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        Value::Struct(fields) => Json::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}
