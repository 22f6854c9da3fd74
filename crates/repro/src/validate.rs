// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value shape validation.
//!
//! A [`Validator`] is consulted only at explicit validation points (see
//! [`crate::View::validate`] and [`crate::EncodeOptions::validate`]); the
//! encoder itself trusts its input. [`SchemaValidator`] derives the checks
//! from a descriptor, which is what generated code would otherwise supply.

use crate::codec::tag_of;
use crate::descriptor::{Descriptor, DescriptorKind, FloatBits, IntBits, StructDescriptor};
use crate::error::{Result, ViewError};
use crate::value::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Checks that a value has the shape a view expects.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value) -> Result<()>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<()> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<()> {
        self(value)
    }
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValue;

impl Validator for AnyValue {
    fn validate(&self, _value: &Value) -> Result<()> {
        Ok(())
    }
}

/// Accepts `Null`, otherwise delegates to the wrapped validator.
#[derive(Clone)]
pub struct Nullable {
    inner: Arc<dyn Validator>,
}

impl Nullable {
    pub fn new(inner: Arc<dyn Validator>) -> Self {
        Self { inner }
    }
}

impl Validator for Nullable {
    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        self.inner.validate(value)
    }
}

impl std::fmt::Debug for Nullable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nullable").finish_non_exhaustive()
    }
}

/// Validator derived from a descriptor.
///
/// Integers must fit the declared width and signedness, floats must be
/// `Value::Float` (and exact in binary32 for `float32`), char text must fit
/// its byte width without NUL bytes, UUID text must parse, boolean literals must match, arrays
/// must have exactly the declared length, map keys must be unique, and every
/// non-nullable struct field must be present. Extra struct fields are
/// ignored.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    descriptor: Arc<Descriptor>,
}

impl SchemaValidator {
    pub fn new(descriptor: Arc<Descriptor>) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, value: &Value) -> Result<()> {
        let mut path = Vec::new();
        check(&self.descriptor, value, &mut path)
    }
}

fn fail(path: &[String], reason: impl Into<String>) -> ViewError {
    ViewError::Validation {
        path: path.join("."),
        reason: reason.into(),
    }
}

fn expected(path: &[String], what: &str, found: &Value) -> ViewError {
    fail(path, format!("expected {}, found {}", what, found.type_name()))
}

fn check(desc: &Descriptor, value: &Value, path: &mut Vec<String>) -> Result<()> {
    if value.is_null() {
        return if desc.nullable {
            Ok(())
        } else {
            Err(expected(path, desc.kind_name(), value))
        };
    }

    match &desc.kind {
        DescriptorKind::Integer { signed, bits } => {
            let n: i128 = match value {
                Value::Int(v) => i128::from(*v),
                Value::UInt(v) => i128::from(*v),
                other => return Err(expected(path, "integer", other)),
            };
            let (min, max) = int_range(*signed, *bits);
            if n < min || n > max {
                return Err(fail(
                    path,
                    format!("{} out of range {}..={}", n, min, max),
                ));
            }
            Ok(())
        }
        DescriptorKind::Float { bits } => {
            let Value::Float(v) = value else {
                return Err(expected(path, "float", value));
            };
            if *bits == FloatBits::B32 && !v.is_nan() && f64::from(*v as f32) != *v {
                return Err(fail(path, format!("{} is not representable as float32", v)));
            }
            Ok(())
        }
        DescriptorKind::Char { bytes } => {
            let text = value.as_str().ok_or_else(|| expected(path, "string", value))?;
            if text.contains('\0') {
                return Err(fail(path, "char text must not contain NUL"));
            }
            if text.len() > *bytes {
                return Err(fail(
                    path,
                    format!("text of {} bytes exceeds char[{}]", text.len(), bytes),
                ));
            }
            Ok(())
        }
        DescriptorKind::String => value
            .as_str()
            .map(|_| ())
            .ok_or_else(|| expected(path, "string", value)),
        DescriptorKind::Uuid => {
            let text = value.as_str().ok_or_else(|| expected(path, "uuid", value))?;
            uuid::Uuid::parse_str(text)
                .map(|_| ())
                .map_err(|e| fail(path, format!("invalid uuid: {}", e)))
        }
        DescriptorKind::Bool { value: literal } => {
            let b = value.as_bool().ok_or_else(|| expected(path, "bool", value))?;
            match literal {
                Some(want) if *want != b => Err(fail(path, format!("expected literal {}", want))),
                _ => Ok(()),
            }
        }
        DescriptorKind::Buffer => value
            .as_bytes()
            .map(|_| ())
            .ok_or_else(|| expected(path, "bytes", value)),
        DescriptorKind::Array(arr) => {
            let items = value.as_list().ok_or_else(|| expected(path, "array", value))?;
            if items.len() != arr.size {
                return Err(fail(
                    path,
                    format!("expected {} items, found {}", arr.size, items.len()),
                ));
            }
            check_items(&arr.items, items, path)
        }
        DescriptorKind::Vector(vec) => {
            let items = value.as_list().ok_or_else(|| expected(path, "vector", value))?;
            check_items(&vec.items, items, path)
        }
        DescriptorKind::Map(map) => {
            let entries = value.as_map().ok_or_else(|| expected(path, "map", value))?;
            let mut seen = HashSet::with_capacity(entries.len());
            for (key, entry) in entries {
                path.push(key.clone());
                if !seen.insert(key.as_str()) {
                    return Err(fail(path, "duplicate map key"));
                }
                if let DescriptorKind::Char { bytes } = map.key.kind {
                    if key.contains('\0') {
                        return Err(fail(path, "char key must not contain NUL"));
                    }
                    if key.len() > bytes {
                        return Err(fail(path, format!("key exceeds char[{}]", bytes)));
                    }
                }
                check(&map.value, entry, path)?;
                path.pop();
            }
            Ok(())
        }
        DescriptorKind::Struct(s) => check_struct(s, value, path),
        DescriptorKind::Union(u) => {
            let tag_value = match value {
                Value::Struct(fields) => fields.get(&u.tag_field),
                other => return Err(expected(path, "union", other)),
            };
            let tag_value = tag_value
                .ok_or_else(|| fail(path, format!("missing tag field `{}`", u.tag_field)))?;
            let tag = tag_of(tag_value).map_err(|e| fail(path, e.to_string()))?;
            let variant = u
                .variant(tag)
                .ok_or_else(|| fail(path, format!("no variant for tag {}", tag)))?;
            check_struct(variant, value, path)
        }
    }
}

fn check_items(items_desc: &Descriptor, items: &[Value], path: &mut Vec<String>) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        path.push(index.to_string());
        check(items_desc, item, path)?;
        path.pop();
    }
    Ok(())
}

fn check_struct(layout: &StructDescriptor, value: &Value, path: &mut Vec<String>) -> Result<()> {
    let Value::Struct(fields) = value else {
        return Err(expected(path, "struct", value));
    };
    for field in &layout.fields {
        path.push(field.name.clone());
        match fields.get(&field.name) {
            Some(v) => check(&field.type_desc, v, path)?,
            None if field.type_desc.nullable => {}
            None => return Err(fail(path, "missing field")),
        }
        path.pop();
    }
    Ok(())
}

fn int_range(signed: bool, bits: IntBits) -> (i128, i128) {
    let bits = bits.bits();
    if signed {
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        (0, (1i128 << bits) - 1)
    }
}
