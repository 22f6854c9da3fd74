// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! View façade: one descriptor bound to one validator.
//!
//! ```
//! use repro::{Descriptor, EncodeOptions, Value, View};
//!
//! let view = View::with_schema(
//!     Descriptor::struct_builder()
//!         .field("id", Descriptor::uint32())
//!         .string_field("name")
//!         .build(),
//! );
//! let value = Value::record([("id", Value::from(7u32)), ("name", Value::from("seven"))]);
//!
//! let bytes = view.encode(&value, EncodeOptions::validated())?;
//! let lens = view.over(&bytes)?;
//! assert_eq!(lens.field("name")?.to_value()?, Value::from("seven"));
//!
//! // Re-encoding a lens hands back its buffer untouched.
//! let again = view.encode(&lens, EncodeOptions::default())?;
//! assert!(std::ptr::eq(again.as_ref(), bytes.as_ref()));
//! # Ok::<(), repro::ViewError>(())
//! ```

use crate::codec;
use crate::config::EncodeOptions;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::lazy::{Lens, LensMut};
use crate::validate::{AnyValue, Nullable, SchemaValidator, Validator};
use crate::value::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// What an [`Encodable`] hands to the view: a plain value, or bytes that are
/// already encoded.
#[derive(Debug, Clone, Copy)]
pub enum Source<'e> {
    Value(&'e Value),
    Encoded {
        bytes: &'e [u8],
        descriptor: &'e Descriptor,
    },
}

/// Anything a view can encode.
pub trait Encodable {
    fn source(&self) -> Source<'_>;
}

impl Encodable for Value {
    fn source(&self) -> Source<'_> {
        Source::Value(self)
    }
}

impl Encodable for Lens<'_> {
    fn source(&self) -> Source<'_> {
        Source::Encoded {
            bytes: self.as_bytes(),
            descriptor: self.descriptor(),
        }
    }
}

impl Encodable for OwnedLens {
    fn source(&self) -> Source<'_> {
        Source::Encoded {
            bytes: &self.bytes,
            descriptor: &self.descriptor,
        }
    }
}

/// Descriptor plus validator, exposing encode/decode/lazy access.
#[derive(Clone)]
pub struct View {
    descriptor: Arc<Descriptor>,
    validator: Arc<dyn Validator>,
}

impl View {
    pub fn new(descriptor: impl Into<Arc<Descriptor>>, validator: impl Validator + 'static) -> Self {
        Self::with_validator(descriptor, Arc::new(validator))
    }

    pub fn with_validator(
        descriptor: impl Into<Arc<Descriptor>>,
        validator: Arc<dyn Validator>,
    ) -> Self {
        Self {
            descriptor: descriptor.into(),
            validator,
        }
    }

    /// View whose validator is derived from the descriptor.
    pub fn with_schema(descriptor: impl Into<Arc<Descriptor>>) -> Self {
        let descriptor = descriptor.into();
        let validator = SchemaValidator::new(Arc::clone(&descriptor));
        Self::with_validator(descriptor, Arc::new(validator))
    }

    /// View that accepts any value.
    pub fn unchecked(descriptor: impl Into<Arc<Descriptor>>) -> Self {
        Self::new(descriptor, AnyValue)
    }

    pub fn descriptor(&self) -> &Arc<Descriptor> {
        &self.descriptor
    }

    /// Run the validator.
    pub fn validate(&self, value: &Value) -> Result<()> {
        self.validator.validate(value)
    }

    /// Encoded size of `value`.
    pub fn byte_length(&self, value: &Value) -> Result<usize> {
        codec::byte_length(&self.descriptor, value)
    }

    /// Encode a value, or return the backing buffer of an already encoded
    /// one without serializing again.
    pub fn encode<'e, E>(&self, value: &'e E, options: EncodeOptions) -> Result<Cow<'e, [u8]>>
    where
        E: Encodable + ?Sized,
    {
        match value.source() {
            Source::Value(v) => {
                if options.validate {
                    self.validate(v)?;
                }
                codec::encode(&self.descriptor, v).map(Cow::Owned)
            }
            Source::Encoded { bytes, descriptor } => {
                let same = std::ptr::eq(descriptor, &*self.descriptor) || *descriptor == *self.descriptor;
                if options.validate || !same {
                    let decoded = codec::decode(descriptor, bytes)?;
                    if options.validate {
                        self.validate(&decoded)?;
                    }
                    if !same {
                        log::debug!("[view] transcoding buffer from a different descriptor");
                        return codec::encode(&self.descriptor, &decoded).map(Cow::Owned);
                    }
                }
                log::debug!("[view] encode short-circuit: reusing {} byte buffer", bytes.len());
                Ok(Cow::Borrowed(bytes))
            }
        }
    }

    /// Encode `value` into `buffer` at `offset`; returns the bytes written.
    pub fn encode_into(&self, value: &Value, buffer: &mut [u8], offset: usize) -> Result<usize> {
        let mut cursor = codec::CursorMut::at(buffer, offset)?;
        codec::encode_into(&self.descriptor, value, &mut cursor)?;
        Ok(cursor.offset() - offset)
    }

    /// Eagerly decode a buffer.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        codec::decode(&self.descriptor, bytes)
    }

    /// Decode the encoded form of `source`; plain values are returned as is.
    pub fn decode_source<E>(&self, source: &E) -> Result<Value>
    where
        E: Encodable + ?Sized,
    {
        match source.source() {
            Source::Value(v) => Ok(v.clone()),
            Source::Encoded { bytes, descriptor } => codec::decode(descriptor, bytes),
        }
    }

    /// Encode, then materialize lazily over the new buffer.
    pub fn from(&self, value: &Value, options: EncodeOptions) -> Result<OwnedLens> {
        let bytes = self.encode(value, options)?.into_owned();
        Ok(OwnedLens::new(Arc::clone(&self.descriptor), bytes))
    }

    /// Lazy view over `bytes`.
    pub fn over<'a>(&'a self, bytes: &'a [u8]) -> Result<Lens<'a>> {
        Lens::new(&self.descriptor, bytes)
    }

    /// Mutable lazy view over `bytes`.
    pub fn over_mut<'a>(&'a self, bytes: &'a mut [u8]) -> LensMut<'a> {
        LensMut::new(&self.descriptor, bytes)
    }

    /// Same view with a nullable descriptor and a validator that also
    /// accepts `Null`. `self` is unchanged.
    pub fn nullable(&self) -> View {
        Self {
            descriptor: Arc::new(self.descriptor.to_nullable()),
            validator: Arc::new(Nullable::new(Arc::clone(&self.validator))),
        }
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// An encoded buffer that owns its bytes, as returned by [`View::from`].
#[derive(Debug, Clone)]
pub struct OwnedLens {
    descriptor: Arc<Descriptor>,
    bytes: Vec<u8>,
}

impl OwnedLens {
    pub fn new(descriptor: Arc<Descriptor>, bytes: Vec<u8>) -> Self {
        Self { descriptor, bytes }
    }

    pub fn descriptor(&self) -> &Arc<Descriptor> {
        &self.descriptor
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn lens(&self) -> Result<Lens<'_>> {
        Lens::new(&self.descriptor, &self.bytes)
    }

    pub fn lens_mut(&mut self) -> LensMut<'_> {
        LensMut::new(&self.descriptor, &mut self.bytes)
    }

    /// Decode the value at `path` (see [`crate::Lazy::path`]).
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        self.lens()?
            .path(path)?
            .map(|lazy| lazy.to_value())
            .transpose()
    }

    pub fn to_value(&self) -> Result<Value> {
        codec::decode(&self.descriptor, &self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewError;

    fn point_view() -> View {
        View::with_schema(
            Descriptor::struct_builder()
                .field("x", Descriptor::int32())
                .field("y", Descriptor::int32())
                .build(),
        )
    }

    fn point(x: i32, y: i32) -> Value {
        Value::record([("x", Value::from(x)), ("y", Value::from(y))])
    }

    #[test]
    fn test_encode_validates_on_request() {
        let view = point_view();
        let bad = Value::record([("x", Value::from(1i32))]);
        assert!(matches!(
            view.encode(&bad, EncodeOptions::validated()),
            Err(ViewError::Validation { .. })
        ));
        // Without validation the encoder reports the missing field itself.
        assert_eq!(
            view.encode(&bad, EncodeOptions::default()).err(),
            Some(ViewError::MissingField("y".into()))
        );
    }

    #[test]
    fn test_owned_lens_reencode_is_borrowed() {
        let view = point_view();
        let owned = view.from(&point(1, 2), EncodeOptions::default()).expect("from");
        let encoded = view.encode(&owned, EncodeOptions::default()).expect("encode");
        assert!(matches!(encoded, Cow::Borrowed(_)));
        assert!(std::ptr::eq(encoded.as_ref(), owned.as_bytes()));
        assert_eq!(owned.get("y"), Ok(Some(Value::Int(2))));
    }

    #[test]
    fn test_decode_source_passes_values_through() {
        let view = point_view();
        let value = point(3, 4);
        assert_eq!(view.decode_source(&value), Ok(value.clone()));
        let owned = view.from(&value, EncodeOptions::default()).expect("from");
        assert_eq!(view.decode_source(&owned), Ok(value));
    }

    #[test]
    fn test_nullable_view_is_derived() {
        let view = point_view();
        let nullable = view.nullable();
        assert!(!view.descriptor().nullable);
        assert!(nullable.descriptor().nullable);

        assert!(view.validate(&Value::Null).is_err());
        assert!(nullable.validate(&Value::Null).is_ok());
        assert!(nullable.validate(&point(1, 1)).is_ok());

        let bytes = nullable.encode(&Value::Null, EncodeOptions::default()).expect("encode");
        assert_eq!(bytes.as_ref(), [0]);
        assert_eq!(nullable.decode(&bytes), Ok(Value::Null));
    }

    #[test]
    fn test_lens_from_other_descriptor_is_transcoded() {
        let narrow = View::unchecked(Descriptor::uint8());
        let wide = View::unchecked(Descriptor::uint32());
        let value = Value::from(9u8);
        let bytes = narrow.encode(&value, EncodeOptions::default()).expect("encode");
        let lens = narrow.over(&bytes).expect("over");
        let out = wide.encode(&lens, EncodeOptions::default()).expect("encode");
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(out.as_ref(), [9, 0, 0, 0]);
    }

    #[test]
    fn test_encode_into_offset() {
        let view = point_view();
        let mut buf = [0xAAu8; 20];
        let written = view.encode_into(&point(1, -1), &mut buf, 2).expect("encode");
        assert_eq!(written, 16);
        assert_eq!(buf[..2], [0xAA, 0xAA]);
        assert_eq!(buf[2..6], [8, 0, 0, 0]);
        assert_eq!(buf[18..], [0xAA, 0xAA]);
    }
}
