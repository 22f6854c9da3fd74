// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the codec, the lazy views and the view façade.
//!
//! Three classes of failure exist:
//!
//! - **Shape validation** ([`ViewError::Validation`]): a value does not match
//!   the shape its validator expects.
//! - **Mutation policy** ([`ViewError::VariableLengthField`],
//!   [`ViewError::NullableField`], [`ViewError::TagField`]): an in-place write
//!   targets a field that cannot be overwritten without moving bytes.
//! - **Descriptor consistency** ([`ViewError::UnsupportedKind`]): a descriptor
//!   is outside the closed set of layouts the codec understands.
//!
//! The remaining variants report values that do not fit the descriptor they
//! are encoded with, and buffers that are truncated or corrupt. Nothing is
//! retried; every error is returned to the immediate caller.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ViewError>;

/// Errors for encode, decode, lazy access and validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewError {
    /// The validator rejected the value at `path`.
    Validation { path: String, reason: String },
    /// In-place write to a field whose encoded size depends on its value.
    VariableLengthField(String),
    /// In-place write to a field that carries a presence flag.
    NullableField(String),
    /// In-place write to the discriminant field of a union variant.
    TagField(String),
    /// Descriptor kind or layout outside the supported set.
    UnsupportedKind(String),
    /// Value variant does not match the descriptor kind.
    TypeMismatch { expected: String, found: String },
    /// Struct value is missing a declared field.
    MissingField(String),
    /// Lazy struct has no field with this name.
    UnknownField(String),
    /// Union tag does not select any variant.
    UnknownTag(u8),
    /// Numeric value does not fit the declared width.
    OutOfRange { value: String, target: String },
    /// Read or write past the end of the buffer.
    OutOfBounds { offset: usize, need: usize, have: usize },
    /// Bytes that cannot be interpreted (bad UTF-8, bad UUID text, ...).
    InvalidData(String),
    /// Descriptor or value literal could not be parsed.
    Literal(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { path, reason } => {
                if path.is_empty() {
                    write!(f, "validation failed: {}", reason)
                } else {
                    write!(f, "validation failed at `{}`: {}", path, reason)
                }
            }
            Self::VariableLengthField(name) => {
                write!(f, "cannot overwrite variable-length field `{}`", name)
            }
            Self::NullableField(name) => write!(f, "cannot overwrite nullable field `{}`", name),
            Self::TagField(name) => write!(f, "cannot overwrite union tag field `{}`", name),
            Self::UnsupportedKind(what) => write!(f, "unsupported descriptor: {}", what),
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::MissingField(name) => write!(f, "missing field `{}`", name),
            Self::UnknownField(name) => write!(f, "unknown field `{}`", name),
            Self::UnknownTag(tag) => write!(f, "no union variant for tag {}", tag),
            Self::OutOfRange { value, target } => {
                write!(f, "value {} out of range for {}", value, target)
            }
            Self::OutOfBounds { offset, need, have } => write!(
                f,
                "out of bounds at offset {}: need {} bytes, have {}",
                offset, need, have
            ),
            Self::InvalidData(msg) => write!(f, "invalid data: {}", msg),
            Self::Literal(msg) => write!(f, "invalid literal: {}", msg),
        }
    }
}

impl std::error::Error for ViewError {}

impl From<std::str::Utf8Error> for ViewError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::InvalidData(format!("UTF-8 error: {}", e))
    }
}

impl From<uuid::Error> for ViewError {
    fn from(e: uuid::Error) -> Self {
        Self::InvalidData(format!("UUID error: {}", e))
    }
}
