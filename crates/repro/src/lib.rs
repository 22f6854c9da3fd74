// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # repro - schema-driven binary views
//!
//! Encodes structured values into a compact, offset-addressed binary layout
//! described by a [`Descriptor`], decodes them back eagerly, or reads them
//! lazily in place without decoding more than is accessed.
//!
//! ## Quick Start
//!
//! ```rust
//! use repro::{Descriptor, EncodeOptions, Value, View};
//!
//! let view = View::with_schema(
//!     Descriptor::struct_builder()
//!         .field("a", Descriptor::uint32())
//!         .field("g", Descriptor::vector(Descriptor::char(5)))
//!         .build(),
//! );
//! let value = Value::record([
//!     ("a", Value::from(64u32)),
//!     ("g", Value::from(vec!["12345", "abcde"])),
//! ]);
//!
//! let mut bytes = view.encode(&value, EncodeOptions::validated())?.into_owned();
//!
//! // Lazy read: only the second vector item is decoded.
//! let lens = view.over(&bytes)?;
//! let item = lens.path("g.1")?.map(|l| l.to_value()).transpose()?;
//! assert_eq!(item, Some(Value::from("abcde")));
//!
//! // In-place write of a fixed-length field.
//! view.over_mut(&mut bytes).set("a", &Value::from(999u32))?;
//! assert_eq!(view.decode(&bytes)?.get_field("a"), Some(&Value::UInt(999)));
//! # Ok::<(), repro::ViewError>(())
//! ```
//!
//! ## Layers
//!
//! ```text
//! +------------------------------------------------------------+
//! |  View            validate | encode | decode | over | from  |
//! +------------------------------------------------------------+
//! |  Lazy            Lens / LensMut -> LazyStruct/List/Map     |
//! +------------------------------------------------------------+
//! |  Codec           byte_length -> encode | decode            |
//! +------------------------------------------------------------+
//! |  Descriptor      kinds, builders, JSON literals            |
//! +------------------------------------------------------------+
//! ```
//!
//! ## Features
//!
//! - `literals` (default): JSON descriptor literals and JSON value
//!   conversion via `serde_json`.

/// Wire constants and runtime options.
pub mod config;
/// Size calculator, encoder and eager decoder.
pub mod codec;
/// Layout descriptors and builders.
pub mod descriptor;
/// Error type.
pub mod error;
/// Lazy decoding and in-place mutation.
pub mod lazy;
/// Value shape validators.
pub mod validate;
/// Dynamic value model.
pub mod value;
/// Descriptor + validator façade.
pub mod view;

pub use codec::{byte_length, decode, decode_at, encode, encode_into};
pub use config::EncodeOptions;
pub use descriptor::{Descriptor, DescriptorKind, FloatBits, IntBits, StructBuilder, UnionBuilder};
pub use error::{Result, ViewError};
pub use lazy::{over, Lazy, LazyList, LazyMap, LazyStruct, Lens, LensMut};
pub use validate::{AnyValue, Nullable, SchemaValidator, Validator};
pub use value::Value;
pub use view::{Encodable, OwnedLens, Source, View};

#[cfg(feature = "literals")]
pub use descriptor::literal::{value_from_json, value_to_json};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
