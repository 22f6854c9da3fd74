// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire constants and runtime options.
//!
//! Every byte width the codec writes is defined here. All multi-byte integers
//! on the wire are little-endian; offsets and counts are unsigned 32-bit.

// =======================================================================
// Wire layout
// =======================================================================

/// Byte widths of the integer slots used by the wire format.
#[derive(Debug, Clone, Copy)]
pub struct ByteLengths;

impl ByteLengths {
    pub const INT8: usize = 1;
    pub const INT16: usize = 2;
    pub const INT32: usize = 4;
    pub const INT64: usize = 8;
}

/// Size of a header slot (offset or count).
pub const OFFSET_SIZE: usize = ByteLengths::INT32;

/// Size of the presence flag prepended to nullable values.
pub const PRESENCE_SIZE: usize = ByteLengths::INT8;

/// Size of a union tag.
pub const TAG_SIZE: usize = ByteLengths::INT8;

/// Raw UUID width on the wire (no separators).
pub const UUID_SIZE: usize = 16;

/// Presence flag: value absent.
pub const ABSENT: u8 = 0;

/// Presence flag: value present.
pub const PRESENT: u8 = 1;

// =======================================================================
// Runtime options
// =======================================================================

/// Options accepted by [`crate::View::encode`] and [`crate::View::from`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Run the view's validator before encoding.
    pub validate: bool,
}

impl EncodeOptions {
    /// Options with validation enabled.
    pub fn validated() -> Self {
        Self { validate: true }
    }
}
