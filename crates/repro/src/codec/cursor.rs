// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors over encoded buffers.
//!
//! [`CursorMut`] is the single write offset threaded by `&mut` through one
//! encode call tree: every write advances it by exactly the bytes written, so
//! sibling and nested writes can never overlap. [`Cursor`] is its read-side
//! twin, positioned at an absolute offset by the decoders.

use crate::error::{Result, ViewError};

/// Generate little-endian write methods for primitive types.
///
/// Each generated method checks bounds, copies `to_le_bytes()` into the
/// buffer and advances the offset.
macro_rules! impl_write_le {
    ($($name:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self, value: $type) -> Result<()> {
                self.write_bytes(&value.to_le_bytes())
            }
        )*
    };
}

/// Generate little-endian read methods for primitive types.
macro_rules! impl_read_le {
    ($($name:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> Result<$type> {
                const SIZE: usize = std::mem::size_of::<$type>();
                let mut bytes = [0u8; SIZE];
                bytes.copy_from_slice(self.read_bytes(SIZE)?);
                Ok(<$type>::from_le_bytes(bytes))
            }
        )*
    };
}

/// Generate common cursor methods (offset, remaining, seek).
macro_rules! impl_cursor_common {
    () => {
        pub fn offset(&self) -> usize {
            self.offset
        }

        pub fn remaining(&self) -> usize {
            self.buffer.len().saturating_sub(self.offset)
        }

        /// Move to an absolute position.
        pub fn seek(&mut self, offset: usize) -> Result<()> {
            if offset > self.buffer.len() {
                return Err(ViewError::OutOfBounds {
                    offset,
                    need: 0,
                    have: self.buffer.len(),
                });
            }
            self.offset = offset;
            Ok(())
        }

        fn check(&self, need: usize) -> Result<()> {
            if need > self.remaining() {
                return Err(ViewError::OutOfBounds {
                    offset: self.offset,
                    need,
                    have: self.remaining(),
                });
            }
            Ok(())
        }
    };
}

/// Mutable cursor for writing (bounds-checked).
#[derive(Debug)]
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Cursor positioned at `offset` (in-place rewrites).
    pub fn at(buffer: &'a mut [u8], offset: usize) -> Result<Self> {
        let mut cursor = Self::new(buffer);
        cursor.seek(offset)?;
        Ok(cursor)
    }

    impl_write_le!(
        write_u8: u8,
        write_u16_le: u16,
        write_u32_le: u32,
        write_u64_le: u64,
        write_i8: i8,
        write_i16_le: i16,
        write_i32_le: i32,
        write_i64_le: i64,
        write_f32_le: f32,
        write_f64_le: f64,
    );

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.check(data.len())?;
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Fill `count` bytes with zero (char padding).
    pub fn write_zeros(&mut self, count: usize) -> Result<()> {
        self.check(count)?;
        self.buffer[self.offset..self.offset + count].fill(0);
        self.offset += count;
        Ok(())
    }

    impl_cursor_common!();
}

/// Immutable cursor for reading (bounds-checked, zero-copy).
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Cursor positioned at `offset`.
    pub fn at(buffer: &'a [u8], offset: usize) -> Result<Self> {
        let mut cursor = Self::new(buffer);
        cursor.seek(offset)?;
        Ok(cursor)
    }

    impl_read_le!(
        read_u8: u8,
        read_u16_le: u16,
        read_u32_le: u32,
        read_u64_le: u64,
        read_i8: i8,
        read_i16_le: i16,
        read_i32_le: i32,
        read_i64_le: i64,
        read_f32_le: f32,
        read_f64_le: f64,
    );

    /// Borrow `count` bytes from the buffer and advance.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.check(count)?;
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    /// Read a header slot (u32 offset or count) widened to `usize`.
    pub fn read_len(&mut self) -> Result<usize> {
        Ok(self.read_u32_le()? as usize)
    }

    impl_cursor_common!();
}

/// Read the header slot at an absolute position without keeping a cursor.
pub(crate) fn read_u32_at(buffer: &[u8], offset: usize) -> Result<usize> {
    Cursor::at(buffer, offset)?.read_len()
}
