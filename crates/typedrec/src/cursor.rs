// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Big-endian byte cursors with position tracking.
//!
//! [`ReadCursor`] walks a borrowed buffer and reports short reads without
//! consuming anything. [`WriteCursor`] wraps any [`Write`] sink.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::io::{self, Write};

/// A read needed more bytes than remain in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eof {
    pub needed: usize,
    pub remaining: usize,
}

/// Forward-only reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

macro_rules! read_be {
    ($($name:ident -> $ty:ty, $size:expr, $read:path;)*) => {
        $(
            pub fn $name(&mut self) -> Result<$ty, Eof> {
                let bytes = self.read_bytes($size)?;
                Ok($read(bytes))
            }
        )*
    };
}

impl<'a> ReadCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], Eof> {
        if count > self.remaining() {
            return Err(Eof {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, Eof> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, Eof> {
        Ok(self.read_u8()? as i8)
    }

    read_be! {
        read_u16 -> u16, 2, BigEndian::read_u16;
        read_u32 -> u32, 4, BigEndian::read_u32;
        read_u64 -> u64, 8, BigEndian::read_u64;
        read_i16 -> i16, 2, BigEndian::read_i16;
        read_i32 -> i32, 4, BigEndian::read_i32;
        read_i64 -> i64, 8, BigEndian::read_i64;
        read_f32 -> f32, 4, BigEndian::read_f32;
        read_f64 -> f64, 8, BigEndian::read_f64;
    }
}

/// Writer with position tracking.
#[derive(Debug)]
pub struct WriteCursor<W: Write> {
    inner: W,
    pos: u64,
}

macro_rules! write_be {
    ($($name:ident($ty:ty), $size:expr, $write:ident;)*) => {
        $(
            pub fn $name(&mut self, v: $ty) -> io::Result<()> {
                self.inner.$write::<BigEndian>(v)?;
                self.pos += $size;
                Ok(())
            }
        )*
    };
}

impl<W: Write> WriteCursor<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, pos: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.pos += bytes.len() as u64;
        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.inner.write_u8(v)?;
        self.pos += 1;
        Ok(())
    }

    pub fn write_i8(&mut self, v: i8) -> io::Result<()> {
        self.inner.write_i8(v)?;
        self.pos += 1;
        Ok(())
    }

    write_be! {
        write_u16(u16), 2, write_u16;
        write_u32(u32), 4, write_u32;
        write_u64(u64), 8, write_u64;
        write_i16(i16), 2, write_i16;
        write_i32(i32), 4, write_i32;
        write_i64(i64), 8, write_i64;
        write_f32(f32), 4, write_f32;
        write_f64(f64), 8, write_f64;
    }
}
