//! Bounds-checked little-endian field access over pack bytes.
//!
//! Source packs are not guaranteed to be naturally aligned, so every
//! multi-byte field is assembled from raw bytes. All reads and writes go
//! through these cursors; out-of-range access surfaces as
//! [`FormatError::Truncated`] instead of a panic.

use crate::error::{FormatError, Result};
use crate::guid::Guid;

/// Forward-only reader over a byte slice.
#[derive(Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset from the start of the slice.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Jump to an absolute offset within the slice.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(FormatError::Truncated { at: pos });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Consume `n` bytes and return them as a subslice.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .ok_or(FormatError::Truncated { at: self.pos })?;
        if end > self.buf.len() {
            return Err(FormatError::Truncated { at: self.pos });
        }
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn guid(&mut self) -> Result<Guid> {
        let at = self.pos;
        let b = self.take(16)?;
        Guid::read(b).ok_or(FormatError::Truncated { at })
    }
}

/// Append-only little-endian writer.
///
/// Encoders build packs front to back into a growable buffer; offsets are
/// computed before emission, never patched afterwards.
#[derive(Default)]
pub struct Writer {
    out: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            out: Vec::with_capacity(cap),
        }
    }

    /// Bytes emitted so far.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn u8(&mut self, v: u8) {
        self.out.push(v);
    }

    pub fn u16(&mut self, v: u16) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    pub fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    pub fn bytes(&mut self, v: &[u8]) {
        self.out.extend_from_slice(v);
    }

    pub fn guid(&mut self, v: &Guid) {
        self.out.extend_from_slice(v.as_bytes());
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}
