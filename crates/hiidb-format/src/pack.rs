//! Generic pack header and the pack walker.
//!
//! Every pack begins with the same 8-byte header:
//!
//! ```text
//! 0  u32 length     total pack span in bytes, including this header
//! 4  u16 kind       pack kind tag
//! 6  u16 reserved
//! ```
//!
//! A string-pack chain is terminated by a sentinel: a bare header with
//! `length == 0`. The walker below is the single source of truth for pack
//! spans; callers re-run it after every mutation instead of caching sizes.

use crate::cursor::{Cursor, Writer};
use crate::error::{FormatError, Result};
use crate::strings::STRING_PACK_HEADER_SIZE;

/// Size of the generic pack header.
pub const PACK_HEADER_SIZE: usize = 8;

/// Size of the zero-length sentinel closing a string-pack chain.
pub const STRING_SENTINEL_SIZE: usize = PACK_HEADER_SIZE;

/// Pack kind tags carried in the generic header.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u16)]
pub enum PackKind {
    Ifr = 1,
    Strings = 2,
    Font = 3,
    Keyboard = 4,
    Handles = 5,
    Variable = 6,
    DevicePath = 7,
}

impl PackKind {
    /// Convert from the raw header tag.
    pub fn from_u16(v: u16) -> Option<Self> {
        match v {
            1 => Some(Self::Ifr),
            2 => Some(Self::Strings),
            3 => Some(Self::Font),
            4 => Some(Self::Keyboard),
            5 => Some(Self::Handles),
            6 => Some(Self::Variable),
            7 => Some(Self::DevicePath),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ifr => "ifr",
            Self::Strings => "strings",
            Self::Font => "font",
            Self::Keyboard => "keyboard",
            Self::Handles => "handles",
            Self::Variable => "variable",
            Self::DevicePath => "device-path",
        }
    }
}

/// Decoded generic pack header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackHeader {
    pub length: u32,
    pub kind: PackKind,
}

impl PackHeader {
    /// Decode the header at the start of `buf`.
    pub fn read(buf: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(buf);
        let length = c.u32()?;
        let kind = c.u16()?;
        let kind = PackKind::from_u16(kind).ok_or(FormatError::UnknownKind(kind))?;
        Ok(Self { length, kind })
    }

    /// Emit the 8-byte header.
    pub fn write(&self, w: &mut Writer) {
        w.u32(self.length);
        w.u16(self.kind as u16);
        w.u16(0);
    }
}

/// Result of walking one package blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackSpan {
    /// Total byte span of the package, sentinel included for string chains.
    pub total: usize,
    /// Declared string-pointer count of the leading pack (string chains only).
    pub string_count: u32,
}

/// Determine the byte span of the package starting at `buf[0]`.
///
/// IFR packs carry their span directly in the header. String packs form a
/// chain that is followed pack to pack until the zero-length sentinel; the
/// returned span includes the sentinel header. Any other kind is not
/// walkable and reports [`FormatError::UnknownKind`].
pub fn walk_pack(buf: &[u8]) -> Result<PackSpan> {
    let header = PackHeader::read(buf)?;
    match header.kind {
        PackKind::Ifr => {
            let total = header.length as usize;
            if total < PACK_HEADER_SIZE || total > buf.len() {
                return Err(FormatError::Truncated { at: total });
            }
            Ok(PackSpan {
                total,
                string_count: 0,
            })
        }
        PackKind::Strings => walk_string_chain(buf),
        other => Err(FormatError::UnknownKind(other as u16)),
    }
}

fn walk_string_chain(buf: &[u8]) -> Result<PackSpan> {
    let mut off = 0usize;
    let mut string_count = None;
    loop {
        let header = PackHeader::read(&buf[off..]).map_err(|_| FormatError::Truncated { at: off })?;
        if header.kind != PackKind::Strings {
            return Err(FormatError::Malformed("non-string pack inside string chain"));
        }
        if header.length == 0 {
            // Sentinel closes the chain; its header still occupies space.
            return Ok(PackSpan {
                total: off + STRING_SENTINEL_SIZE,
                string_count: string_count.unwrap_or(0),
            });
        }
        let length = header.length as usize;
        if length < STRING_PACK_HEADER_SIZE || off + length > buf.len() {
            return Err(FormatError::Truncated { at: off });
        }
        if string_count.is_none() {
            let mut c = Cursor::new(&buf[off..off + length]);
            c.seek(16)?;
            string_count = Some(c.u32()?);
        }
        off += length;
    }
}

/// Emit the zero-length sentinel that closes a string-pack chain.
pub fn write_string_sentinel(w: &mut Writer) {
    PackHeader {
        length: 0,
        kind: PackKind::Strings,
    }
    .write(w);
}
