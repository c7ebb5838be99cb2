//! String packs: one language's string table.
//!
//! Layout (offsets are pack-relative, all fields little-endian):
//!
//! ```text
//! 0  u32 length            whole pack span (header + offsets + strings)
//! 4  u16 kind = 2
//! 6  u16 reserved
//! 8  u32 language_offset   offset of the language-name string
//! 12 u32 printable_offset  offset of the display-name string
//! 16 u32 string_count      offset-array slots; slot i addresses token i+1
//! 20 u32 attributes
//! 24 u32 × string_count    string offsets
//! .. UTF-16LE NUL-terminated string data
//! ```
//!
//! Token 0 is reserved and has no slot. The language tag is the first three
//! UTF-16 code units of the language-name string; secondary tags may follow
//! in further groups of three.
//!
//! The canonical encoding emitted by [`StringPackModel::encode`] places the
//! language name first, then the printable name, then tokens in order. Every
//! splice rebuilds the edited pack through the model, so offset and length
//! fields are always recomputed from scratch rather than patched.

use crate::cursor::{Cursor, Writer};
use crate::error::{FormatError, Result};
use crate::pack::{PACK_HEADER_SIZE, PackHeader, PackKind};

/// Size of the string pack header, offset array excluded.
pub const STRING_PACK_HEADER_SIZE: usize = 24;

/// Width of one offset-array slot.
pub const STRING_OFFSET_SIZE: usize = 4;

/// Decoded string pack header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StringPackHeader {
    pub length: u32,
    pub language_offset: u32,
    pub printable_offset: u32,
    pub string_count: u32,
    pub attributes: u32,
}

impl StringPackHeader {
    pub fn read(buf: &[u8]) -> Result<Self> {
        let header = PackHeader::read(buf)?;
        if header.kind != PackKind::Strings {
            return Err(FormatError::Malformed("not a string pack"));
        }
        let mut c = Cursor::new(buf);
        c.seek(PACK_HEADER_SIZE)?;
        Ok(Self {
            length: header.length,
            language_offset: c.u32()?,
            printable_offset: c.u32()?,
            string_count: c.u32()?,
            attributes: c.u32()?,
        })
    }
}

/// Borrowed view of one string pack within a chain.
#[derive(Clone, Copy)]
pub struct StringPack<'a> {
    bytes: &'a [u8],
    header: StringPackHeader,
}

impl<'a> StringPack<'a> {
    /// Parse the pack at the start of `buf`; the view covers exactly the
    /// pack's declared span.
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let header = StringPackHeader::read(buf)?;
        let length = header.length as usize;
        if length < STRING_PACK_HEADER_SIZE || length > buf.len() {
            return Err(FormatError::Truncated { at: 0 });
        }
        Ok(Self {
            bytes: &buf[..length],
            header,
        })
    }

    pub fn header(&self) -> &StringPackHeader {
        &self.header
    }

    /// The pack's raw bytes, header included.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Highest token addressable in this pack.
    pub fn token_count(&self) -> u16 {
        self.header.string_count as u16
    }

    /// Full language tag: primary code plus any secondary codes.
    pub fn language(&self) -> Result<String> {
        decode_utf16_z(self.bytes, self.header.language_offset as usize)
    }

    /// Whether this pack serves the requested language.
    ///
    /// Comparison is ASCII case-insensitive on three-letter groups: the
    /// requested primary code is checked against the pack's primary code and
    /// each secondary code in turn.
    pub fn matches_language(&self, requested: &str) -> bool {
        let Ok(tag) = self.language() else {
            return false;
        };
        let want: String = requested.chars().take(3).collect();
        let groups = tag.as_bytes().chunks(3);
        for group in groups {
            if group.len() == 3 && want.as_bytes().eq_ignore_ascii_case(group) {
                return true;
            }
        }
        false
    }

    /// Pack-relative offset of one token's string, if the token is in range.
    pub fn offset_of(&self, token: u16) -> Result<Option<u32>> {
        if token == 0 || u32::from(token) > self.header.string_count {
            return Ok(None);
        }
        let slot = STRING_PACK_HEADER_SIZE + (token as usize - 1) * STRING_OFFSET_SIZE;
        let mut c = Cursor::new(self.bytes);
        c.seek(slot)?;
        Ok(Some(c.u32()?))
    }

    /// Decode one token's string. `None` when the token is out of range.
    pub fn string(&self, token: u16) -> Result<Option<String>> {
        match self.offset_of(token)? {
            None | Some(0) => Ok(None),
            Some(off) => decode_utf16_z(self.bytes, off as usize).map(Some),
        }
    }
}

/// Iterator over the non-sentinel packs of a string-pack chain.
pub struct StringChain<'a> {
    buf: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> StringChain<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            done: buf.is_empty(),
        }
    }
}

impl<'a> Iterator for StringChain<'a> {
    type Item = Result<StringPack<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let header = match PackHeader::read(&self.buf[self.pos..]) {
            Ok(h) => h,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if header.length == 0 {
            self.done = true;
            return None;
        }
        let pack = StringPack::parse(&self.buf[self.pos..]);
        match &pack {
            Ok(p) => self.pos += p.as_bytes().len(),
            Err(_) => self.done = true,
        }
        Some(pack)
    }
}

/// Owned, mutable form of one string pack.
///
/// `strings[i]` holds token `i + 1`; token 0 never materializes. Encoding is
/// canonical, so decoding and re-encoding an unchanged model reproduces the
/// same bytes the model was decoded from (for packs already in canonical
/// order).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringPackModel {
    pub language: String,
    pub printable: String,
    pub attributes: u32,
    pub strings: Vec<String>,
}

impl StringPackModel {
    pub fn new(language: impl Into<String>, printable: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            printable: printable.into(),
            attributes: 0,
            strings: Vec::new(),
        }
    }

    /// Decode a borrowed pack into an owned model.
    pub fn decode(pack: &StringPack<'_>) -> Result<Self> {
        let header = pack.header();
        let bytes = pack.as_bytes();
        let language = decode_utf16_z(bytes, header.language_offset as usize)?;
        let printable = decode_utf16_z(bytes, header.printable_offset as usize)?;
        let mut strings = Vec::with_capacity(header.string_count as usize);
        for token in 1..=header.string_count as u16 {
            strings.push(pack.string(token)?.unwrap_or_default());
        }
        Ok(Self {
            language,
            printable,
            attributes: header.attributes,
            strings,
        })
    }

    /// Total encoded span of this pack.
    pub fn encoded_len(&self) -> usize {
        let mut len =
            STRING_PACK_HEADER_SIZE + self.strings.len() * STRING_OFFSET_SIZE;
        len += utf16_len_z(&self.language);
        len += utf16_len_z(&self.printable);
        for s in &self.strings {
            len += utf16_len_z(s);
        }
        len
    }

    /// Emit the canonical encoding: header, offset array, language name,
    /// printable name, then token strings in order.
    pub fn encode(&self, w: &mut Writer) {
        let total = self.encoded_len();
        PackHeader {
            length: total as u32,
            kind: PackKind::Strings,
        }
        .write(w);

        let text_base = STRING_PACK_HEADER_SIZE + self.strings.len() * STRING_OFFSET_SIZE;
        let language_offset = text_base;
        let printable_offset = language_offset + utf16_len_z(&self.language);
        let mut next = printable_offset + utf16_len_z(&self.printable);

        w.u32(language_offset as u32);
        w.u32(printable_offset as u32);
        w.u32(self.strings.len() as u32);
        w.u32(self.attributes);

        for s in &self.strings {
            w.u32(next as u32);
            next += utf16_len_z(s);
        }
        debug_assert_eq!(next, total);

        encode_utf16_z(&self.language, w);
        encode_utf16_z(&self.printable, w);
        for s in &self.strings {
            encode_utf16_z(s, w);
        }
    }
}

/// Byte length of a string encoded as NUL-terminated UTF-16LE.
pub fn utf16_len_z(s: &str) -> usize {
    (s.encode_utf16().count() + 1) * 2
}

/// Emit a string as NUL-terminated UTF-16LE.
pub fn encode_utf16_z(s: &str, w: &mut Writer) {
    for unit in s.encode_utf16() {
        w.u16(unit);
    }
    w.u16(0);
}

/// Decode a NUL-terminated UTF-16LE string starting at `offset`.
pub fn decode_utf16_z(buf: &[u8], offset: usize) -> Result<String> {
    let mut c = Cursor::new(buf);
    c.seek(offset)?;
    let mut units = Vec::new();
    loop {
        let unit = c.u16()?;
        if unit == 0 {
            break;
        }
        units.push(unit);
    }
    String::from_utf16(&units).map_err(|_| FormatError::Malformed("invalid UTF-16 string"))
}
