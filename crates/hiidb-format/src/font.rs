//! Font packs: narrow and wide glyph bitmaps.
//!
//! ```text
//! 0  generic header (kind = 3)
//! 8  u16 narrow_count
//! 10 u16 wide_count
//! 12 narrow glyphs, 22 bytes each
//! .. wide glyphs, 44 bytes each
//! ```

use crate::cursor::{Cursor, Writer};
use crate::error::{FormatError, Result};
use crate::pack::{PACK_HEADER_SIZE, PackHeader, PackKind};

/// Glyph cell height in rows.
pub const GLYPH_HEIGHT: usize = 19;
/// Encoded size of one narrow (8-pixel) glyph.
pub const NARROW_GLYPH_SIZE: usize = 2 + 1 + GLYPH_HEIGHT;
/// Encoded size of one wide (16-pixel) glyph.
pub const WIDE_GLYPH_SIZE: usize = 2 + 1 + 2 * GLYPH_HEIGHT + 3;

/// Glyph attribute: composes over the previous glyph instead of advancing.
pub const GLYPH_NON_SPACING: u8 = 0x01;

/// 8-pixel-wide glyph bitmap. `weight == 0` marks an unset slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NarrowGlyph {
    pub weight: u16,
    pub attributes: u8,
    pub bitmap: [u8; GLYPH_HEIGHT],
}

impl Default for NarrowGlyph {
    fn default() -> Self {
        Self {
            weight: 0,
            attributes: 0,
            bitmap: [0; GLYPH_HEIGHT],
        }
    }
}

/// 16-pixel-wide glyph bitmap, stored as two 8-pixel columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WideGlyph {
    pub weight: u16,
    pub attributes: u8,
    pub left: [u8; GLYPH_HEIGHT],
    pub right: [u8; GLYPH_HEIGHT],
}

impl Default for WideGlyph {
    fn default() -> Self {
        Self {
            weight: 0,
            attributes: 0,
            left: [0; GLYPH_HEIGHT],
            right: [0; GLYPH_HEIGHT],
        }
    }
}

/// Decode a font pack into its glyph lists.
pub fn parse_font_pack(buf: &[u8]) -> Result<(Vec<NarrowGlyph>, Vec<WideGlyph>)> {
    let header = PackHeader::read(buf)?;
    if header.kind != PackKind::Font {
        return Err(FormatError::Malformed("not a font pack"));
    }
    let length = header.length as usize;
    if length > buf.len() {
        return Err(FormatError::Truncated { at: 0 });
    }
    let mut c = Cursor::new(&buf[..length]);
    c.seek(PACK_HEADER_SIZE)?;
    let narrow_count = c.u16()? as usize;
    let wide_count = c.u16()? as usize;

    let mut narrow = Vec::with_capacity(narrow_count);
    for _ in 0..narrow_count {
        let weight = c.u16()?;
        let attributes = c.u8()?;
        let bitmap: [u8; GLYPH_HEIGHT] = c.take(GLYPH_HEIGHT)?.try_into().unwrap();
        narrow.push(NarrowGlyph {
            weight,
            attributes,
            bitmap,
        });
    }

    let mut wide = Vec::with_capacity(wide_count);
    for _ in 0..wide_count {
        let weight = c.u16()?;
        let attributes = c.u8()?;
        let left: [u8; GLYPH_HEIGHT] = c.take(GLYPH_HEIGHT)?.try_into().unwrap();
        let right: [u8; GLYPH_HEIGHT] = c.take(GLYPH_HEIGHT)?.try_into().unwrap();
        c.skip(3)?;
        wide.push(WideGlyph {
            weight,
            attributes,
            left,
            right,
        });
    }
    Ok((narrow, wide))
}

/// Encode a font pack from glyph lists.
pub fn build_font_pack(narrow: &[NarrowGlyph], wide: &[WideGlyph]) -> Vec<u8> {
    let total = PACK_HEADER_SIZE + 4 + narrow.len() * NARROW_GLYPH_SIZE + wide.len() * WIDE_GLYPH_SIZE;
    let mut w = Writer::with_capacity(total);
    PackHeader {
        length: total as u32,
        kind: PackKind::Font,
    }
    .write(&mut w);
    w.u16(narrow.len() as u16);
    w.u16(wide.len() as u16);
    for g in narrow {
        w.u16(g.weight);
        w.u8(g.attributes);
        w.bytes(&g.bitmap);
    }
    for g in wide {
        w.u16(g.weight);
        w.u8(g.attributes);
        w.bytes(&g.left);
        w.bytes(&g.right);
        w.bytes(&[0; 3]);
    }
    w.finish()
}
