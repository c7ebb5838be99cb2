//! Keyboard layout packs.
//!
//! ```text
//! 0  generic header (kind = 4)
//! 8  u8  descriptor_count   (0..=105)
//! 9  [u8; 3] reserved
//! 12 descriptors, 10 bytes each
//! ```
//!
//! A descriptor count of zero is meaningful: it clears the override layout.

use crate::cursor::{Cursor, Writer};
use crate::error::{FormatError, Result};
use crate::pack::{PACK_HEADER_SIZE, PackHeader, PackKind};

/// Slots in a layout table; descriptors address slots by key code.
pub const KEYBOARD_KEY_COUNT: usize = 106;
/// Encoded size of one key descriptor.
pub const KEY_DESCRIPTOR_SIZE: usize = 10;

/// One key's mapping under every modifier combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub key: u8,
    pub unicode: u16,
    pub shifted: u16,
    pub alt_gr: u16,
    pub shifted_alt_gr: u16,
    pub modifier: u8,
}

/// Decode a keyboard pack into its descriptor list.
pub fn parse_keyboard_pack(buf: &[u8]) -> Result<Vec<KeyDescriptor>> {
    let header = PackHeader::read(buf)?;
    if header.kind != PackKind::Keyboard {
        return Err(FormatError::Malformed("not a keyboard pack"));
    }
    let length = header.length as usize;
    if length > buf.len() {
        return Err(FormatError::Truncated { at: 0 });
    }
    let mut c = Cursor::new(&buf[..length]);
    c.seek(PACK_HEADER_SIZE)?;
    let count = c.u8()? as usize;
    if count >= KEYBOARD_KEY_COUNT {
        return Err(FormatError::Malformed("keyboard descriptor count out of range"));
    }
    c.skip(3)?;
    let mut descriptors = Vec::with_capacity(count);
    for _ in 0..count {
        descriptors.push(KeyDescriptor {
            key: c.u8()?,
            unicode: c.u16()?,
            shifted: c.u16()?,
            alt_gr: c.u16()?,
            shifted_alt_gr: c.u16()?,
            modifier: c.u8()?,
        });
    }
    Ok(descriptors)
}

/// Encode a keyboard pack from a descriptor list.
pub fn build_keyboard_pack(descriptors: &[KeyDescriptor]) -> Vec<u8> {
    debug_assert!(descriptors.len() < KEYBOARD_KEY_COUNT);
    let total = PACK_HEADER_SIZE + 4 + descriptors.len() * KEY_DESCRIPTOR_SIZE;
    let mut w = Writer::with_capacity(total);
    PackHeader {
        length: total as u32,
        kind: PackKind::Keyboard,
    }
    .write(&mut w);
    w.u8(descriptors.len() as u8);
    w.bytes(&[0; 3]);
    for d in descriptors {
        w.u8(d.key);
        w.u16(d.unicode);
        w.u16(d.shifted);
        w.u16(d.alt_gr);
        w.u16(d.shifted_alt_gr);
        w.u8(d.modifier);
    }
    w.finish()
}
