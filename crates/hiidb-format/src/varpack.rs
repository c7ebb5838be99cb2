//! Variable packs: serialized snapshots of one storage region's bytes.
//!
//! ```text
//! 0  generic header (kind = 6)
//! 8  u16 var_id
//! 10 u16 name_len          bytes of the UTF-16 name, NUL included
//! 12 [u8; 16] guid
//! 28 name, UTF-16LE NUL-terminated
//! .. raw configuration bytes
//! ```
//!
//! Region names are stored compactly (ASCII) inside opcode streams and
//! expanded to UTF-16 here, which is why export sizing doubles them.

use crate::cursor::{Cursor, Writer};
use crate::error::{FormatError, Result};
use crate::guid::Guid;
use crate::pack::{PACK_HEADER_SIZE, PackHeader, PackKind};
use crate::strings::{decode_utf16_z, encode_utf16_z, utf16_len_z};

/// Fixed bytes before the name field.
pub const VARIABLE_PACK_HEADER_SIZE: usize = PACK_HEADER_SIZE + 2 + 2 + 16;

/// One storage region's identity plus a snapshot of its bytes.
///
/// Constructed transiently by the export serializer and the default-image
/// interpreter; never stored back into a package instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariablePack {
    pub var_id: u16,
    pub guid: Guid,
    pub name: String,
    pub data: Vec<u8>,
}

impl VariablePack {
    /// Total encoded span.
    pub fn encoded_len(&self) -> usize {
        VARIABLE_PACK_HEADER_SIZE + utf16_len_z(&self.name) + self.data.len()
    }

    pub fn encode(&self, w: &mut Writer) {
        PackHeader {
            length: self.encoded_len() as u32,
            kind: PackKind::Variable,
        }
        .write(w);
        w.u16(self.var_id);
        w.u16(utf16_len_z(&self.name) as u16);
        w.guid(&self.guid);
        encode_utf16_z(&self.name, w);
        w.bytes(&self.data);
    }

    /// Decode the pack at the start of `buf`; returns the pack and its span.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let header = PackHeader::read(buf)?;
        if header.kind != PackKind::Variable {
            return Err(FormatError::Malformed("not a variable pack"));
        }
        let length = header.length as usize;
        if length < VARIABLE_PACK_HEADER_SIZE || length > buf.len() {
            return Err(FormatError::Truncated { at: 0 });
        }
        let bytes = &buf[..length];
        let mut c = Cursor::new(bytes);
        c.seek(PACK_HEADER_SIZE)?;
        let var_id = c.u16()?;
        let name_len = c.u16()? as usize;
        let guid = c.guid()?;
        if VARIABLE_PACK_HEADER_SIZE + name_len > length {
            return Err(FormatError::Truncated { at: VARIABLE_PACK_HEADER_SIZE });
        }
        let name = decode_utf16_z(bytes, VARIABLE_PACK_HEADER_SIZE)?;
        let data = bytes[VARIABLE_PACK_HEADER_SIZE + name_len..].to_vec();
        Ok((
            Self {
                var_id,
                guid,
                name,
                data,
            },
            length,
        ))
    }
}
