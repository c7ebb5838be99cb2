//! Formset and storage-region identity GUIDs.
//!
//! GUIDs travel on the wire as 16 raw bytes in mixed-endian layout
//! (little-endian first three fields, big-endian tail), the same byte
//! order they are declared with in `from_fields`.

use std::fmt;

/// 16-byte identity GUID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid([u8; 16]);

impl Guid {
    /// The all-zero GUID, used when a caller supplies no identity.
    pub const ZERO: Guid = Guid([0; 16]);

    /// Build from the conventional `(u32, u16, u16, [u8; 8])` fields.
    pub const fn from_fields(a: u32, b: u16, c: u16, d: [u8; 8]) -> Self {
        let a = a.to_le_bytes();
        let b = b.to_le_bytes();
        let c = c.to_le_bytes();
        Guid([
            a[0], a[1], a[2], a[3], b[0], b[1], c[0], c[1], d[0], d[1], d[2], d[3], d[4], d[5],
            d[6], d[7],
        ])
    }

    /// Wrap 16 raw wire bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Guid(bytes)
    }

    /// Read from the start of a slice. `None` if fewer than 16 bytes remain.
    pub fn read(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 16] = bytes.get(..16)?.try_into().ok()?;
        Some(Guid(raw))
    }

    /// Raw wire bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 16]
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        let a = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        let s1 = u16::from_le_bytes([b[4], b[5]]);
        let s2 = u16::from_le_bytes([b[6], b[7]]);
        write!(
            f,
            "{a:08x}-{s1:04x}-{s2:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
        )
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({self})")
    }
}
