//! Export buffer headers.
//!
//! The export serializer flattens the handle database into a layout distinct
//! from internal storage: a fixed header, then one data table per handle.
//! Section offsets inside a data table are relative to the table's own
//! start; an offset of 0 means the section is absent.

use crate::cursor::{Cursor, Writer};
use crate::error::Result;
use crate::guid::Guid;

/// Size of the export buffer header.
pub const EXPORT_HEADER_SIZE: usize = 20;
/// Size of one data-table header.
pub const DATA_TABLE_HEADER_SIZE: usize = 48;

/// Identity of this export layout revision.
pub const EXPORT_REVISION: Guid = Guid::from_fields(
    0x1f5d209c,
    0x4b66,
    0x4e43,
    [0x89, 0x3b, 0x07, 0x3d, 0x9e, 0x5c, 0x3a, 0x61],
);

/// Export buffer header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportHeader {
    pub table_count: u32,
    pub revision: Guid,
}

impl ExportHeader {
    pub fn read(buf: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(buf);
        Ok(Self {
            table_count: c.u32()?,
            revision: c.guid()?,
        })
    }

    pub fn write(&self, w: &mut Writer) {
        w.u32(self.table_count);
        w.guid(&self.revision);
    }
}

/// Per-handle data-table header.
///
/// Section order in the table body: device-path stub, variable packs, raw
/// IFR pack, raw string-pack chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DataTableHeader {
    pub handle: u16,
    pub guid: Guid,
    pub table_size: u32,
    pub device_path_offset: u32,
    pub variable_offset: u32,
    pub variable_count: u32,
    pub ifr_offset: u32,
    pub string_offset: u32,
    pub language_count: u16,
}

impl DataTableHeader {
    pub fn read(buf: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(buf);
        let handle = c.u16()?;
        c.skip(2)?;
        Ok(Self {
            handle,
            guid: c.guid()?,
            table_size: c.u32()?,
            device_path_offset: c.u32()?,
            variable_offset: c.u32()?,
            variable_count: c.u32()?,
            ifr_offset: c.u32()?,
            string_offset: c.u32()?,
            language_count: c.u16()?,
        })
    }

    pub fn write(&self, w: &mut Writer) {
        w.u16(self.handle);
        w.u16(0);
        w.guid(&self.guid);
        w.u32(self.table_size);
        w.u32(self.device_path_offset);
        w.u32(self.variable_offset);
        w.u32(self.variable_count);
        w.u32(self.ifr_offset);
        w.u32(self.string_offset);
        w.u16(self.language_count);
        w.u16(0);
    }
}
