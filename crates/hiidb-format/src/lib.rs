//! Wire format for firmware setup resource packs.
//!
//! This crate defines the binary contracts of the resource database:
//! - Generic pack headers and the pack walker
//! - String packs (per-language string tables with offset arrays)
//! - IFR opcode streams (typed reader, builder)
//! - Font, keyboard, and variable packs
//! - Export buffer headers
//!
//! All multi-byte fields are little-endian and byte-packed; packs arrive
//! unaligned, so every access goes through the bounds-checked cursor.

pub mod cursor;
pub mod dump;
pub mod error;
pub mod export;
pub mod font;
pub mod guid;
pub mod ifr;
pub mod keyboard;
pub mod pack;
pub mod strings;
pub mod varpack;

#[cfg(test)]
mod cursor_tests;
#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod varpack_tests;

// Re-export commonly used items at crate root
pub use cursor::{Cursor, Writer};
pub use error::{FormatError, Result};
pub use export::{
    DATA_TABLE_HEADER_SIZE, DataTableHeader, EXPORT_HEADER_SIZE, EXPORT_REVISION, ExportHeader,
};
pub use font::{
    GLYPH_HEIGHT, GLYPH_NON_SPACING, NARROW_GLYPH_SIZE, NarrowGlyph, WIDE_GLYPH_SIZE, WideGlyph,
    build_font_pack, parse_font_pack,
};
pub use guid::Guid;
pub use ifr::{
    FLAG_DEFAULT, FLAG_INTERACTIVE, FLAG_MANUFACTURING, IfrBuilder, IfrOp, OP_HEADER_SIZE,
    OpReader, Opcode, RawOp, stub_formset,
};
pub use keyboard::{
    KEY_DESCRIPTOR_SIZE, KEYBOARD_KEY_COUNT, KeyDescriptor, build_keyboard_pack,
    parse_keyboard_pack,
};
pub use pack::{
    PACK_HEADER_SIZE, PackHeader, PackKind, PackSpan, STRING_SENTINEL_SIZE, walk_pack,
    write_string_sentinel,
};
pub use strings::{
    STRING_OFFSET_SIZE, STRING_PACK_HEADER_SIZE, StringChain, StringPack, StringPackHeader,
    StringPackModel, decode_utf16_z, encode_utf16_z, utf16_len_z,
};
pub use varpack::{VARIABLE_PACK_HEADER_SIZE, VariablePack};
