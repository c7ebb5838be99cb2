//! Raw and typed opcode records.

use crate::cursor::Cursor;
use crate::error::{FormatError, Result};
use crate::guid::Guid;

use super::op::{OP_HEADER_SIZE, Opcode};

/// One undecoded record: tag, position, and the record's full byte span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawOp<'a> {
    /// Byte offset of the record within the stream the reader was built over.
    pub offset: usize,
    /// Raw tag byte; may name an opcode this crate does not know.
    pub tag: u8,
    /// The whole record, `[op][len]` header included.
    pub bytes: &'a [u8],
}

impl<'a> RawOp<'a> {
    /// The known opcode for this tag, if any.
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_u8(self.tag)
    }

    /// Payload bytes after the record header.
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[OP_HEADER_SIZE..]
    }

    /// Decode into a typed record. Unknown tags decode to [`IfrOp::Unknown`];
    /// known tags with short payloads report truncation.
    pub fn decode(&self) -> Result<IfrOp> {
        let Some(op) = self.opcode() else {
            return Ok(IfrOp::Unknown { tag: self.tag });
        };
        let mut c = Cursor::new(self.payload());
        let decoded = match op {
            Opcode::Form => IfrOp::Form {
                form_id: c.u16()?,
                title: c.u16()?,
            },
            Opcode::Subtitle => IfrOp::Subtitle { text: c.u16()? },
            Opcode::Text => IfrOp::Text {
                help: c.u16()?,
                text: c.u16()?,
                text_two: c.u16()?,
            },
            Opcode::OneOf => IfrOp::OneOf {
                offset: c.u16()?,
                width: c.u8()?,
                prompt: c.u16()?,
                help: c.u16()?,
            },
            Opcode::Checkbox => IfrOp::Checkbox {
                offset: c.u16()?,
                width: c.u8()?,
                prompt: c.u16()?,
                help: c.u16()?,
                flags: c.u8()?,
            },
            Opcode::Numeric => IfrOp::Numeric {
                offset: c.u16()?,
                width: c.u8()?,
                prompt: c.u16()?,
                help: c.u16()?,
                min: c.u16()?,
                max: c.u16()?,
                step: c.u16()?,
                default: c.u16()?,
            },
            Opcode::Password => IfrOp::Password {
                offset: c.u16()?,
                width: c.u8()?,
                min_size: c.u8()?,
                max_size: c.u8()?,
                prompt: c.u16()?,
                help: c.u16()?,
            },
            Opcode::OneOfOption => IfrOp::OneOfOption {
                option: c.u16()?,
                value: c.u16()?,
                flags: c.u8()?,
            },
            Opcode::StringField => IfrOp::StringField {
                offset: c.u16()?,
                width: c.u8()?,
                min_size: c.u8()?,
                max_size: c.u8()?,
                prompt: c.u16()?,
                help: c.u16()?,
            },
            Opcode::EndForm => IfrOp::EndForm,
            Opcode::EndFormSet => IfrOp::EndFormSet,
            Opcode::FormSet => IfrOp::FormSet {
                guid: c.guid()?,
                title: c.u16()?,
                help: c.u16()?,
                class: c.u16()?,
                subclass: c.u16()?,
                nv_size: c.u16()?,
            },
            Opcode::EndOneOf => IfrOp::EndOneOf,
            Opcode::Label => IfrOp::Label { label_id: c.u16()? },
            Opcode::OrderedList => IfrOp::OrderedList {
                offset: c.u16()?,
                max_entries: c.u8()?,
                prompt: c.u16()?,
                help: c.u16()?,
            },
            Opcode::VarStore => {
                let guid = c.guid()?;
                let var_id = c.u16()?;
                let size = c.u16()?;
                let name_bytes = c.take(c.remaining())?;
                let name = std::str::from_utf8(name_bytes)
                    .map_err(|_| FormatError::Malformed("varstore name is not ASCII"))?
                    .trim_end_matches('\0')
                    .to_owned();
                IfrOp::VarStore {
                    guid,
                    var_id,
                    size,
                    name,
                }
            }
            Opcode::VarStoreSelect => IfrOp::VarStoreSelect { var_id: c.u16()? },
        };
        Ok(decoded)
    }
}

/// Typed opcode records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IfrOp {
    Form { form_id: u16, title: u16 },
    Subtitle { text: u16 },
    Text { help: u16, text: u16, text_two: u16 },
    OneOf { offset: u16, width: u8, prompt: u16, help: u16 },
    Checkbox { offset: u16, width: u8, prompt: u16, help: u16, flags: u8 },
    Numeric {
        offset: u16,
        width: u8,
        prompt: u16,
        help: u16,
        min: u16,
        max: u16,
        step: u16,
        default: u16,
    },
    Password { offset: u16, width: u8, min_size: u8, max_size: u8, prompt: u16, help: u16 },
    OneOfOption { option: u16, value: u16, flags: u8 },
    StringField { offset: u16, width: u8, min_size: u8, max_size: u8, prompt: u16, help: u16 },
    EndForm,
    EndFormSet,
    FormSet {
        guid: Guid,
        title: u16,
        help: u16,
        class: u16,
        subclass: u16,
        nv_size: u16,
    },
    EndOneOf,
    Label { label_id: u16 },
    OrderedList { offset: u16, max_entries: u8, prompt: u16, help: u16 },
    VarStore { guid: Guid, var_id: u16, size: u16, name: String },
    VarStoreSelect { var_id: u16 },
    /// A record with a tag this crate does not know; skipped by walkers.
    Unknown { tag: u8 },
}

/// Restartable iterator over an opcode stream.
///
/// The stream is the body of an IFR pack (or any caller-supplied opcode
/// block); the generic pack header is not part of it. Iteration yields each
/// record in order and stops cleanly at the end of the slice.
#[derive(Clone)]
pub struct OpReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> OpReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Byte offset the next record would start at.
    pub fn pos(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for OpReader<'a> {
    type Item = Result<RawOp<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let offset = self.pos;
        if self.buf.len() - offset < OP_HEADER_SIZE {
            self.pos = self.buf.len();
            return Some(Err(FormatError::Truncated { at: offset }));
        }
        let tag = self.buf[offset];
        let len = self.buf[offset + 1] as usize;
        if len < OP_HEADER_SIZE {
            self.pos = self.buf.len();
            return Some(Err(FormatError::BadOpcodeLength {
                len: len as u8,
                at: offset,
            }));
        }
        if offset + len > self.buf.len() {
            self.pos = self.buf.len();
            return Some(Err(FormatError::Truncated { at: offset }));
        }
        self.pos = offset + len;
        Some(Ok(RawOp {
            offset,
            tag,
            bytes: &self.buf[offset..offset + len],
        }))
    }
}
