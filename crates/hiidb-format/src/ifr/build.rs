//! Opcode stream builder.
//!
//! Used by ingestion to synthesize stub formsets, by the patch engine's
//! callers to assemble insertion blocks, and throughout the test suites.

use crate::cursor::Writer;
use crate::guid::Guid;
use crate::pack::{PACK_HEADER_SIZE, PackHeader, PackKind};

use super::op::{OP_HEADER_SIZE, Opcode};

/// Builds an opcode stream record by record.
#[derive(Default)]
pub struct IfrBuilder {
    w: Writer,
}

impl IfrBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn op(&mut self, op: Opcode, payload_len: usize, fill: impl FnOnce(&mut Writer)) -> &mut Self {
        let len = OP_HEADER_SIZE + payload_len;
        debug_assert!(len <= u8::MAX as usize, "opcode record too long");
        self.w.u8(op as u8);
        self.w.u8(len as u8);
        let before = self.w.len();
        fill(&mut self.w);
        debug_assert_eq!(self.w.len() - before, payload_len);
        self
    }

    pub fn form_set(
        &mut self,
        guid: &Guid,
        title: u16,
        help: u16,
        class: u16,
        subclass: u16,
        nv_size: u16,
    ) -> &mut Self {
        self.op(Opcode::FormSet, 16 + 10, |w| {
            w.guid(guid);
            w.u16(title);
            w.u16(help);
            w.u16(class);
            w.u16(subclass);
            w.u16(nv_size);
        })
    }

    pub fn end_form_set(&mut self) -> &mut Self {
        self.op(Opcode::EndFormSet, 0, |_| {})
    }

    pub fn form(&mut self, form_id: u16, title: u16) -> &mut Self {
        self.op(Opcode::Form, 4, |w| {
            w.u16(form_id);
            w.u16(title);
        })
    }

    pub fn end_form(&mut self) -> &mut Self {
        self.op(Opcode::EndForm, 0, |_| {})
    }

    pub fn subtitle(&mut self, text: u16) -> &mut Self {
        self.op(Opcode::Subtitle, 2, |w| w.u16(text))
    }

    pub fn text(&mut self, help: u16, text: u16, text_two: u16) -> &mut Self {
        self.op(Opcode::Text, 6, |w| {
            w.u16(help);
            w.u16(text);
            w.u16(text_two);
        })
    }

    pub fn one_of(&mut self, offset: u16, width: u8, prompt: u16, help: u16) -> &mut Self {
        self.op(Opcode::OneOf, 7, |w| {
            w.u16(offset);
            w.u8(width);
            w.u16(prompt);
            w.u16(help);
        })
    }

    pub fn one_of_option(&mut self, option: u16, value: u16, flags: u8) -> &mut Self {
        self.op(Opcode::OneOfOption, 5, |w| {
            w.u16(option);
            w.u16(value);
            w.u8(flags);
        })
    }

    pub fn end_one_of(&mut self) -> &mut Self {
        self.op(Opcode::EndOneOf, 0, |_| {})
    }

    pub fn checkbox(
        &mut self,
        offset: u16,
        width: u8,
        prompt: u16,
        help: u16,
        flags: u8,
    ) -> &mut Self {
        self.op(Opcode::Checkbox, 8, |w| {
            w.u16(offset);
            w.u8(width);
            w.u16(prompt);
            w.u16(help);
            w.u8(flags);
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn numeric(
        &mut self,
        offset: u16,
        width: u8,
        prompt: u16,
        help: u16,
        min: u16,
        max: u16,
        step: u16,
        default: u16,
    ) -> &mut Self {
        self.op(Opcode::Numeric, 15, |w| {
            w.u16(offset);
            w.u8(width);
            w.u16(prompt);
            w.u16(help);
            w.u16(min);
            w.u16(max);
            w.u16(step);
            w.u16(default);
        })
    }

    pub fn password(
        &mut self,
        offset: u16,
        width: u8,
        min_size: u8,
        max_size: u8,
        prompt: u16,
        help: u16,
    ) -> &mut Self {
        self.op(Opcode::Password, 9, |w| {
            w.u16(offset);
            w.u8(width);
            w.u8(min_size);
            w.u8(max_size);
            w.u16(prompt);
            w.u16(help);
        })
    }

    pub fn string_field(
        &mut self,
        offset: u16,
        width: u8,
        min_size: u8,
        max_size: u8,
        prompt: u16,
        help: u16,
    ) -> &mut Self {
        self.op(Opcode::StringField, 9, |w| {
            w.u16(offset);
            w.u8(width);
            w.u8(min_size);
            w.u8(max_size);
            w.u16(prompt);
            w.u16(help);
        })
    }

    pub fn ordered_list(
        &mut self,
        offset: u16,
        max_entries: u8,
        prompt: u16,
        help: u16,
    ) -> &mut Self {
        self.op(Opcode::OrderedList, 7, |w| {
            w.u16(offset);
            w.u8(max_entries);
            w.u16(prompt);
            w.u16(help);
        })
    }

    pub fn label(&mut self, label_id: u16) -> &mut Self {
        self.op(Opcode::Label, 2, |w| w.u16(label_id))
    }

    pub fn var_store(&mut self, guid: &Guid, var_id: u16, size: u16, name: &str) -> &mut Self {
        debug_assert!(name.is_ascii(), "varstore names are ASCII");
        self.op(Opcode::VarStore, 16 + 4 + name.len() + 1, |w| {
            w.guid(guid);
            w.u16(var_id);
            w.u16(size);
            w.bytes(name.as_bytes());
            w.u8(0);
        })
    }

    pub fn var_store_select(&mut self, var_id: u16) -> &mut Self {
        self.op(Opcode::VarStoreSelect, 2, |w| w.u16(var_id))
    }

    /// The bare opcode stream, no pack header. This is the shape the form
    /// patch engine accepts as an insertion block.
    pub fn into_ops(self) -> Vec<u8> {
        self.w.finish()
    }

    /// Wrap the stream in an IFR pack header.
    pub fn into_pack(self) -> Vec<u8> {
        let body = self.w.finish();
        let mut w = Writer::with_capacity(PACK_HEADER_SIZE + body.len());
        PackHeader {
            length: (PACK_HEADER_SIZE + body.len()) as u32,
            kind: PackKind::Ifr,
        }
        .write(&mut w);
        w.bytes(&body);
        w.finish()
    }
}

/// Minimal formset pack carrying only an identity.
///
/// Ingestion installs one of these when string packs arrive without a form
/// pack, so the resulting instance stays addressable by GUID.
pub fn stub_formset(guid: &Guid) -> Vec<u8> {
    let mut b = IfrBuilder::new();
    b.form_set(guid, 0, 0, 0, 0, 0).end_form_set();
    b.into_pack()
}
