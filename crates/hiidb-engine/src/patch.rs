//! Form patch engine: fetch forms, and insert or delete opcodes at a label.
//!
//! Patches rebuild the whole IFR pack into a fresh buffer and swap it in at
//! the end; no partial buffer is ever installed.

use hiidb_format::cursor::Writer;
use hiidb_format::{
    IfrOp, OpReader, Opcode, PACK_HEADER_SIZE, PackHeader, PackKind,
};

use crate::database::HiiDatabase;
use crate::errors::{HiiError, Result};
use crate::instance::Handle;

/// One patch at a named label.
pub enum FormUpdate<'a> {
    /// Insert this opcode block immediately after the label.
    Insert(&'a [u8]),
    /// Delete the run between the label and the next label or terminator.
    Delete,
}

impl HiiDatabase {
    /// Fetch one form's opcode records, or the whole IFR pack for id 0.
    ///
    /// A non-zero `form_id` returns the records from the matching form
    /// opcode through its end-form, inclusive. `NotFound` when the handle
    /// carries no form or no form has the requested id.
    pub fn get_forms(&self, handle: Handle, form_id: u16) -> Result<Vec<u8>> {
        let instance = &self.entry(handle)?.instance;
        if instance.ifr_size() == 0 {
            return Err(HiiError::NotFound);
        }
        if form_id == 0 {
            return Ok(instance.ifr().to_vec());
        }

        let mut start = None;
        for raw in instance.ops() {
            let raw = raw?;
            match raw.decode()? {
                IfrOp::Form { form_id: id, .. } if id == form_id => {
                    start = Some(raw.offset);
                }
                IfrOp::EndForm => {
                    if let Some(begin) = start {
                        let end = raw.offset + raw.bytes.len();
                        let body = &instance.ifr()[PACK_HEADER_SIZE..];
                        return Ok(body[begin..end].to_vec());
                    }
                }
                _ => {}
            }
        }
        Err(HiiError::NotFound)
    }

    /// Apply one patch at the first label carrying `label_id`.
    ///
    /// `NotFound` when the label does not appear in the stream. An insert
    /// payload must itself be a well-formed opcode block.
    pub fn update_form(
        &mut self,
        handle: Handle,
        label_id: u16,
        update: FormUpdate<'_>,
    ) -> Result<()> {
        if let FormUpdate::Insert(block) = update {
            for raw in OpReader::new(block) {
                raw?;
            }
        }

        let instance = &self.entry(handle)?.instance;
        if instance.ifr_size() == 0 {
            return Err(HiiError::NotFound);
        }
        let body = &instance.ifr()[PACK_HEADER_SIZE..];

        let mut reader = instance.ops();
        let mut label_end = None;
        while let Some(raw) = reader.next() {
            let raw = raw?;
            if let IfrOp::Label { label_id: id } = raw.decode()?
                && id == label_id
            {
                label_end = Some(raw.offset + raw.bytes.len());
                break;
            }
        }
        let label_end = label_end.ok_or(HiiError::NotFound)?;

        let new_body = match update {
            FormUpdate::Insert(block) => {
                let mut out = Vec::with_capacity(body.len() + block.len());
                out.extend_from_slice(&body[..label_end]);
                out.extend_from_slice(block);
                out.extend_from_slice(&body[label_end..]);
                out
            }
            FormUpdate::Delete => {
                // Skip forward to the next label or terminator; neither is
                // deleted.
                let mut resume = body.len();
                for raw in reader {
                    let raw = raw?;
                    let stop = match raw.opcode() {
                        Some(Opcode::Label) => true,
                        Some(op) if op.is_terminator() => true,
                        _ => false,
                    };
                    if stop {
                        resume = raw.offset;
                        break;
                    }
                }
                let mut out = Vec::with_capacity(label_end + body.len() - resume);
                out.extend_from_slice(&body[..label_end]);
                out.extend_from_slice(&body[resume..]);
                out
            }
        };

        let mut w = Writer::with_capacity(PACK_HEADER_SIZE + new_body.len());
        PackHeader {
            length: (PACK_HEADER_SIZE + new_body.len()) as u32,
            kind: PackKind::Ifr,
        }
        .write(&mut w);
        w.bytes(&new_body);

        self.entry_mut(handle)?.instance.replace_ifr(w.finish());
        Ok(())
    }
}
