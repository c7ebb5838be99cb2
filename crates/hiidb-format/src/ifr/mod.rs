//! Form-description opcode streams.
//!
//! An IFR pack is a generic pack header followed by self-describing records:
//! `[op: u8][len: u8][payload]`, where `len` covers the whole record. The
//! stream for one formset opens with `FormSet` and closes with `EndFormSet`.

mod build;
mod op;
mod record;


pub use build::{IfrBuilder, stub_formset};
pub use op::{
    FLAG_DEFAULT, FLAG_INTERACTIVE, FLAG_MANUFACTURING, OP_HEADER_SIZE, Opcode,
};
pub use record::{IfrOp, OpReader, RawOp};
