//! Human-readable rendering of a package's opcode stream and string packs.
//!
//! Debug/diagnostic aid; the output is covered by snapshot tests and kept
//! stable, but it is not a wire format.

use std::fmt::Write as _;

use crate::ifr::{FLAG_DEFAULT, FLAG_INTERACTIVE, FLAG_MANUFACTURING, IfrOp, OpReader};
use crate::pack::PACK_HEADER_SIZE;
use crate::strings::StringChain;

/// Render an IFR pack (header included) and a string-pack chain.
pub fn dump(ifr_pack: &[u8], strings: &[u8]) -> String {
    let mut out = String::new();
    if ifr_pack.len() > PACK_HEADER_SIZE {
        dump_ops(&ifr_pack[PACK_HEADER_SIZE..], &mut out);
    }
    dump_strings(strings, &mut out);
    out
}

fn dump_ops(body: &[u8], out: &mut String) {
    let mut depth = 0usize;
    for raw in OpReader::new(body) {
        let Ok(raw) = raw else {
            out.push_str("!! truncated opcode stream\n");
            return;
        };
        let op = match raw.decode() {
            Ok(op) => op,
            Err(_) => {
                let _ = writeln!(out, "{}!! bad opcode {:#04x}", indent(depth), raw.tag);
                continue;
            }
        };
        if matches!(
            op,
            IfrOp::EndForm | IfrOp::EndFormSet | IfrOp::EndOneOf
        ) {
            depth = depth.saturating_sub(1);
        }
        let pad = indent(depth);
        match &op {
            IfrOp::FormSet {
                guid,
                title,
                nv_size,
                ..
            } => {
                let _ = writeln!(out, "{pad}formset {guid} title={title} nv={nv_size}");
                depth += 1;
            }
            IfrOp::Form { form_id, title } => {
                let _ = writeln!(out, "{pad}form {form_id} title={title}");
                depth += 1;
            }
            IfrOp::OneOf { offset, width, .. } => {
                let _ = writeln!(out, "{pad}one-of offset={offset} width={width}");
                depth += 1;
            }
            IfrOp::OneOfOption { value, flags, .. } => {
                let _ = writeln!(out, "{pad}option value={value}{}", render_flags(*flags));
            }
            IfrOp::Checkbox { offset, flags, .. } => {
                let _ = writeln!(out, "{pad}checkbox offset={offset}{}", render_flags(*flags));
            }
            IfrOp::Numeric {
                offset,
                width,
                default,
                ..
            } => {
                let _ = writeln!(out, "{pad}numeric offset={offset} width={width} default={default}");
            }
            IfrOp::Password { offset, .. } => {
                let _ = writeln!(out, "{pad}password offset={offset}");
            }
            IfrOp::StringField { offset, .. } => {
                let _ = writeln!(out, "{pad}string offset={offset}");
            }
            IfrOp::OrderedList { offset, .. } => {
                let _ = writeln!(out, "{pad}ordered-list offset={offset}");
            }
            IfrOp::Subtitle { text } => {
                let _ = writeln!(out, "{pad}subtitle text={text}");
            }
            IfrOp::Text { text, .. } => {
                let _ = writeln!(out, "{pad}text text={text}");
            }
            IfrOp::Label { label_id } => {
                let _ = writeln!(out, "{pad}label {label_id}");
            }
            IfrOp::VarStore {
                guid,
                var_id,
                size,
                name,
            } => {
                let _ = writeln!(out, "{pad}varstore '{name}' id={var_id} size={size} {guid}");
            }
            IfrOp::VarStoreSelect { var_id } => {
                let _ = writeln!(out, "{pad}varstore-select id={var_id}");
            }
            IfrOp::EndForm => {
                let _ = writeln!(out, "{pad}end-form");
            }
            IfrOp::EndFormSet => {
                let _ = writeln!(out, "{pad}end-formset");
            }
            IfrOp::EndOneOf => {
                let _ = writeln!(out, "{pad}end-one-of");
            }
            IfrOp::Unknown { tag } => {
                let _ = writeln!(out, "{pad}unknown {tag:#04x}");
            }
        }
    }
}

fn dump_strings(chain: &[u8], out: &mut String) {
    for pack in StringChain::new(chain) {
        let Ok(pack) = pack else {
            out.push_str("!! malformed string pack\n");
            return;
        };
        let language = pack.language().unwrap_or_else(|_| "???".into());
        let _ = writeln!(out, "strings '{language}' count={}", pack.token_count());
        for token in 1..=pack.token_count() {
            match pack.string(token) {
                Ok(Some(s)) => {
                    let _ = writeln!(out, "  {token}: \"{s}\"");
                }
                Ok(None) => {
                    let _ = writeln!(out, "  {token}: -");
                }
                Err(_) => {
                    let _ = writeln!(out, "  {token}: !! bad offset");
                }
            }
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn render_flags(flags: u8) -> String {
    let mut names = Vec::new();
    if flags & FLAG_DEFAULT != 0 {
        names.push("default");
    }
    if flags & FLAG_MANUFACTURING != 0 {
        names.push("mfg");
    }
    if flags & FLAG_INTERACTIVE != 0 {
        names.push("interactive");
    }
    if names.is_empty() {
        String::new()
    } else {
        format!(" flags={}", names.join("|"))
    }
}
