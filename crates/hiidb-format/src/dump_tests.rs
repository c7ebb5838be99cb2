//! Snapshot tests for the dump renderer.

use super::cursor::Writer;
use super::dump::dump;
use super::guid::Guid;
use super::ifr::{FLAG_DEFAULT, IfrBuilder};
use super::pack::write_string_sentinel;
use super::strings::StringPackModel;

#[test]
fn renders_forms_and_strings() {
    let mut b = IfrBuilder::new();
    b.form_set(&Guid::ZERO, 1, 0, 0, 0, 4)
        .form(1, 2)
        .one_of(0, 1, 3, 4)
        .one_of_option(5, 0, FLAG_DEFAULT)
        .end_one_of()
        .end_form()
        .end_form_set();
    let ifr = b.into_pack();

    let mut eng = StringPackModel::new("eng", "English");
    eng.strings = vec!["OK".into(), "Cancel".into()];
    let mut w = Writer::new();
    eng.encode(&mut w);
    write_string_sentinel(&mut w);
    let strings = w.finish();

    insta::assert_snapshot!(dump(&ifr, &strings), @r#"
    formset 00000000-0000-0000-0000-000000000000 title=1 nv=4
      form 1 title=2
        one-of offset=0 width=1
          option value=0 flags=default
        end-one-of
      end-form
    end-formset
    strings 'eng' count=2
      1: "OK"
      2: "Cancel"
    "#);
}

#[test]
fn renders_varstores_and_unknown_opcodes() {
    let guid = Guid::from_fields(0x10, 0x20, 0x30, [0, 0, 0, 0, 0, 0, 0, 1]);
    let mut b = IfrBuilder::new();
    b.form_set(&guid, 0, 0, 0, 0, 0)
        .var_store(&guid, 1, 8, "Cfg")
        .end_form_set();
    let mut ops = b.into_pack();
    // Append an unknown record; the renderer names it without stopping.
    ops.extend_from_slice(&[0x7F, 0x02]);
    let len = ops.len() as u32;
    ops[0..4].copy_from_slice(&len.to_le_bytes());

    let out = dump(&ops, &[]);
    assert!(out.contains("varstore 'Cfg' id=1 size=8"));
    assert!(out.contains("unknown 0x7f"));
}
