use hiidb_format::cursor::Writer;
use hiidb_format::{
    GLYPH_HEIGHT, Guid, IfrBuilder, KeyDescriptor, NarrowGlyph, StringPackModel,
    build_font_pack, build_keyboard_pack, walk_pack, write_string_sentinel,
};

use crate::database::HiiDatabase;
use crate::errors::HiiError;
use crate::ingest::Packages;

fn guid(b: u8) -> Guid {
    Guid::from_bytes([b; 16])
}

fn form_pack(guid: &Guid) -> Vec<u8> {
    let mut b = IfrBuilder::new();
    b.form_set(guid, 1, 2, 0, 0, 0)
        .form(1, 3)
        .end_form()
        .end_form_set();
    b.into_pack()
}

fn string_pack(lang: &str, strings: &[&str]) -> Vec<u8> {
    let mut model = StringPackModel::new(lang, "Setup strings");
    model.strings = strings.iter().map(|s| (*s).to_owned()).collect();
    let mut w = Writer::new();
    model.encode(&mut w);
    write_string_sentinel(&mut w);
    w.finish()
}

fn narrow(weight: u16, fill: u8) -> NarrowGlyph {
    NarrowGlyph {
        weight,
        attributes: 0,
        bitmap: [fill; GLYPH_HEIGHT],
    }
}

#[test]
fn handles_strictly_increase() {
    let mut db = HiiDatabase::new();
    let form = form_pack(&guid(1));
    let h1 = db
        .new_pack(&Packages::new().push(&form))
        .unwrap();
    let h2 = db
        .new_pack(&Packages::new().push(&form))
        .unwrap();
    assert_eq!(h1, 1);
    assert_eq!(h2, 2);

    db.remove_pack(h1).unwrap();
    let h3 = db
        .new_pack(&Packages::new().push(&form))
        .unwrap();
    assert_eq!(h3, 3);
    assert_eq!(db.handles().collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn empty_package_set_is_rejected() {
    let mut db = HiiDatabase::new();
    assert_eq!(
        db.new_pack(&Packages::new()),
        Err(HiiError::InvalidParameter)
    );
}

#[test]
fn two_form_packs_are_rejected() {
    let mut db = HiiDatabase::new();
    let form = form_pack(&guid(1));
    let packages = Packages::new().push(&form).push(&form);
    assert_eq!(db.new_pack(&packages), Err(HiiError::InvalidParameter));
    assert_eq!(db.handles().count(), 0);
}

#[test]
fn merged_size_matches_walker() {
    let mut db = HiiDatabase::new();
    let form = form_pack(&guid(1));
    let eng = string_pack("eng", &["OK", "Cancel"]);
    let fra = string_pack("fra", &["Oui"]);
    let packages = Packages::new().push(&form).push(&eng).push(&fra);
    let handle = db.new_pack(&packages).unwrap();

    let entry = db.entry(handle).unwrap();
    assert_eq!(entry.instance.ifr_size(), form.len());
    // Two chains merged under one sentinel: each loses its own 8-byte
    // sentinel, one shared sentinel comes back.
    assert_eq!(
        entry.instance.string_size(),
        (eng.len() - 8) + (fra.len() - 8) + 8
    );
    assert_eq!(
        entry.instance.total_size(),
        entry.instance.ifr_size() + entry.instance.string_size()
    );

    let span = walk_pack(entry.instance.strings()).unwrap();
    assert_eq!(span.total, entry.instance.string_size());
    assert_eq!(span.string_count, 2);
    assert_eq!(entry.tokens_at_registration, 2);
}

#[test]
fn strings_without_form_get_a_stub_formset() {
    let mut db = HiiDatabase::new();
    let eng = string_pack("eng", &["OK"]);
    let packages = Packages::new().with_guid(guid(9)).push(&eng);
    let handle = db.new_pack(&packages).unwrap();

    let entry = db.entry(handle).unwrap();
    assert_eq!(entry.instance.guid(), guid(9));
    let formset = entry.instance.formset().unwrap().unwrap();
    assert_eq!(formset.guid, guid(9));
    assert_eq!(formset.nv_size, 0);
    assert_eq!(db.find_handles(&guid(9)), vec![handle]);
}

#[test]
fn guid_mismatch_with_strings_is_rejected() {
    let mut db = HiiDatabase::new();
    let form = form_pack(&guid(1));
    let eng = string_pack("eng", &["OK"]);

    let packages = Packages::new().with_guid(guid(2)).push(&form).push(&eng);
    assert_eq!(db.new_pack(&packages), Err(HiiError::InvalidParameter));
    assert_eq!(db.handles().count(), 0);

    // Without strings the mismatch is sanctioned; the caller's GUID wins.
    let packages = Packages::new().with_guid(guid(2)).push(&form);
    let handle = db.new_pack(&packages).unwrap();
    assert_eq!(db.entry(handle).unwrap().instance.guid(), guid(2));
}

#[test]
fn glyph_first_writer_wins() {
    let mut db = HiiDatabase::new();
    let first = build_font_pack(&[narrow(0x41, 0xAA)], &[]);
    let second = build_font_pack(&[narrow(0x41, 0xBB), narrow(0x42, 0xCC)], &[]);
    db.new_pack(&Packages::new().push(&first)).unwrap();
    db.new_pack(&Packages::new().push(&second)).unwrap();

    assert_eq!(db.glyphs().narrow(0x41).unwrap().bitmap, [0xAA; GLYPH_HEIGHT]);
    assert_eq!(db.glyphs().narrow(0x42).unwrap().bitmap, [0xCC; GLYPH_HEIGHT]);
    assert!(db.glyphs().narrow(0x43).is_none());
}

#[test]
fn keyboard_routes_system_then_overlay() {
    let mut db = HiiDatabase::new();
    let key = |key: u8, unicode: u16| KeyDescriptor {
        key,
        unicode,
        ..KeyDescriptor::default()
    };

    let system = build_keyboard_pack(&[key(4, 'a' as u16)]);
    db.new_pack(&Packages::new().push(&system)).unwrap();
    assert_eq!(db.keyboard().active(4).unicode, 'a' as u16);

    let overlay = build_keyboard_pack(&[key(4, 'q' as u16)]);
    db.new_pack(&Packages::new().push(&overlay)).unwrap();
    assert_eq!(db.keyboard().active(4).unicode, 'q' as u16);
    assert_eq!(db.keyboard().system()[4].unicode, 'a' as u16);

    // An empty descriptor list clears the override layout.
    let clear = build_keyboard_pack(&[]);
    db.new_pack(&Packages::new().push(&clear)).unwrap();
    assert_eq!(db.keyboard().active(4).unicode, 'a' as u16);
}

#[test]
fn remove_unknown_handle_is_not_found() {
    let mut db = HiiDatabase::new();
    assert_eq!(db.remove_pack(7), Err(HiiError::NotFound));
}
