use hiidb_format::{Guid, IfrBuilder, Opcode, walk_pack};

use crate::database::HiiDatabase;
use crate::errors::HiiError;
use crate::ingest::Packages;
use crate::instance::Handle;
use crate::patch::FormUpdate;

fn guid(b: u8) -> Guid {
    Guid::from_bytes([b; 16])
}

/// Two forms; the first carries labels 100 and 200 with a run between them.
fn register_fixture(db: &mut HiiDatabase) -> Handle {
    let mut b = IfrBuilder::new();
    b.form_set(&guid(1), 1, 2, 0, 0, 0)
        .form(1, 3)
        .label(100)
        .subtitle(30)
        .text(31, 32, 0)
        .label(200)
        .subtitle(33)
        .end_form()
        .form(2, 4)
        .text(40, 41, 0)
        .end_form()
        .end_form_set();
    let form = b.into_pack();
    db.new_pack(&Packages::new().push(&form)).unwrap()
}

fn tags(db: &HiiDatabase, handle: Handle) -> Vec<u8> {
    db.entry(handle)
        .unwrap()
        .instance
        .ops()
        .map(|r| r.unwrap().tag)
        .collect()
}

#[test]
fn form_id_zero_returns_the_whole_pack() {
    let mut db = HiiDatabase::new();
    let handle = register_fixture(&mut db);
    let pack = db.get_forms(handle, 0).unwrap();
    assert_eq!(pack, db.entry(handle).unwrap().instance.ifr());
}

#[test]
fn form_lookup_returns_form_through_end_form() {
    let mut db = HiiDatabase::new();
    let handle = register_fixture(&mut db);

    let mut b = IfrBuilder::new();
    b.form(2, 4).text(40, 41, 0).end_form();
    let expected = b.into_ops();
    assert_eq!(db.get_forms(handle, 2).unwrap(), expected);
}

#[test]
fn unknown_form_id_is_not_found() {
    let mut db = HiiDatabase::new();
    let handle = register_fixture(&mut db);
    assert_eq!(db.get_forms(handle, 9), Err(HiiError::NotFound));
}

#[test]
fn insert_lands_immediately_after_the_label() {
    let mut db = HiiDatabase::new();
    let handle = register_fixture(&mut db);
    let before = db.entry(handle).unwrap().instance.ifr_size();

    let mut b = IfrBuilder::new();
    b.subtitle(50).subtitle(51);
    let block = b.into_ops();
    db.update_form(handle, 100, FormUpdate::Insert(&block)).unwrap();

    let entry = db.entry(handle).unwrap();
    assert_eq!(entry.instance.ifr_size(), before + block.len());
    assert_eq!(
        walk_pack(entry.instance.ifr()).unwrap().total,
        entry.instance.ifr_size()
    );
    assert_eq!(
        tags(&db, handle),
        vec![
            Opcode::FormSet as u8,
            Opcode::Form as u8,
            Opcode::Label as u8,
            Opcode::Subtitle as u8,
            Opcode::Subtitle as u8,
            Opcode::Subtitle as u8,
            Opcode::Text as u8,
            Opcode::Label as u8,
            Opcode::Subtitle as u8,
            Opcode::EndForm as u8,
            Opcode::Form as u8,
            Opcode::Text as u8,
            Opcode::EndForm as u8,
            Opcode::EndFormSet as u8,
        ]
    );
}

#[test]
fn delete_stops_at_the_next_label() {
    let mut db = HiiDatabase::new();
    let handle = register_fixture(&mut db);
    let before = db.entry(handle).unwrap().instance.ifr_size();

    db.update_form(handle, 100, FormUpdate::Delete).unwrap();

    let entry = db.entry(handle).unwrap();
    assert!(entry.instance.ifr_size() < before);
    assert_eq!(
        walk_pack(entry.instance.ifr()).unwrap().total,
        entry.instance.ifr_size()
    );
    assert_eq!(
        tags(&db, handle),
        vec![
            Opcode::FormSet as u8,
            Opcode::Form as u8,
            Opcode::Label as u8,
            Opcode::Label as u8,
            Opcode::Subtitle as u8,
            Opcode::EndForm as u8,
            Opcode::Form as u8,
            Opcode::Text as u8,
            Opcode::EndForm as u8,
            Opcode::EndFormSet as u8,
        ]
    );
}

#[test]
fn delete_never_removes_a_terminator() {
    let mut db = HiiDatabase::new();
    let handle = register_fixture(&mut db);

    // Label 200's run reaches the end-form; the terminator must survive.
    db.update_form(handle, 200, FormUpdate::Delete).unwrap();
    assert_eq!(
        tags(&db, handle),
        vec![
            Opcode::FormSet as u8,
            Opcode::Form as u8,
            Opcode::Label as u8,
            Opcode::Subtitle as u8,
            Opcode::Text as u8,
            Opcode::Label as u8,
            Opcode::EndForm as u8,
            Opcode::Form as u8,
            Opcode::Text as u8,
            Opcode::EndForm as u8,
            Opcode::EndFormSet as u8,
        ]
    );
}

#[test]
fn unknown_label_is_not_found() {
    let mut db = HiiDatabase::new();
    let handle = register_fixture(&mut db);
    let before = db.get_forms(handle, 0).unwrap();
    assert_eq!(
        db.update_form(handle, 999, FormUpdate::Delete),
        Err(HiiError::NotFound)
    );
    assert_eq!(db.get_forms(handle, 0).unwrap(), before);
}

#[test]
fn malformed_insert_block_is_rejected_before_mutation() {
    let mut db = HiiDatabase::new();
    let handle = register_fixture(&mut db);
    let before = db.get_forms(handle, 0).unwrap();

    // A record claiming more bytes than the block holds.
    let block = [Opcode::Subtitle as u8, 40];
    assert_eq!(
        db.update_form(handle, 100, FormUpdate::Insert(&block)),
        Err(HiiError::InvalidParameter)
    );
    assert_eq!(db.get_forms(handle, 0).unwrap(), before);
}
