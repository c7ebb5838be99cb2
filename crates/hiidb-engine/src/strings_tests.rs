use hiidb_format::cursor::Writer;
use hiidb_format::{Guid, IfrBuilder, StringPack, StringPackModel, write_string_sentinel};

use crate::database::HiiDatabase;
use crate::errors::HiiError;
use crate::ingest::Packages;
use crate::instance::Handle;

fn guid(b: u8) -> Guid {
    Guid::from_bytes([b; 16])
}

fn string_pack(lang: &str, strings: &[&str]) -> Vec<u8> {
    let mut model = StringPackModel::new(lang, "Setup strings");
    model.strings = strings.iter().map(|s| (*s).to_owned()).collect();
    let mut w = Writer::new();
    model.encode(&mut w);
    write_string_sentinel(&mut w);
    w.finish()
}

fn register(db: &mut HiiDatabase, packs: &[Vec<u8>]) -> Handle {
    let mut packages = Packages::new().with_guid(guid(1));
    for pack in packs {
        packages = packages.push(pack);
    }
    db.new_pack(&packages).unwrap()
}

#[test]
fn add_assigns_the_next_token() {
    let mut db = HiiDatabase::new();
    let handle = register(&mut db, &[string_pack("eng", &["OK"])]);

    let token = db.new_string(handle, Some("eng"), 0, "Cancel").unwrap();
    assert_eq!(token, 2);
    assert_eq!(db.get_string(handle, Some("eng"), 2).unwrap(), "Cancel");

    let entry = db.entry(handle).unwrap();
    let pack = StringPack::parse(entry.instance.strings()).unwrap();
    assert_eq!(pack.header().string_count, 2);
}

#[test]
fn replace_rewrites_one_token_in_place() {
    let mut db = HiiDatabase::new();
    let handle = register(&mut db, &[string_pack("eng", &["OK", "Cancel"])]);

    let token = db.new_string(handle, Some("eng"), 1, "Yes").unwrap();
    assert_eq!(token, 1);
    assert_eq!(db.get_string(handle, Some("eng"), 1).unwrap(), "Yes");
    assert_eq!(db.get_string(handle, Some("eng"), 2).unwrap(), "Cancel");
}

#[test]
fn replace_beyond_token_count_is_invalid() {
    let mut db = HiiDatabase::new();
    let handle = register(&mut db, &[string_pack("eng", &["OK"])]);
    assert_eq!(
        db.new_string(handle, Some("eng"), 5, "?"),
        Err(HiiError::InvalidParameter)
    );
}

#[test]
fn same_length_replace_preserves_every_offset() {
    let mut db = HiiDatabase::new();
    let handle = register(&mut db, &[string_pack("eng", &["OK", "Cancel", "Save"])]);

    let before: Vec<_> = {
        let entry = db.entry(handle).unwrap();
        let pack = StringPack::parse(entry.instance.strings()).unwrap();
        (1..=3).map(|t| pack.offset_of(t).unwrap()).collect()
    };

    // "No" is exactly as long as "OK" in UTF-16.
    db.new_string(handle, Some("eng"), 1, "No").unwrap();

    let entry = db.entry(handle).unwrap();
    let pack = StringPack::parse(entry.instance.strings()).unwrap();
    let after: Vec<_> = (1..=3).map(|t| pack.offset_of(t).unwrap()).collect();
    assert_eq!(before, after);
}

#[test]
fn unmatched_language_is_not_found() {
    let mut db = HiiDatabase::new();
    let handle = register(&mut db, &[string_pack("eng", &["OK"])]);
    assert_eq!(
        db.new_string(handle, Some("deu"), 0, "Abbrechen"),
        Err(HiiError::NotFound)
    );
    assert_eq!(
        db.get_string(handle, Some("deu"), 1),
        Err(HiiError::NotFound)
    );
}

#[test]
fn no_language_edits_the_first_pack() {
    let mut db = HiiDatabase::new();
    let handle = register(
        &mut db,
        &[string_pack("eng", &["OK"]), string_pack("fra", &["Oui"])],
    );

    let token = db.new_string(handle, None, 0, "Cancel").unwrap();
    assert_eq!(token, 2);
    assert_eq!(db.get_string(handle, Some("eng"), 2).unwrap(), "Cancel");
    assert_eq!(db.get_string(handle, Some("fra"), 2), Err(HiiError::NotFound));
}

#[test]
fn editing_one_pack_leaves_siblings_byte_identical() {
    let mut db = HiiDatabase::new();
    let eng = string_pack("eng", &["OK", "Cancel"]);
    let fra = string_pack("fra", &["Oui"]);
    let handle = register(&mut db, &[eng.clone(), fra]);

    db.new_string(handle, Some("fra"), 0, "Annuler").unwrap();

    let entry = db.entry(handle).unwrap();
    // First pack is the eng pack minus its sentinel, byte for byte.
    let eng_body = &eng[..eng.len() - 8];
    assert_eq!(&entry.instance.strings()[..eng_body.len()], eng_body);
}

#[test]
fn owner_resolution_follows_the_guid() {
    let mut db = HiiDatabase::new();
    let owner = register(&mut db, &[string_pack("eng", &["OK"])]);

    let mut b = IfrBuilder::new();
    b.form_set(&guid(1), 1, 2, 0, 0, 0).end_form_set();
    let form = b.into_pack();
    let referrer = db.new_pack(&Packages::new().push(&form)).unwrap();
    assert_ne!(owner, referrer);

    let token = db.new_string(referrer, Some("eng"), 0, "Cancel").unwrap();
    assert_eq!(token, 2);
    assert_eq!(db.get_string(owner, Some("eng"), 2).unwrap(), "Cancel");
    assert_eq!(db.entry(referrer).unwrap().instance.string_size(), 0);
}

#[test]
fn reset_reverts_to_registration_count_and_is_idempotent() {
    let mut db = HiiDatabase::new();
    let handle = register(&mut db, &[string_pack("eng", &["OK"])]);
    db.new_string(handle, Some("eng"), 0, "Cancel").unwrap();
    db.new_string(handle, Some("eng"), 0, "Save").unwrap();

    db.reset_strings(handle).unwrap();
    let first = db.entry(handle).unwrap().instance.strings().to_vec();
    let pack = StringPack::parse(&first).unwrap();
    assert_eq!(pack.header().string_count, 1);
    assert_eq!(db.get_string(handle, Some("eng"), 1).unwrap(), "OK");
    assert_eq!(db.get_string(handle, Some("eng"), 2), Err(HiiError::NotFound));

    db.reset_strings(handle).unwrap();
    let second = db.entry(handle).unwrap().instance.strings().to_vec();
    assert_eq!(first, second);
}

#[test]
fn language_match_is_case_insensitive() {
    let mut db = HiiDatabase::new();
    let handle = register(&mut db, &[string_pack("eng", &["OK"])]);
    assert_eq!(db.get_string(handle, Some("ENG"), 1).unwrap(), "OK");
    db.new_string(handle, Some("Eng"), 1, "Go").unwrap();
    assert_eq!(db.get_string(handle, Some("eng"), 1).unwrap(), "Go");
}
