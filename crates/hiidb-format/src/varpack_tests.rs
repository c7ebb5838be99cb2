use super::cursor::Writer;
use super::guid::Guid;
use super::strings::utf16_len_z;
use super::varpack::{VARIABLE_PACK_HEADER_SIZE, VariablePack};

#[test]
fn encode_decode() {
    let pack = VariablePack {
        var_id: 3,
        guid: Guid::from_fields(0x11, 0x22, 0x33, [4, 5, 6, 7, 8, 9, 10, 11]),
        name: "Setup".into(),
        data: vec![0xAA, 0xBB, 0xCC],
    };
    let mut w = Writer::new();
    pack.encode(&mut w);
    let bytes = w.finish();

    assert_eq!(bytes.len(), pack.encoded_len());
    assert_eq!(
        bytes.len(),
        VARIABLE_PACK_HEADER_SIZE + utf16_len_z("Setup") + 3
    );

    let (decoded, consumed) = VariablePack::decode(&bytes).unwrap();
    assert_eq!(consumed, bytes.len());
    assert_eq!(decoded, pack);
}

#[test]
fn name_is_stored_wide() {
    let pack = VariablePack {
        var_id: 0,
        guid: Guid::ZERO,
        name: "Cfg".into(),
        data: Vec::new(),
    };
    // ASCII store name expands to UTF-16 on the wire: doubled plus NUL.
    assert_eq!(
        pack.encoded_len() - VARIABLE_PACK_HEADER_SIZE,
        ("Cfg".len() + 1) * 2
    );
}

#[test]
fn truncated_pack_is_rejected() {
    let pack = VariablePack {
        var_id: 1,
        guid: Guid::ZERO,
        name: "N".into(),
        data: vec![1, 2, 3, 4],
    };
    let mut w = Writer::new();
    pack.encode(&mut w);
    let bytes = w.finish();
    assert!(VariablePack::decode(&bytes[..bytes.len() - 8]).is_err());
}
