use super::cursor::{Cursor, Writer};
use super::error::FormatError;
use super::guid::Guid;

#[test]
fn reads_little_endian_fields() {
    let buf = [0x01, 0x02, 0x03, 0x04, 0xAA, 0x10, 0x20];
    let mut c = Cursor::new(&buf);
    assert_eq!(c.u32().unwrap(), 0x0403_0201);
    assert_eq!(c.u8().unwrap(), 0xAA);
    assert_eq!(c.u16().unwrap(), 0x2010);
    assert!(c.is_empty());
}

#[test]
fn read_past_end_is_truncated() {
    let buf = [0x01, 0x02];
    let mut c = Cursor::new(&buf);
    assert_eq!(c.u32(), Err(FormatError::Truncated { at: 0 }));
}

#[test]
fn seek_and_skip() {
    let buf = [0u8; 8];
    let mut c = Cursor::new(&buf);
    c.seek(6).unwrap();
    assert_eq!(c.remaining(), 2);
    c.skip(2).unwrap();
    assert!(c.is_empty());
    assert_eq!(c.seek(9), Err(FormatError::Truncated { at: 9 }));
}

#[test]
fn take_returns_subslice() {
    let buf = [1u8, 2, 3, 4];
    let mut c = Cursor::new(&buf);
    c.skip(1).unwrap();
    assert_eq!(c.take(2).unwrap(), &[2, 3]);
    assert_eq!(c.pos(), 3);
}

#[test]
fn writer_round_trip() {
    let guid = Guid::from_fields(0x1234_5678, 0x9abc, 0xdef0, [1, 2, 3, 4, 5, 6, 7, 8]);
    let mut w = Writer::new();
    w.u8(0x42);
    w.u16(0xBEEF);
    w.u32(0xDEAD_BEEF);
    w.guid(&guid);
    let bytes = w.finish();

    let mut c = Cursor::new(&bytes);
    assert_eq!(c.u8().unwrap(), 0x42);
    assert_eq!(c.u16().unwrap(), 0xBEEF);
    assert_eq!(c.u32().unwrap(), 0xDEAD_BEEF);
    assert_eq!(c.guid().unwrap(), guid);
    assert!(c.is_empty());
}
