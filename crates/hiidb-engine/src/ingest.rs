//! Pack ingestion: validating and merging a package set into one instance.

use hiidb_format::{
    Guid, KeyDescriptor, NarrowGlyph, PackHeader, PackKind, STRING_SENTINEL_SIZE, WideGlyph,
    parse_font_pack, parse_keyboard_pack, stub_formset, walk_pack, write_string_sentinel,
};
use hiidb_format::cursor::Writer;

use crate::database::{Entry, HiiDatabase};
use crate::errors::{HiiError, Result};
use crate::instance::{Handle, PackageInstance};

/// An unordered set of sub-packages to register under one new handle.
///
/// At most one form pack, any number of string packs, at most one font pack,
/// at most one keyboard pack, at most one legacy-handle pack.
#[derive(Default)]
pub struct Packages<'a> {
    guid: Option<Guid>,
    packs: Vec<&'a [u8]>,
}

impl<'a> Packages<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply an explicit identity GUID for the new instance.
    pub fn with_guid(mut self, guid: Guid) -> Self {
        self.guid = Some(guid);
        self
    }

    pub fn push(mut self, pack: &'a [u8]) -> Self {
        self.packs.push(pack);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}

/// The package set, classified by kind and size-validated.
struct Classified<'a> {
    form: Option<&'a [u8]>,
    strings: Vec<&'a [u8]>,
    narrow_glyphs: Vec<NarrowGlyph>,
    wide_glyphs: Vec<WideGlyph>,
    keyboard: Option<Vec<KeyDescriptor>>,
    merged_string_size: usize,
    leading_token_count: u32,
}

fn classify<'a>(packages: &Packages<'a>) -> Result<Classified<'a>> {
    let mut form = None;
    let mut strings: Vec<&[u8]> = Vec::new();
    let mut narrow_glyphs = Vec::new();
    let mut wide_glyphs = Vec::new();
    let mut keyboard = None;
    let mut font_seen = false;
    let mut handles_seen = false;

    for &pack in &packages.packs {
        let header = PackHeader::read(pack)?;
        match header.kind {
            PackKind::Ifr => {
                if form.is_some() {
                    return Err(HiiError::InvalidParameter);
                }
                let span = walk_pack(pack)?;
                form = Some(&pack[..span.total]);
            }
            PackKind::Strings => strings.push(pack),
            PackKind::Font => {
                if font_seen {
                    return Err(HiiError::InvalidParameter);
                }
                font_seen = true;
                (narrow_glyphs, wide_glyphs) = parse_font_pack(pack)?;
            }
            PackKind::Keyboard => {
                if keyboard.is_some() {
                    return Err(HiiError::InvalidParameter);
                }
                keyboard = Some(parse_keyboard_pack(pack)?);
            }
            PackKind::Handles => {
                if handles_seen {
                    return Err(HiiError::InvalidParameter);
                }
                // Legacy pass-through packs carry no data this engine keeps.
                handles_seen = true;
            }
            PackKind::Variable | PackKind::DevicePath => {
                return Err(HiiError::InvalidParameter);
            }
        }
    }

    // Merged chain: every pack's span minus its sentinel, plus one shared
    // sentinel at the end.
    let mut merged_string_size = 0usize;
    let mut leading_token_count = 0u32;
    for (i, &pack) in strings.iter().enumerate() {
        let span = walk_pack(pack)?;
        if i == 0 {
            leading_token_count = span.string_count;
        }
        merged_string_size += span.total - STRING_SENTINEL_SIZE;
    }
    if !strings.is_empty() {
        merged_string_size += STRING_SENTINEL_SIZE;
    }

    Ok(Classified {
        form,
        strings,
        narrow_glyphs,
        wide_glyphs,
        keyboard,
        merged_string_size,
        leading_token_count,
    })
}

impl HiiDatabase {
    /// Register a package set and return its newly assigned handle.
    ///
    /// All validation and allocation happens before any database state
    /// changes, so a failure leaves no partial registration behind.
    pub fn new_pack(&mut self, packages: &Packages<'_>) -> Result<Handle> {
        if packages.is_empty() {
            return Err(HiiError::InvalidParameter);
        }
        let classified = classify(packages)?;

        // Identity rules: a form pack carries its own GUID in the formset
        // opcode. When the caller also supplies one they must agree, unless
        // no string packs ride along (associating strings by identity alone
        // is the one sanctioned mismatch).
        let formset_guid = match classified.form {
            Some(form) => form_guid(form)?,
            None => None,
        };
        if let (Some(declared), Some(supplied)) = (formset_guid, packages.guid)
            && declared != supplied
            && !classified.strings.is_empty()
        {
            return Err(HiiError::InvalidParameter);
        }
        let guid = packages
            .guid
            .or(formset_guid)
            .unwrap_or(Guid::ZERO);

        // Form bytes: supplied verbatim, or a stub formset so that a
        // strings-only instance stays addressable by GUID.
        let ifr: Vec<u8> = match classified.form {
            Some(form) => form.to_vec(),
            None if !classified.strings.is_empty() => stub_formset(&guid),
            None => Vec::new(),
        };

        // Merge the string chains: each pack's bytes minus its sentinel,
        // one shared sentinel at the end.
        let mut chain = Writer::with_capacity(classified.merged_string_size);
        for &pack in &classified.strings {
            let span = walk_pack(pack)?;
            chain.bytes(&pack[..span.total - STRING_SENTINEL_SIZE]);
        }
        if !classified.strings.is_empty() {
            write_string_sentinel(&mut chain);
        }
        let chain = chain.finish();
        debug_assert_eq!(chain.len(), classified.merged_string_size);

        let mut buffer = Vec::with_capacity(ifr.len() + chain.len());
        buffer.extend_from_slice(&ifr);
        buffer.extend_from_slice(&chain);

        // Nothing below can fail: commit.
        let handle = self.next_handle();
        let instance = PackageInstance::new(guid, buffer, ifr.len(), chain.len());
        self.push_entry(Entry {
            handle,
            instance,
            tokens_at_registration: classified.leading_token_count,
        });

        for glyph in &classified.narrow_glyphs {
            self.glyphs_mut().install_narrow(glyph);
        }
        for glyph in &classified.wide_glyphs {
            self.glyphs_mut().install_wide(glyph);
        }
        if let Some(descriptors) = classified.keyboard {
            self.keyboard_mut().apply(&descriptors);
        }

        Ok(handle)
    }
}

/// The GUID of the first formset opcode in an IFR pack, header included.
fn form_guid(pack: &[u8]) -> Result<Option<Guid>> {
    use hiidb_format::{IfrOp, OpReader, PACK_HEADER_SIZE};
    if pack.len() <= PACK_HEADER_SIZE {
        return Ok(None);
    }
    for raw in OpReader::new(&pack[PACK_HEADER_SIZE..]) {
        if let IfrOp::FormSet { guid, .. } = raw?.decode()? {
            return Ok(Some(guid));
        }
    }
    Ok(None)
}
