//! String splice engine: add, replace, read and reset strings per language.
//!
//! An edit rebuilds only the edited pack, decoding it into an owned model
//! and re-encoding it canonically, so offset and length fields are derived
//! from the pack invariants rather than patched in place. Every other pack
//! in the chain is copied byte-for-byte; their offsets are pack-relative and
//! never need adjustment. The new chain is built in full before the handle's
//! buffer is swapped.

use hiidb_format::cursor::Writer;
use hiidb_format::{StringPack, StringPackModel, write_string_sentinel};

use crate::database::HiiDatabase;
use crate::errors::{HiiError, Result};
use crate::instance::Handle;

impl HiiDatabase {
    /// Add or replace one string.
    ///
    /// `token` 0 adds a new string and returns its newly assigned token; a
    /// non-zero `token` replaces the existing string at that token and
    /// returns it unchanged. Replacing a token beyond the current count is
    /// `InvalidParameter`.
    ///
    /// `language` selects the pack to edit; with `None`, the first pack in
    /// the chain is edited.
    pub fn new_string(
        &mut self,
        handle: Handle,
        language: Option<&str>,
        token: u16,
        text: &str,
    ) -> Result<u16> {
        let owner = self.resolve_string_owner(handle)?;
        let packs = self.raw_chain(owner)?;
        let edit = locate_language(&packs, language)?;

        let view = StringPack::parse(&packs[edit])?;
        let mut model = StringPackModel::decode(&view)?;
        let assigned = if token == 0 {
            model.strings.push(text.to_owned());
            model.strings.len() as u16
        } else {
            let slot = model
                .strings
                .get_mut(token as usize - 1)
                .ok_or(HiiError::InvalidParameter)?;
            *slot = text.to_owned();
            token
        };

        self.install_chain(owner, &packs, edit, &model)?;
        Ok(assigned)
    }

    /// Read one string back out.
    ///
    /// `language` selects the pack; with `None`, the first pack in the chain
    /// is consulted. An out-of-range token or an unmatched language is
    /// `NotFound`.
    pub fn get_string(
        &self,
        handle: Handle,
        language: Option<&str>,
        token: u16,
    ) -> Result<String> {
        let owner = self.resolve_string_owner(handle)?;
        let instance = &self.entry(owner)?.instance;
        let mut found = None;
        for pack in instance.string_chain() {
            let pack = pack.map_err(HiiError::from)?;
            match language {
                Some(lang) if !pack.matches_language(lang) => continue,
                _ => {}
            }
            found = Some(pack);
            break;
        }
        let pack = found.ok_or(HiiError::NotFound)?;
        pack.string(token)?.ok_or(HiiError::NotFound)
    }

    /// Revert every language pack on a handle to its registration-time token
    /// count, discarding every string added since. Idempotent.
    pub fn reset_strings(&mut self, handle: Handle) -> Result<()> {
        let owner = self.resolve_string_owner(handle)?;
        let baseline = self.entry(owner)?.tokens_at_registration as usize;
        let packs = self.raw_chain(owner)?;

        let total_hint: usize = packs.iter().map(Vec::len).sum();
        let mut w = Writer::with_capacity(total_hint + 8);
        for pack in &packs {
            let view = StringPack::parse(pack)?;
            if view.token_count() as usize <= baseline {
                w.bytes(pack);
                continue;
            }
            let mut model = StringPackModel::decode(&view)?;
            model.strings.truncate(baseline);
            model.encode(&mut w);
        }
        write_string_sentinel(&mut w);

        self.entry_mut(owner)?.instance.replace_strings(w.finish());
        Ok(())
    }

    /// The handle actually holding the strings behind `handle`.
    ///
    /// An instance registered without string packs shares another instance's
    /// pool through its formset GUID; edits must land on the pool's owner,
    /// never on the referring instance.
    fn resolve_string_owner(&self, handle: Handle) -> Result<Handle> {
        let entry = self.entry(handle)?;
        if entry.instance.string_size() > 0 {
            return Ok(handle);
        }
        let guid = entry.instance.guid();
        self.entries()
            .iter()
            .find(|e| e.instance.guid() == guid && e.instance.string_size() > 0)
            .map(|e| e.handle)
            .ok_or(HiiError::NotFound)
    }

    /// The owner's chain as one owned byte vector per pack, sentinel dropped.
    fn raw_chain(&self, handle: Handle) -> Result<Vec<Vec<u8>>> {
        let instance = &self.entry(handle)?.instance;
        let mut packs = Vec::new();
        for pack in instance.string_chain() {
            packs.push(pack?.as_bytes().to_vec());
        }
        if packs.is_empty() {
            return Err(HiiError::NotFound);
        }
        Ok(packs)
    }

    /// Rebuild the chain with pack `edit` replaced by `model`, all other
    /// packs verbatim, and swap it in. The old buffer stays in place until
    /// the new one is complete.
    fn install_chain(
        &mut self,
        handle: Handle,
        packs: &[Vec<u8>],
        edit: usize,
        model: &StringPackModel,
    ) -> Result<()> {
        let unchanged: usize = packs
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != edit)
            .map(|(_, p)| p.len())
            .sum();
        let mut w = Writer::with_capacity(unchanged + model.encoded_len() + 8);
        for (i, pack) in packs.iter().enumerate() {
            if i == edit {
                model.encode(&mut w);
            } else {
                w.bytes(pack);
            }
        }
        write_string_sentinel(&mut w);

        self.entry_mut(handle)?.instance.replace_strings(w.finish());
        Ok(())
    }
}

/// Index of the pack serving `language`, or the first pack when no language
/// was requested. A requested language with no matching pack is `NotFound`.
fn locate_language(packs: &[Vec<u8>], language: Option<&str>) -> Result<usize> {
    let Some(lang) = language else {
        return Ok(0);
    };
    for (i, pack) in packs.iter().enumerate() {
        if StringPack::parse(pack)?.matches_language(lang) {
            return Ok(i);
        }
    }
    Err(HiiError::NotFound)
}
