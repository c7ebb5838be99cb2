//! The handle database.
//!
//! An ordered collection of `(handle, instance)` entries plus the two
//! process-wide tables ingestion feeds. Entries are kept in registration
//! order and addressed by handle value, so removal never invalidates other
//! entries.

use hiidb_format::Guid;

use crate::errors::{HiiError, Result};
use crate::instance::{Handle, PackageInstance};
use crate::tables::{GlyphTable, KeyboardTable};

/// One registered package set.
pub struct Entry {
    pub handle: Handle,
    pub instance: PackageInstance,
    /// String-token count of the leading pack when the set was registered;
    /// the baseline `reset_strings` reverts to.
    pub tokens_at_registration: u32,
}

/// The boot-time resource database.
///
/// Single-threaded, run-to-completion: every operation leaves the database
/// consistent at its return, never mid-call.
pub struct HiiDatabase {
    entries: Vec<Entry>,
    glyphs: GlyphTable,
    keyboard: KeyboardTable,
}

impl HiiDatabase {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            glyphs: GlyphTable::new(),
            keyboard: KeyboardTable::new(),
        }
    }

    /// Registered handles in registration order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entries.iter().map(|e| e.handle)
    }

    /// Handles whose formset identity matches `guid`, in registration order.
    pub fn find_handles(&self, guid: &Guid) -> Vec<Handle> {
        self.entries
            .iter()
            .filter(|e| e.instance.guid() == *guid)
            .map(|e| e.handle)
            .collect()
    }

    /// Remove one package set. The entry is dropped whole; its handle value
    /// becomes reusable by the max-plus-one rule.
    pub fn remove_pack(&mut self, handle: Handle) -> Result<()> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.handle == handle)
            .ok_or(HiiError::NotFound)?;
        self.entries.remove(idx);
        Ok(())
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    pub fn keyboard(&self) -> &KeyboardTable {
        &self.keyboard
    }

    pub(crate) fn entry(&self, handle: Handle) -> Result<&Entry> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .ok_or(HiiError::NotFound)
    }

    pub(crate) fn entry_mut(&mut self, handle: Handle) -> Result<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.handle == handle)
            .ok_or(HiiError::NotFound)
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// One more than the largest currently registered handle; 1 when the
    /// database is empty.
    pub(crate) fn next_handle(&self) -> Handle {
        self.entries.iter().map(|e| e.handle).max().unwrap_or(0) + 1
    }

    pub(crate) fn push_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub(crate) fn glyphs_mut(&mut self) -> &mut GlyphTable {
        &mut self.glyphs
    }

    pub(crate) fn keyboard_mut(&mut self) -> &mut KeyboardTable {
        &mut self.keyboard
    }
}

impl Default for HiiDatabase {
    fn default() -> Self {
        Self::new()
    }
}
