//! Process-wide glyph and keyboard tables.
//!
//! Both tables are arena state: constructed once when the database comes up,
//! mutated only by pack ingestion, and consulted by UI rendering. There is
//! no locking discipline; every mutating operation assumes exclusive access
//! for its duration.

use hiidb_format::{KEYBOARD_KEY_COUNT, KeyDescriptor, NarrowGlyph, WideGlyph};

/// One slot per UTF-16 code point.
pub const GLYPH_SLOTS: usize = 0x1_0000;

/// Narrow and wide glyph bitmaps indexed by code point.
///
/// A slot populated by an earlier ingestion is never overwritten by a later
/// one: first writer wins.
pub struct GlyphTable {
    narrow: Vec<NarrowGlyph>,
    wide: Vec<WideGlyph>,
}

impl GlyphTable {
    pub fn new() -> Self {
        Self {
            narrow: vec![NarrowGlyph::default(); GLYPH_SLOTS],
            wide: vec![WideGlyph::default(); GLYPH_SLOTS],
        }
    }

    /// Narrow glyph for a code point, if the slot has been populated.
    pub fn narrow(&self, code_point: u16) -> Option<&NarrowGlyph> {
        let slot = &self.narrow[code_point as usize];
        (slot.weight != 0).then_some(slot)
    }

    /// Wide glyph for a code point, if the slot has been populated.
    pub fn wide(&self, code_point: u16) -> Option<&WideGlyph> {
        let slot = &self.wide[code_point as usize];
        (slot.weight != 0).then_some(slot)
    }

    pub(crate) fn install_narrow(&mut self, glyph: &NarrowGlyph) {
        if glyph.weight == 0 {
            return;
        }
        let slot = &mut self.narrow[glyph.weight as usize];
        if slot.weight == 0 {
            *slot = *glyph;
        }
    }

    pub(crate) fn install_wide(&mut self, glyph: &WideGlyph) {
        if glyph.weight == 0 {
            return;
        }
        let slot = &mut self.wide[glyph.weight as usize];
        if slot.weight == 0 {
            *slot = *glyph;
        }
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::new()
    }
}

/// System and override keyboard layouts indexed by key code.
///
/// The first keyboard pack ingested writes the system layout; once that has
/// happened, later packs route to the override layout instead.
pub struct KeyboardTable {
    system: [KeyDescriptor; KEYBOARD_KEY_COUNT],
    overlay: [KeyDescriptor; KEYBOARD_KEY_COUNT],
    system_written: bool,
}

impl KeyboardTable {
    pub fn new() -> Self {
        Self {
            system: [KeyDescriptor::default(); KEYBOARD_KEY_COUNT],
            overlay: [KeyDescriptor::default(); KEYBOARD_KEY_COUNT],
            system_written: false,
        }
    }

    pub fn system(&self) -> &[KeyDescriptor; KEYBOARD_KEY_COUNT] {
        &self.system
    }

    pub fn overlay(&self) -> &[KeyDescriptor; KEYBOARD_KEY_COUNT] {
        &self.overlay
    }

    /// The descriptor a renderer should use for one key code: the override
    /// entry when present, the system entry otherwise.
    pub fn active(&self, key: u8) -> &KeyDescriptor {
        let overlay = &self.overlay[key as usize];
        if *overlay != KeyDescriptor::default() {
            overlay
        } else {
            &self.system[key as usize]
        }
    }

    /// Apply one keyboard pack's descriptors.
    ///
    /// An empty descriptor list clears the override layout. A non-empty list
    /// goes to the system layout until that has been written once, then to
    /// the override layout. Descriptors with out-of-range key codes are
    /// ignored.
    pub(crate) fn apply(&mut self, descriptors: &[KeyDescriptor]) {
        if descriptors.is_empty() {
            self.overlay = [KeyDescriptor::default(); KEYBOARD_KEY_COUNT];
            return;
        }
        let table = if self.system_written {
            &mut self.overlay
        } else {
            self.system_written = true;
            &mut self.system
        };
        for d in descriptors {
            if (d.key as usize) < KEYBOARD_KEY_COUNT {
                table[d.key as usize] = *d;
            }
        }
    }
}

impl Default for KeyboardTable {
    fn default() -> Self {
        Self::new()
    }
}
