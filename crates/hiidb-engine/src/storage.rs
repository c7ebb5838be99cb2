//! Persisted-configuration access.
//!
//! Storage regions are keyed by `(name, owning GUID)`. The export serializer
//! and the default-image interpreter read through this trait; a formset with
//! its own storage callback is wired up by handing those calls a different
//! implementation. Re-entering the database from inside a callback is
//! undefined and avoided by convention.

use indexmap::IndexMap;

use hiidb_format::Guid;

/// Read/write service for persisted configuration bytes.
pub trait VarAccess {
    /// Current bytes of one region, or `None` if nothing is persisted.
    fn read(&self, name: &str, guid: &Guid) -> Option<Vec<u8>>;

    /// Persist one region's bytes, replacing any previous value.
    fn write(&mut self, name: &str, guid: &Guid, data: &[u8]);
}

/// In-memory variable store: the default persisted-configuration path and
/// the test double for callback-backed formsets.
///
/// Insertion order is preserved so exports built against it are
/// deterministic.
#[derive(Default)]
pub struct MemStore {
    vars: IndexMap<(String, Guid), Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl VarAccess for MemStore {
    fn read(&self, name: &str, guid: &Guid) -> Option<Vec<u8>> {
        self.vars.get(&(name.to_owned(), *guid)).cloned()
    }

    fn write(&mut self, name: &str, guid: &Guid, data: &[u8]) {
        self.vars.insert((name.to_owned(), *guid), data.to_vec());
    }
}
