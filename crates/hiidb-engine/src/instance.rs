//! Per-handle package instances.

use hiidb_format::{Guid, IfrOp, OpReader, PACK_HEADER_SIZE, StringChain};

use crate::errors::Result;

/// Handles are small opaque integers, unique while registered.
pub type Handle = u16;

/// One handle's composite blob: an IFR pack immediately followed by a
/// string-pack chain.
///
/// Invariant: `ifr_size + string_size` equals the buffer length, and the
/// chain, when present, ends in exactly one zero-length sentinel.
pub struct PackageInstance {
    guid: Guid,
    buffer: Vec<u8>,
    ifr_size: usize,
    string_size: usize,
}

/// Identity and storage summary of a formset opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormSetInfo {
    pub guid: Guid,
    pub nv_size: u16,
}

/// One declared (or implicit) storage region, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub guid: Guid,
    pub var_id: u16,
    pub size: u16,
    pub name: String,
}

/// Name of the implicit default region a formset declares through its
/// non-zero storage size.
pub const DEFAULT_REGION_NAME: &str = "Setup";

impl PackageInstance {
    pub(crate) fn new(guid: Guid, buffer: Vec<u8>, ifr_size: usize, string_size: usize) -> Self {
        debug_assert_eq!(buffer.len(), ifr_size + string_size);
        Self {
            guid,
            buffer,
            ifr_size,
            string_size,
        }
    }

    /// The formset identity this instance was registered under.
    pub fn guid(&self) -> Guid {
        self.guid
    }

    pub fn ifr_size(&self) -> usize {
        self.ifr_size
    }

    pub fn string_size(&self) -> usize {
        self.string_size
    }

    pub fn total_size(&self) -> usize {
        self.buffer.len()
    }

    /// The IFR pack bytes, generic header included. Empty when the instance
    /// carries no form.
    pub fn ifr(&self) -> &[u8] {
        &self.buffer[..self.ifr_size]
    }

    /// The string-pack chain bytes, sentinel included. Empty when the
    /// instance carries no strings of its own.
    pub fn strings(&self) -> &[u8] {
        &self.buffer[self.ifr_size..]
    }

    /// Restartable reader over the opcode stream (pack header skipped).
    pub fn ops(&self) -> OpReader<'_> {
        let body = if self.ifr_size > PACK_HEADER_SIZE {
            &self.buffer[PACK_HEADER_SIZE..self.ifr_size]
        } else {
            &[]
        };
        OpReader::new(body)
    }

    /// Iterator over this instance's string packs.
    pub fn string_chain(&self) -> StringChain<'_> {
        StringChain::new(self.strings())
    }

    /// The first formset opcode in the stream, if any.
    pub fn formset(&self) -> Result<Option<FormSetInfo>> {
        for raw in self.ops() {
            if let IfrOp::FormSet { guid, nv_size, .. } = raw?.decode()? {
                return Ok(Some(FormSetInfo { guid, nv_size }));
            }
        }
        Ok(None)
    }

    /// Storage regions in declaration order.
    ///
    /// A formset declaring non-zero storage size contributes an implicit
    /// default region (id 0, [`DEFAULT_REGION_NAME`], the formset's own
    /// GUID) ahead of the explicitly declared ones, unless an explicit
    /// region already claims id 0.
    pub fn storage_regions(&self) -> Result<Vec<Region>> {
        let mut declared = Vec::new();
        let mut formset: Option<FormSetInfo> = None;
        for raw in self.ops() {
            match raw?.decode()? {
                IfrOp::FormSet { guid, nv_size, .. } => {
                    formset.get_or_insert(FormSetInfo { guid, nv_size });
                }
                IfrOp::VarStore {
                    guid,
                    var_id,
                    size,
                    name,
                } => declared.push(Region {
                    guid,
                    var_id,
                    size,
                    name,
                }),
                _ => {}
            }
        }
        let mut regions = Vec::new();
        if let Some(fs) = formset
            && fs.nv_size > 0
            && !declared.iter().any(|r| r.var_id == 0)
        {
            regions.push(Region {
                guid: fs.guid,
                var_id: 0,
                size: fs.nv_size,
                name: DEFAULT_REGION_NAME.to_owned(),
            });
        }
        regions.extend(declared);
        Ok(regions)
    }

    /// Install a freshly built string chain. The buffer swap happens only
    /// after the new chain is fully built; a failure before this point
    /// leaves the old buffer in place.
    pub(crate) fn replace_strings(&mut self, chain: Vec<u8>) {
        let mut buffer = Vec::with_capacity(self.ifr_size + chain.len());
        buffer.extend_from_slice(self.ifr());
        buffer.extend_from_slice(&chain);
        self.string_size = chain.len();
        self.buffer = buffer;
    }

    /// Install a freshly built IFR pack, same discipline as
    /// [`Self::replace_strings`].
    pub(crate) fn replace_ifr(&mut self, ifr: Vec<u8>) {
        let mut buffer = Vec::with_capacity(ifr.len() + self.string_size);
        buffer.extend_from_slice(&ifr);
        buffer.extend_from_slice(self.strings());
        self.ifr_size = ifr.len();
        self.buffer = buffer;
    }
}
