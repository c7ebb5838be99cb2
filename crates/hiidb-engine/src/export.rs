//! Export serializer: flatten one handle or the whole database.
//!
//! Two passes share one emit routine parameterized by a byte sink, one sink
//! counting and one writing, so the sizing pass and the writing pass cannot
//! disagree. The fallible work (region enumeration, persisted reads) happens
//! once up front; emission itself is infallible.

use hiidb_format::cursor::Writer;
use hiidb_format::{
    DATA_TABLE_HEADER_SIZE, DataTableHeader, EXPORT_HEADER_SIZE, EXPORT_REVISION, ExportHeader,
    PACK_HEADER_SIZE, PackHeader, PackKind, VariablePack,
};

use crate::database::{Entry, HiiDatabase};
use crate::errors::{HiiError, Result};
use crate::instance::Handle;
use crate::storage::VarAccess;

/// Destination of one emit pass.
trait ByteSink {
    fn put(&mut self, bytes: &[u8]);
}

/// Pass 1: measures without writing.
struct CountSink {
    len: usize,
}

impl ByteSink for CountSink {
    fn put(&mut self, bytes: &[u8]) {
        self.len += bytes.len();
    }
}

/// Pass 2: writes into the caller's buffer. Pass 1 has already proven the
/// buffer large enough.
struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl ByteSink for SliceSink<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }
}

/// Everything one data table needs, resolved before either pass runs.
struct TablePlan<'a> {
    entry: &'a Entry,
    vars: Vec<VariablePack>,
    language_count: u16,
}

impl HiiDatabase {
    /// Serialize one handle (or, with `None`, every handle) into `out`.
    ///
    /// Returns the number of bytes written. A buffer smaller than required
    /// fails with [`HiiError::BufferTooSmall`] carrying the exact size, and
    /// nothing is written.
    pub fn export(
        &self,
        handle: Option<Handle>,
        store: &dyn VarAccess,
        out: &mut [u8],
    ) -> Result<usize> {
        let plans = self.plan(handle, store)?;

        let mut count = CountSink { len: 0 };
        emit(&plans, &mut count);
        let required = count.len;
        if required > out.len() {
            return Err(HiiError::BufferTooSmall { required });
        }

        let mut slice = SliceSink { buf: out, pos: 0 };
        emit(&plans, &mut slice);
        debug_assert_eq!(slice.pos, required);
        Ok(required)
    }

    fn plan(&self, handle: Option<Handle>, store: &dyn VarAccess) -> Result<Vec<TablePlan<'_>>> {
        let mut plans = Vec::new();
        for entry in self.entries() {
            if let Some(h) = handle
                && entry.handle != h
            {
                continue;
            }
            plans.push(self.plan_one(entry, store)?);
        }
        if handle.is_some() && plans.is_empty() {
            return Err(HiiError::NotFound);
        }
        Ok(plans)
    }

    fn plan_one<'a>(&self, entry: &'a Entry, store: &dyn VarAccess) -> Result<TablePlan<'a>> {
        let instance = &entry.instance;

        // One variable pack per storage region, in declaration order, holding
        // the currently persisted bytes sized to the declared region size.
        let mut vars = Vec::new();
        for region in instance.storage_regions()? {
            let mut data = store.read(&region.name, &region.guid).unwrap_or_default();
            data.resize(region.size as usize, 0);
            vars.push(VariablePack {
                var_id: region.var_id,
                guid: region.guid,
                name: region.name,
                data,
            });
        }

        let mut language_count = 0u16;
        for pack in instance.string_chain() {
            pack?;
            language_count += 1;
        }

        Ok(TablePlan {
            entry,
            vars,
            language_count,
        })
    }
}

fn emit(plans: &[TablePlan<'_>], sink: &mut dyn ByteSink) {
    let mut w = Writer::with_capacity(EXPORT_HEADER_SIZE);
    ExportHeader {
        table_count: plans.len() as u32,
        revision: EXPORT_REVISION,
    }
    .write(&mut w);
    sink.put(&w.finish());

    for plan in plans {
        emit_table(plan, sink);
    }
}

/// One data table: header, device-path stub, variable packs, IFR bytes,
/// string-chain bytes. Offsets are table-relative; 0 marks an absent section.
fn emit_table(plan: &TablePlan<'_>, sink: &mut dyn ByteSink) {
    let instance = &plan.entry.instance;
    let vars_size: usize = plan.vars.iter().map(VariablePack::encoded_len).sum();

    let device_path_offset = DATA_TABLE_HEADER_SIZE;
    let vars_start = device_path_offset + PACK_HEADER_SIZE;
    let ifr_start = vars_start + vars_size;
    let string_start = ifr_start + instance.ifr_size();
    let table_size = string_start + instance.string_size();

    let mut w = Writer::with_capacity(DATA_TABLE_HEADER_SIZE + PACK_HEADER_SIZE + vars_size);
    DataTableHeader {
        handle: plan.entry.handle,
        guid: instance.guid(),
        table_size: table_size as u32,
        device_path_offset: device_path_offset as u32,
        variable_offset: if plan.vars.is_empty() {
            0
        } else {
            vars_start as u32
        },
        variable_count: plan.vars.len() as u32,
        ifr_offset: if instance.ifr_size() == 0 {
            0
        } else {
            ifr_start as u32
        },
        string_offset: if instance.string_size() == 0 {
            0
        } else {
            string_start as u32
        },
        language_count: plan.language_count,
    }
    .write(&mut w);

    // Device-path stub: a bare pack header, always present.
    PackHeader {
        length: PACK_HEADER_SIZE as u32,
        kind: PackKind::DevicePath,
    }
    .write(&mut w);

    for var in &plan.vars {
        var.encode(&mut w);
    }
    sink.put(&w.finish());

    sink.put(instance.ifr());
    sink.put(instance.strings());
}
