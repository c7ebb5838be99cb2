//! Default-image interpreter.
//!
//! Builds one variable pack per storage region, pre-populated with the
//! region's default configuration under a selectable default class. A saved
//! override image short-circuits the interpreter; otherwise the region is
//! seeded from persisted bytes and a single linear opcode scan writes field
//! defaults over the seed.

use hiidb_format::{FLAG_DEFAULT, FLAG_MANUFACTURING, IfrOp, VariablePack};

use crate::database::HiiDatabase;
use crate::errors::{HiiError, Result};
use crate::instance::{Handle, Region};
use crate::storage::VarAccess;

/// Which annotated default wins when a field declares more than one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultClass {
    Standard,
    Manufacturing,
}

impl DefaultClass {
    /// Name suffix of a saved override image for this class.
    pub fn override_suffix(self) -> &'static str {
        match self {
            Self::Standard => "Default",
            Self::Manufacturing => "MfgDefault",
        }
    }

    /// Precedence of an option's flags for this class. 0 means unflagged;
    /// higher wins. Manufacturing falls back to the standard flag when no
    /// option carries the manufacturing flag.
    fn flag_rank(self, flags: u8) -> u8 {
        match self {
            Self::Standard => {
                if flags & FLAG_DEFAULT != 0 {
                    2
                } else {
                    0
                }
            }
            Self::Manufacturing => {
                if flags & FLAG_MANUFACTURING != 0 {
                    2
                } else if flags & FLAG_DEFAULT != 0 {
                    1
                } else {
                    0
                }
            }
        }
    }
}

/// An open one-of question awaiting its options.
struct OpenOneOf {
    offset: u16,
    width: u8,
    /// Rank of the default already written; `None` before the first option.
    written: Option<u8>,
}

impl HiiDatabase {
    /// Build the default configuration image set for one handle.
    ///
    /// One variable pack per storage region, including the implicit region a
    /// formset declares through non-zero storage size. `NotFound` only when
    /// the instance has no storage at all.
    pub fn get_default_image(
        &self,
        handle: Handle,
        class: DefaultClass,
        store: &dyn VarAccess,
    ) -> Result<Vec<VariablePack>> {
        let instance = &self.entry(handle)?.instance;
        let regions = instance.storage_regions()?;
        if regions.is_empty() {
            return Err(HiiError::NotFound);
        }

        let mut packs = Vec::with_capacity(regions.len());
        for region in regions {
            let data = match saved_override(&region, class, store) {
                Some(image) => image,
                None => self.region_defaults(handle, &region, class, store)?,
            };
            packs.push(VariablePack {
                var_id: region.var_id,
                guid: region.guid,
                name: region.name,
                data,
            });
        }
        Ok(packs)
    }

    /// Seed one region from its persisted bytes, then scan the opcode stream
    /// once writing field defaults for the requested class.
    fn region_defaults(
        &self,
        handle: Handle,
        region: &Region,
        class: DefaultClass,
        store: &dyn VarAccess,
    ) -> Result<Vec<u8>> {
        let instance = &self.entry(handle)?.instance;
        let mut data = store.read(&region.name, &region.guid).unwrap_or_default();
        data.resize(region.size as usize, 0);

        // The implicit region carries id 0, which is also the id every
        // stream starts selected on.
        let mut selected: u16 = 0;
        let mut one_of: Option<OpenOneOf> = None;

        for raw in instance.ops() {
            match raw?.decode()? {
                IfrOp::VarStoreSelect { var_id } => selected = var_id,
                IfrOp::OneOf { offset, width, .. } => {
                    one_of = (selected == region.var_id).then_some(OpenOneOf {
                        offset,
                        width,
                        written: None,
                    });
                }
                IfrOp::OneOfOption { value, flags, .. } => {
                    if let Some(open) = &mut one_of {
                        let rank = class.flag_rank(flags);
                        if open.written.is_none_or(|prev| rank > prev) {
                            write_le(&mut data, open.offset, open.width, value);
                            open.written = Some(rank);
                        }
                    }
                }
                IfrOp::EndOneOf => one_of = None,
                IfrOp::Checkbox { offset, width, flags, .. } => {
                    if selected == region.var_id && class.flag_rank(flags) > 0 {
                        write_le(&mut data, offset, width, 1);
                    }
                }
                IfrOp::Numeric {
                    offset,
                    width,
                    default,
                    ..
                } => {
                    if selected == region.var_id {
                        write_le(&mut data, offset, width, default);
                    }
                }
                // Ordered-list, password, and free-text fields have no
                // default-value opcode; the seed stands.
                _ => {}
            }
        }
        Ok(data)
    }
}

/// A previously saved override image for this class, if one is persisted and
/// sized exactly like the region.
fn saved_override(
    region: &Region,
    class: DefaultClass,
    store: &dyn VarAccess,
) -> Option<Vec<u8>> {
    let name = format!("{}{}", region.name, class.override_suffix());
    let image = store.read(&name, &region.guid)?;
    (image.len() == region.size as usize).then_some(image)
}

/// Write `value` little-endian into `width` bytes at `offset`, clamped to
/// the buffer.
fn write_le(data: &mut [u8], offset: u16, width: u8, value: u16) {
    let bytes = value.to_le_bytes();
    for i in 0..width as usize {
        let Some(slot) = data.get_mut(offset as usize + i) else {
            break;
        };
        *slot = bytes.get(i).copied().unwrap_or(0);
    }
}
