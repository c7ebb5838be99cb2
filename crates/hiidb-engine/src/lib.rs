//! Boot-time resource database engine.
//!
//! Stores registered package sets (forms, strings, fonts, keyboard layouts)
//! under small integer handles and mutates them in place: string splicing,
//! form patching, default-image construction, and flattening the whole
//! database into an export buffer.
//!
//! Execution is single-threaded and run-to-completion. Every operation
//! either completes or fails synchronously, and buffer replacement follows a
//! build-new, swap, free-old discipline so a failure mid-build never leaves
//! a handle pointing at a half-written buffer.

pub mod database;
pub mod defaults;
pub mod errors;
pub mod export;
pub mod ingest;
pub mod instance;
pub mod patch;
pub mod storage;
pub mod strings;
pub mod tables;

#[cfg(test)]
mod ingest_tests;
#[cfg(test)]
mod patch_tests;
#[cfg(test)]
mod strings_tests;

pub use database::HiiDatabase;
pub use defaults::DefaultClass;
pub use errors::{HiiError, Result};
pub use ingest::Packages;
pub use instance::{FormSetInfo, Handle, PackageInstance, Region};
pub use patch::FormUpdate;
pub use storage::{MemStore, VarAccess};
pub use tables::{GlyphTable, KeyboardTable};
