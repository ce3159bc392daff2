//! Services module - the `types.xml` codec and preset lookup.
//!
//! Everything here is a plain function of its inputs and the store passed in;
//! there is no hidden state and no dependency on a front end.
//!
//! # Components
//!
//! - [`codec`]: Parses `types.xml` into [`TypeRecord`](crate::models::TypeRecord)s,
//!   serializes them back, and merges imports into a
//!   [`RecordStore`](crate::models::RecordStore) with a [`MergeReport`].
//! - [`presets`]: Resolves a preset by name and works out which categories an
//!   imported file adds to the fixed vocabulary.
//!
//! # Usage Example
//!
//! ```ignore
//! use camino::Utf8Path;
//! use typesforge::models::{ExportSettings, PresetSet, RecordStore};
//! use typesforge::services::{codec, presets};
//!
//! let vanilla = PresetSet::from_records(codec::import_file(Utf8Path::new("vanilla/types.xml"))?);
//! let mut store = RecordStore::new();
//!
//! let mut apple = presets::resolve(&vanilla, "Apple")?;
//! apple.nominal = 80;
//! store.add(apple)?;
//!
//! codec::export_file(store.list(), Utf8Path::new("types.xml"), &ExportSettings::default())?;
//! ```

pub mod codec;
pub mod presets;
mod xml_model;

pub use codec::{MergeReport, export, export_file, import, import_file, import_str, merge_into};
pub use presets::{extra_categories, merge_category_pool, resolve};
