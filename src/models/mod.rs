//! Data models for typesforge.
//!
//! - [`TypeRecord`]: one `<type>` entry with typed numeric fields, [`Flags`],
//!   a category and the ordered usage/value/tag lists
//! - [`RecordStore`]: the ordered working set, unique by name, addressed by [`RecordId`]
//! - [`PresetSet`]: read-only reference records (usually the vanilla `types.xml`)
//! - [`EditorState`]: working set, preset set and category pool of one editing session
//! - [`EditorConfig`]: editor settings loaded from `typesforge.yaml`
//!
//! # Architecture Note
//!
//! Stores are plain owned values. The editing session wraps them in
//! `Arc<RwLock<>>` (see [`EditorSession`](crate::state::EditorSession)); the
//! models themselves know nothing about locking, files or events.

pub mod config;
pub mod editor_state;
pub mod record;
pub mod store;

pub use config::{EditorConfig, ExportSettings, LogSettings, Vocabulary};
pub use editor_state::EditorState;
pub use record::{
    CATEGORY_PRESETS, FlagName, Flags, TAG_PRESETS, TypeRecord, USAGE_PRESETS, VALUE_PRESETS,
};
pub use store::{PresetSet, RecordId, RecordStore};
