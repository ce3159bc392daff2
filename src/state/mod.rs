// State management module
//
// This module provides the EditorSession which wraps EditorState with thread-safe
// access using Arc<RwLock<T>> and emits change events for a front end.

use crate::error::{Result, TypesError};
use crate::models::{EditorConfig, EditorState, ExportSettings, PresetSet, RecordId, RecordStore, TypeRecord, Vocabulary};
use crate::services::{self, MergeReport};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Change events emitted when the session is modified
///
/// A front end subscribes to these instead of polling the state.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionChange {
    /// A record was appended to the working set
    RecordAdded { id: RecordId, name: String },

    /// A record was edited in place (possibly renamed)
    RecordUpdated { id: RecordId, name: String },

    /// A record was deleted
    RecordRemoved { id: RecordId, name: String },

    /// The working set was replaced by an opened file or cleared
    WorkingSetReplaced { count: usize, skipped: usize },

    /// Records from a file were merged into the working set
    MergeCompleted { added: usize, skipped: Vec<String> },

    /// A preset file was loaded
    PresetsLoaded { count: usize },

    /// Presets were dropped
    PresetsCleared,

    /// The selectable category list changed
    CategoriesChanged { categories: Vec<String> },

    /// The working set was written to disk
    Exported { path: Utf8PathBuf, count: usize },
}

/// Thread-safe editing session with event emission
///
/// This is the contract between a front end and the data model:
/// - Owns the working [`RecordStore`] and the [`PresetSet`] as two independent stores
/// - Maps "is anything selected" onto add or update ([`save_edit`](Self::save_edit))
/// - Keeps the category picker in sync with imported and saved records
/// - Broadcasts [`SessionChange`] events via a tokio broadcast channel
///
/// Every operation is atomic: files are parsed before the lock is taken and
/// an error leaves the state exactly as it was.
pub struct EditorSession {
    /// The session state protected by RwLock for thread-safe access
    state: Arc<RwLock<EditorState>>,

    /// Broadcast channel for emitting change events
    change_tx: broadcast::Sender<SessionChange>,

    vocabulary: Arc<Vocabulary>,
    export_settings: Arc<ExportSettings>,
}

impl EditorSession {
    /// Create a session with an empty working set and no presets
    pub fn new(config: &EditorConfig) -> Self {
        let (change_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(EditorState::with_categories(
                config.vocabulary.categories.clone(),
            ))),
            change_tx,
            vocabulary: Arc::new(config.vocabulary.clone()),
            export_settings: Arc::new(config.export.clone()),
        }
    }

    /// Get a copy of the whole state
    pub fn snapshot(&self) -> EditorState {
        self.read_guard().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let count = session.read(|state| state.working.len());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EditorState) -> R,
    {
        let state = self.read_guard();
        f(&state)
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.change_tx.subscribe()
    }

    /// Replace the working set with the contents of a file.
    ///
    /// Repeated names inside the file keep their first occurrence; the
    /// dropped names are returned in the report.
    pub fn open_working(&self, path: &Utf8Path) -> Result<MergeReport> {
        let records = services::import_file(path)?;
        let extras = services::extra_categories(&records, &self.vocabulary.categories);
        let (store, skipped) = RecordStore::from_records(records);
        let report = MergeReport {
            added: store.ids().collect(),
            skipped,
        };

        let changes = {
            let mut state = self.write_guard();
            state.working = store;
            state.current_path = Some(path.to_path_buf());
            state.dirty = false;
            let mut changes = vec![SessionChange::WorkingSetReplaced {
                count: state.working.len(),
                skipped: report.skipped.len(),
            }];
            changes.extend(self.reset_categories(&mut state, &extras));
            changes
        };

        tracing::info!("Opened {} ({})", path, report.summary());
        self.emit(changes);
        Ok(report)
    }

    /// Merge the contents of a file into the working set. Records whose name
    /// is already present are kept and reported as skipped.
    pub fn merge_working(&self, path: &Utf8Path) -> Result<MergeReport> {
        let records = services::import_file(path)?;

        let (report, changes) = {
            let mut state = self.write_guard();
            let report = services::merge_into(&mut state.working, records);
            if !report.added.is_empty() {
                state.dirty = true;
            }
            let mut changes = vec![SessionChange::MergeCompleted {
                added: report.added.len(),
                skipped: report.skipped.clone(),
            }];
            changes.extend(self.sync_categories(&mut state));
            (report, changes)
        };

        tracing::info!("Merged {} ({})", path, report.summary());
        self.emit(changes);
        Ok(report)
    }

    /// Load a preset file, replacing any presets loaded before.
    pub fn load_presets(&self, path: &Utf8Path) -> Result<usize> {
        let records = services::import_file(path)?;
        let presets = PresetSet::from_records(records);
        let count = presets.len();

        let changes = {
            let mut state = self.write_guard();
            state.presets = presets;
            let mut changes = vec![SessionChange::PresetsLoaded { count }];
            changes.extend(self.sync_categories(&mut state));
            changes
        };

        tracing::info!("Loaded {} presets from {}", count, path);
        self.emit(changes);
        Ok(count)
    }

    pub fn clear_presets(&self) {
        self.write_guard().presets = PresetSet::new();
        tracing::info!("Presets cleared");
        self.emit(vec![SessionChange::PresetsCleared]);
    }

    /// Start an empty list: no records, vocabulary-only categories, no file.
    pub fn new_list(&self) {
        let changes = {
            let mut state = self.write_guard();
            state.working.clear();
            state.current_path = None;
            state.dirty = false;
            let mut changes = vec![SessionChange::WorkingSetReplaced {
                count: 0,
                skipped: 0,
            }];
            changes.extend(self.reset_categories(&mut state, &[]));
            changes
        };
        self.emit(changes);
    }

    /// Commit an edit from the form.
    ///
    /// With nothing selected the record is added; otherwise it replaces the
    /// selected record.
    ///
    /// # Errors
    /// - [`TypesError::DuplicateName`] if the name belongs to another record
    /// - [`TypesError::NotFound`] if the selection no longer exists
    /// - [`TypesError::InvalidName`] if the name is blank
    pub fn save_edit(&self, selection: Option<RecordId>, record: TypeRecord) -> Result<RecordId> {
        let name = record.name.clone();
        let category = record.category.clone();

        let (id, changes) = {
            let mut state = self.write_guard();
            let (id, change) = match selection {
                None => {
                    let id = state.working.add(record)?;
                    (id, SessionChange::RecordAdded { id, name })
                }
                Some(id) => {
                    state.working.update(id, record)?;
                    (id, SessionChange::RecordUpdated { id, name })
                }
            };
            state.dirty = true;
            let mut changes = vec![change];
            if state.remember_category(category.as_deref()) {
                changes.push(SessionChange::CategoriesChanged {
                    categories: state.category_pool.clone(),
                });
            }
            (id, changes)
        };

        self.emit(changes);
        Ok(id)
    }

    /// Copy a record. Without a name the copy is called `<name>_Copy`.
    pub fn duplicate(&self, id: RecordId, new_name: Option<&str>) -> Result<RecordId> {
        let (copy_id, name) = {
            let mut state = self.write_guard();
            let source = state
                .working
                .get(id)
                .ok_or_else(|| TypesError::NotFound(format!("Record {}", id)))?;
            let name = match new_name {
                Some(n) => n.to_string(),
                None => state.working.default_copy_name(&source.name),
            };
            let copy_id = state.working.duplicate(id, &name)?;
            state.dirty = true;
            (copy_id, name)
        };

        self.emit(vec![SessionChange::RecordAdded { id: copy_id, name }]);
        Ok(copy_id)
    }

    pub fn delete(&self, id: RecordId) -> Result<TypeRecord> {
        let removed = {
            let mut state = self.write_guard();
            let removed = state.working.delete(id)?;
            state.dirty = true;
            removed
        };

        self.emit(vec![SessionChange::RecordRemoved {
            id,
            name: removed.name.clone(),
        }]);
        Ok(removed)
    }

    /// Pre-fill from a preset and commit it.
    ///
    /// The preset is copied (optionally renamed) and then added, or written
    /// over `target` when one is given. A missing preset changes nothing.
    pub fn apply_preset(
        &self,
        preset: &str,
        target: Option<RecordId>,
        rename: Option<&str>,
    ) -> Result<RecordId> {
        let mut record = self.read(|state| services::resolve(&state.presets, preset))?;
        if let Some(name) = rename {
            record.name = name.to_string();
        }
        self.save_edit(target, record)
    }

    /// Write the working set to `path` and remember it as the current file.
    ///
    /// # Errors
    /// [`TypesError::EmptyExport`] when there is nothing to write.
    pub fn export(&self, path: &Utf8Path) -> Result<usize> {
        let records = self.read(|state| state.working.to_vec());
        if records.is_empty() {
            return Err(TypesError::EmptyExport);
        }

        let count = services::export_file(&records, path, &self.export_settings)?;

        {
            let mut state = self.write_guard();
            state.current_path = Some(path.to_path_buf());
            state.dirty = false;
        }

        self.emit(vec![SessionChange::Exported {
            path: path.to_path_buf(),
            count,
        }]);
        Ok(count)
    }

    /// Find a working record by exact name
    pub fn find(&self, name: &str) -> Option<RecordId> {
        self.read(|state| state.working.find(name))
    }

    pub fn category_pool(&self) -> Vec<String> {
        self.read(|state| state.category_pool.clone())
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.read(|state| state.presets.names())
    }

    /// Rebuild the pool from the vocabulary and `extras`.
    fn reset_categories(&self, state: &mut EditorState, extras: &[String]) -> Option<SessionChange> {
        let pool = services::merge_category_pool(&self.vocabulary.categories, extras);
        if pool == state.category_pool {
            return None;
        }
        state.category_pool = pool;
        Some(SessionChange::CategoriesChanged {
            categories: state.category_pool.clone(),
        })
    }

    /// Fold the categories of the working set and the presets into the pool.
    fn sync_categories(&self, state: &mut EditorState) -> Option<SessionChange> {
        let mut extras = services::extra_categories(state.working.list(), &self.vocabulary.categories);
        for category in services::extra_categories(state.presets.records(), &self.vocabulary.categories) {
            if !extras.contains(&category) {
                extras.push(category);
            }
        }
        for category in state.category_pool.iter() {
            if !self.vocabulary.categories.contains(category) && !extras.contains(category) {
                extras.push(category.clone());
            }
        }
        self.reset_categories(state, &extras)
    }

    fn emit(&self, changes: Vec<SessionChange>) {
        for change in changes {
            tracing::debug!("Session change: {:?}", change);
            // Ignore send errors - it's OK if no one is listening
            let _ = self.change_tx.send(change);
        }
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, EditorState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, EditorState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

// Make EditorSession cloneable for sharing across threads
impl Clone for EditorSession {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            change_tx: self.change_tx.clone(),
            vocabulary: Arc::clone(&self.vocabulary),
            export_settings: Arc::clone(&self.export_settings),
        }
    }
}
