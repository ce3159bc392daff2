use super::store::{PresetSet, RecordStore};
use camino::Utf8PathBuf;

/// Everything one editing session holds.
///
/// # Thread Safety
///
/// `EditorState` is wrapped in `Arc<RwLock<EditorState>>` by
/// [`crate::state::EditorSession`]. Mutate it only through the session so
/// that change events are emitted and the stores stay consistent with the
/// category pool.
#[derive(Clone, Debug, Default)]
pub struct EditorState {
    /// Records being edited; this is what gets exported.
    pub working: RecordStore,

    /// Reference records for pre-filling edits. Never edited in place.
    pub presets: PresetSet,

    /// Categories offered by the picker: the configured vocabulary plus any
    /// category met in imported files or saved records.
    pub category_pool: Vec<String>,

    /// File the working set was last opened from or exported to.
    pub current_path: Option<Utf8PathBuf>,

    /// Set by every edit, cleared by open and export.
    pub dirty: bool,
}

impl EditorState {
    pub fn with_categories(category_pool: Vec<String>) -> Self {
        Self {
            category_pool,
            ..Default::default()
        }
    }

    pub fn has_presets(&self) -> bool {
        !self.presets.is_empty()
    }

    /// Add `category` to the pool if it is new. Returns whether the pool changed.
    pub fn remember_category(&mut self, category: Option<&str>) -> bool {
        match category {
            Some(c) if !c.is_empty() && !self.category_pool.iter().any(|p| p == c) => {
                self.category_pool.push(c.to_string());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = EditorState::default();
        assert!(state.working.is_empty());
        assert!(!state.has_presets());
        assert!(!state.dirty);
        assert!(state.current_path.is_none());
    }

    #[test]
    fn test_remember_category() {
        let mut state = EditorState::with_categories(vec!["food".to_string()]);
        assert!(!state.remember_category(Some("food")));
        assert!(!state.remember_category(None));
        assert!(!state.remember_category(Some("")));
        assert!(state.remember_category(Some("vehicleparts")));
        assert_eq!(state.category_pool, vec!["food", "vehicleparts"]);
    }
}
