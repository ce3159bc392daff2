use super::record::TypeRecord;
use crate::error::{Result, TypesError};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Handle to a record inside one [`RecordStore`].
///
/// Ids are allocated from a per-store counter and never reused, so the id of a
/// deleted record stays invalid for the lifetime of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered working set of type records with unique names.
///
/// Records keep their insertion order, which is the order they are exported
/// in. Every mutating operation either applies fully or returns an error and
/// leaves the store untouched.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: IndexMap<RecordId, TypeRecord>,
    names: HashMap<String, RecordId>,
    next_id: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from imported records, keeping the first of any repeated name.
    ///
    /// Returns the store and the names that were refused, either as repeats
    /// or as invalid names.
    pub fn from_records<I>(records: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = TypeRecord>,
    {
        let mut store = Self::new();
        let mut skipped = Vec::new();
        for record in records {
            let name = record.name.clone();
            if store.add(record).is_err() {
                skipped.push(name);
            }
        }
        (store, skipped)
    }

    /// Append a new record.
    ///
    /// # Errors
    /// - [`TypesError::InvalidName`] if the name is blank or padded with whitespace
    /// - [`TypesError::DuplicateName`] if a record with this name exists
    pub fn add(&mut self, mut record: TypeRecord) -> Result<RecordId> {
        validate_name(&record.name)?;
        record.normalize();
        if self.names.contains_key(&record.name) {
            return Err(TypesError::DuplicateName(record.name));
        }
        let id = self.allocate_id();
        self.names.insert(record.name.clone(), id);
        self.records.insert(id, record);
        tracing::debug!("Added type {} as {}", self.records[&id].name, id);
        Ok(id)
    }

    /// Append, or overwrite the record that already carries this name.
    ///
    /// An overwritten record keeps its id and position.
    pub fn add_or_replace(&mut self, mut record: TypeRecord) -> Result<RecordId> {
        validate_name(&record.name)?;
        record.normalize();
        match self.names.get(&record.name).copied() {
            Some(id) => {
                tracing::debug!("Overwriting type {} at {}", record.name, id);
                self.records.insert(id, record);
                Ok(id)
            }
            None => self.add(record),
        }
    }

    /// Replace the record at `id`. Renaming is allowed as long as the new name
    /// is not used by another record.
    pub fn update(&mut self, id: RecordId, mut record: TypeRecord) -> Result<()> {
        validate_name(&record.name)?;
        record.normalize();
        let current = self
            .records
            .get(&id)
            .ok_or_else(|| TypesError::NotFound(format!("Record {}", id)))?;

        if matches!(self.names.get(&record.name), Some(&owner) if owner != id) {
            return Err(TypesError::DuplicateName(record.name));
        }

        if current.name != record.name {
            self.names.remove(&current.name);
            self.names.insert(record.name.clone(), id);
        }
        self.records.insert(id, record);
        Ok(())
    }

    /// Copy the record at `id` under `new_name`, placing the copy right after it.
    pub fn duplicate(&mut self, id: RecordId, new_name: &str) -> Result<RecordId> {
        let index = self
            .records
            .get_index_of(&id)
            .ok_or_else(|| TypesError::NotFound(format!("Record {}", id)))?;
        validate_name(new_name)?;
        if self.names.contains_key(new_name) {
            return Err(TypesError::DuplicateName(new_name.to_string()));
        }

        let copy = self.records[index].renamed(new_name);
        let new_id = self.allocate_id();
        self.names.insert(copy.name.clone(), new_id);
        self.records.shift_insert(index + 1, new_id, copy);
        Ok(new_id)
    }

    /// Remove the record at `id`, keeping the order of the others.
    pub fn delete(&mut self, id: RecordId) -> Result<TypeRecord> {
        let record = self
            .records
            .shift_remove(&id)
            .ok_or_else(|| TypesError::NotFound(format!("Record {}", id)))?;
        self.names.remove(&record.name);
        tracing::debug!("Deleted type {} ({})", record.name, id);
        Ok(record)
    }

    /// Exact, case-sensitive name lookup.
    pub fn find(&self, name: &str) -> Option<RecordId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: RecordId) -> Option<&TypeRecord> {
        self.records.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&TypeRecord> {
        self.find(name).and_then(|id| self.get(id))
    }

    /// Row of `id` in export order.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.get_index_of(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order. Each call starts a fresh pass.
    pub fn list(&self) -> impl Iterator<Item = &TypeRecord> {
        self.records.values()
    }

    /// `(id, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &TypeRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.keys().copied()
    }

    /// Owned copy of the records, in order.
    pub fn to_vec(&self) -> Vec<TypeRecord> {
        self.list().cloned().collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for category in self.list().filter_map(|r| r.category.as_ref()) {
            if !seen.contains(category) {
                seen.push(category.clone());
            }
        }
        seen
    }

    /// Name for a copy of `name` that is free in this store: `<name>_Copy`,
    /// then `<name>_Copy2`, `<name>_Copy3`, ...
    pub fn default_copy_name(&self, name: &str) -> String {
        let base = format!("{}_Copy", name);
        if !self.names.contains_key(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}{}", base, n);
            if !self.names.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Drop every record. Ids are not reset.
    pub fn clear(&mut self) {
        self.records.clear();
        self.names.clear();
    }

    fn allocate_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Names must be non-blank and carry no surrounding whitespace, since the
/// importer trims the `name` attribute.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.trim() != name {
        Err(TypesError::InvalidName)
    } else {
        Ok(())
    }
}

/// Read-only lookup set of reference records, usually the vanilla `types.xml`.
///
/// Editing operations never touch a preset set; it is only replaced or cleared
/// as a whole.
#[derive(Debug, Clone, Default)]
pub struct PresetSet {
    store: RecordStore,
}

impl PresetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from imported records. A later definition of a name replaces an
    /// earlier one; records without a usable name are ignored.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TypeRecord>,
    {
        let mut store = RecordStore::new();
        for record in records {
            if let Err(e) = store.add_or_replace(record) {
                tracing::warn!("Ignoring preset entry: {}", e);
            }
        }
        Self { store }
    }

    pub fn get(&self, name: &str) -> Option<&TypeRecord> {
        self.store.get_by_name(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.find(name).is_some()
    }

    /// Preset names sorted for display in a picker.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.store.list().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }

    pub fn records(&self) -> impl Iterator<Item = &TypeRecord> {
        self.store.list()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> TypeRecord {
        let mut record = TypeRecord::template("Apple");
        record.nominal = 40;
        record.category = Some("food".to_string());
        record.usage = vec!["Farm".to_string(), "Village".to_string()];
        record
    }

    #[test]
    fn test_add_then_find() {
        let mut store = RecordStore::new();
        let id = store.add(apple()).unwrap();
        assert_eq!(store.find("Apple"), Some(id));
        assert_eq!(store.get(id).unwrap().nominal, 40);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_is_case_sensitive() {
        let mut store = RecordStore::new();
        store.add(apple()).unwrap();
        assert!(store.find("apple").is_none());
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut store = RecordStore::new();
        store.add(apple()).unwrap();
        let err = store.add(TypeRecord::new("Apple")).unwrap_err();
        assert!(matches!(err, TypesError::DuplicateName(ref n) if n == "Apple"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_name("Apple").unwrap().nominal, 40);
    }

    #[test]
    fn test_add_blank_name_rejected() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.add(TypeRecord::new("  ")),
            Err(TypesError::InvalidName)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_padded_name_rejected() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.add(TypeRecord::new(" Apple")),
            Err(TypesError::InvalidName)
        ));
        let id = store.add(TypeRecord::new("Apple")).unwrap();
        assert!(matches!(
            store.update(id, TypeRecord::new("Apple ")),
            Err(TypesError::InvalidName)
        ));
        assert!(matches!(
            store.duplicate(id, "\tPear"),
            Err(TypesError::InvalidName)
        ));
        assert_eq!(store.get(id).unwrap().name, "Apple");
    }

    #[test]
    fn test_stored_records_are_normalized() {
        let mut store = RecordStore::new();
        let mut record = TypeRecord::new("Apple");
        record.category = Some(String::new());
        record.value = vec!["Tier1".to_string(), String::new()];

        let id = store.add(record).unwrap();

        let stored = store.get(id).unwrap();
        assert!(stored.category.is_none());
        assert_eq!(stored.value, vec!["Tier1"]);
    }

    #[test]
    fn test_add_or_replace_keeps_position() {
        let mut store = RecordStore::new();
        let first = store.add(apple()).unwrap();
        store.add(TypeRecord::new("Pear")).unwrap();

        let mut replacement = TypeRecord::new("Apple");
        replacement.nominal = 5;
        let id = store.add_or_replace(replacement).unwrap();

        assert_eq!(id, first);
        assert_eq!(store.position(id), Some(0));
        assert_eq!(store.get(id).unwrap().nominal, 5);
    }

    #[test]
    fn test_update_with_rename() {
        let mut store = RecordStore::new();
        let id = store.add(apple()).unwrap();

        store.update(id, apple().renamed("GreenApple")).unwrap();

        assert!(store.find("Apple").is_none());
        assert_eq!(store.find("GreenApple"), Some(id));
    }

    #[test]
    fn test_update_collision_leaves_store_unchanged() {
        let mut store = RecordStore::new();
        let apple_id = store.add(apple()).unwrap();
        store.add(TypeRecord::new("Pear")).unwrap();

        let err = store.update(apple_id, TypeRecord::new("Pear")).unwrap_err();

        assert!(matches!(err, TypesError::DuplicateName(_)));
        assert_eq!(store.get(apple_id).unwrap(), &apple());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_same_name_allowed() {
        let mut store = RecordStore::new();
        let id = store.add(apple()).unwrap();
        let mut edited = apple();
        edited.lifetime = 3600;
        store.update(id, edited).unwrap();
        assert_eq!(store.get(id).unwrap().lifetime, 3600);
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = RecordStore::new();
        let id = store.add(apple()).unwrap();
        store.delete(id).unwrap();
        assert!(matches!(
            store.update(id, apple()),
            Err(TypesError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_copies_every_field() {
        let mut store = RecordStore::new();
        let id = store.add(apple()).unwrap();
        store.add(TypeRecord::new("Pear")).unwrap();

        let copy_id = store.duplicate(id, "Apple2").unwrap();

        let copy = store.get(copy_id).unwrap();
        assert_eq!(copy, &apple().renamed("Apple2"));
        assert_eq!(store.position(copy_id), Some(1));
    }

    #[test]
    fn test_duplicate_errors() {
        let mut store = RecordStore::new();
        let id = store.add(apple()).unwrap();
        assert!(matches!(
            store.duplicate(id, "Apple"),
            Err(TypesError::DuplicateName(_))
        ));
        store.delete(id).unwrap();
        assert!(matches!(
            store.duplicate(id, "Apple2"),
            Err(TypesError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_twice_fails() {
        let mut store = RecordStore::new();
        let id = store.add(apple()).unwrap();

        let removed = store.delete(id).unwrap();
        assert_eq!(removed.name, "Apple");
        assert!(matches!(store.delete(id), Err(TypesError::NotFound(_))));
        assert!(store.get(id).is_none());
        assert!(store.find("Apple").is_none());
    }

    #[test]
    fn test_ids_not_reused() {
        let mut store = RecordStore::new();
        let id = store.add(apple()).unwrap();
        store.delete(id).unwrap();
        let again = store.add(apple()).unwrap();
        assert_ne!(id, again);
        assert!(!store.contains(id));
    }

    #[test]
    fn test_list_is_ordered_and_restartable() {
        let mut store = RecordStore::new();
        for name in ["C", "A", "B"] {
            store.add(TypeRecord::new(name)).unwrap();
        }
        let first: Vec<_> = store.list().map(|r| r.name.as_str()).collect();
        let second: Vec<_> = store.list().map(|r| r.name.as_str()).collect();
        assert_eq!(first, vec!["C", "A", "B"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut store = RecordStore::new();
        let ids: Vec<_> = ["A", "B", "C"]
            .iter()
            .map(|n| store.add(TypeRecord::new(*n)).unwrap())
            .collect();
        store.delete(ids[1]).unwrap();
        let names: Vec<_> = store.list().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_default_copy_name() {
        let mut store = RecordStore::new();
        store.add(apple()).unwrap();
        assert_eq!(store.default_copy_name("Apple"), "Apple_Copy");
        store.add(TypeRecord::new("Apple_Copy")).unwrap();
        assert_eq!(store.default_copy_name("Apple"), "Apple_Copy2");
    }

    #[test]
    fn test_from_records_skips_repeats() {
        let (store, skipped) =
            RecordStore::from_records(vec![apple(), TypeRecord::new("Apple")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_name("Apple").unwrap().nominal, 40);
        assert_eq!(skipped, vec!["Apple"]);
    }

    #[test]
    fn test_categories_first_seen() {
        let mut store = RecordStore::new();
        store.add(apple()).unwrap();
        let mut axe = TypeRecord::new("Hatchet");
        axe.category = Some("tools".to_string());
        store.add(axe).unwrap();
        let mut pear = TypeRecord::new("Pear");
        pear.category = Some("food".to_string());
        store.add(pear).unwrap();
        assert_eq!(store.categories(), vec!["food", "tools"]);
    }

    #[test]
    fn test_preset_set_later_definition_wins() {
        let mut later = TypeRecord::new("Apple");
        later.nominal = 1;
        let presets = PresetSet::from_records(vec![apple(), later, TypeRecord::new("Banana")]);
        assert_eq!(presets.len(), 2);
        assert_eq!(presets.get("Apple").unwrap().nominal, 1);
        assert_eq!(presets.names(), vec!["Apple", "Banana"]);
    }
}
