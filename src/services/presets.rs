use crate::error::{Result, TypesError};
use crate::models::{PresetSet, TypeRecord};

/// Look up a preset by exact name and return a copy of it.
///
/// Neither the preset set nor any working store is touched; the caller
/// decides whether the copy becomes a new record or overwrites a selected one.
pub fn resolve(presets: &PresetSet, name: &str) -> Result<TypeRecord> {
    presets
        .get(name)
        .cloned()
        .ok_or_else(|| TypesError::NotFound(format!("Preset '{}'", name)))
}

/// Categories used by `records` that are not part of `vocabulary`, in
/// first-seen order.
pub fn extra_categories<'a, I>(records: I, vocabulary: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = &'a TypeRecord>,
{
    let mut extras: Vec<String> = Vec::new();
    for category in records.into_iter().filter_map(|r| r.category.as_ref()) {
        if !vocabulary.contains(category) && !extras.contains(category) {
            extras.push(category.clone());
        }
    }
    extras
}

/// Selectable categories: the vocabulary in its own order, then the extras
/// sorted, without repeats.
pub fn merge_category_pool(vocabulary: &[String], extras: &[String]) -> Vec<String> {
    let mut sorted_extras = extras.to_vec();
    sorted_extras.sort();

    let mut pool: Vec<String> = Vec::with_capacity(vocabulary.len() + sorted_extras.len());
    for category in vocabulary.iter().chain(sorted_extras.iter()) {
        if !pool.contains(category) {
            pool.push(category.clone());
        }
    }
    pool
}
