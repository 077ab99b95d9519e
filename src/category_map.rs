//! Category id remapping between schema versions
//!
//! Numeric category ids differ between v0.5 and v1.0, so categories are
//! joined on their synset.

use log::debug;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::lvis::Category;

/// A category that must be present on the source side even though the
/// source files contain no instance of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderCategory {
    pub synset: String,
    pub id: u64,
}

impl PlaceholderCategory {
    pub fn new(synset: impl Into<String>, id: u64) -> Self {
        Self {
            synset: synset.into(),
            id,
        }
    }
}

/// Old (source schema) category id to new (target schema) category id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMapping {
    old_to_new: HashMap<u64, u64>,
}

impl CategoryMapping {
    pub fn get(&self, old_id: u64) -> Option<u64> {
        self.old_to_new.get(&old_id).copied()
    }

    pub fn contains(&self, old_id: u64) -> bool {
        self.old_to_new.contains_key(&old_id)
    }

    pub fn len(&self) -> usize {
        self.old_to_new.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old_to_new.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.old_to_new.iter().map(|(&old, &new)| (old, new))
    }
}

/// Index a category list by synset, rejecting duplicate synsets or ids
fn synset_index<'a>(categories: &'a [Category], side: &str) -> Result<HashMap<&'a str, u64>> {
    let mut by_synset = HashMap::with_capacity(categories.len());
    let mut seen_ids = HashMap::with_capacity(categories.len());
    for category in categories {
        if let Some(previous) = seen_ids.insert(category.id, category.synset.as_str()) {
            return Err(Error::configuration(format!(
                "{} categories reuse id {} for synsets '{}' and '{}'",
                side, category.id, previous, category.synset
            )));
        }
        if by_synset
            .insert(category.synset.as_str(), category.id)
            .is_some()
        {
            return Err(Error::configuration(format!(
                "{} categories contain synset '{}' more than once",
                side, category.synset
            )));
        }
    }
    Ok(by_synset)
}

/// Build the old-id to new-id mapping for every synset present on both sides.
///
/// Synsets found on only one side are left out, so annotations of categories
/// missing from the target schema never receive a mapped id.
pub fn build_mapping(
    source: &[Category],
    target: &[Category],
    placeholder: Option<&PlaceholderCategory>,
) -> Result<CategoryMapping> {
    let mut source_index = synset_index(source, "source")?;
    let target_index = synset_index(target, "target")?;

    if let Some(placeholder) = placeholder {
        if let Some(owner) = source
            .iter()
            .find(|c| c.id == placeholder.id && c.synset != placeholder.synset)
        {
            return Err(Error::configuration(format!(
                "placeholder id {} for '{}' is already used by source synset '{}'",
                placeholder.id, placeholder.synset, owner.synset
            )));
        }
        match source_index.get(placeholder.synset.as_str()) {
            Some(&existing) if existing != placeholder.id => {
                return Err(Error::configuration(format!(
                    "placeholder synset '{}' already exists in the source categories with id {}",
                    placeholder.synset, existing
                )));
            }
            Some(_) => {}
            None => {
                source_index.insert(placeholder.synset.as_str(), placeholder.id);
            }
        }
    }

    let old_to_new: HashMap<u64, u64> = target_index
        .iter()
        .filter_map(|(synset, &new_id)| source_index.get(synset).map(|&old_id| (old_id, new_id)))
        .collect();

    debug!(
        "Mapped {} categories ({} source, {} target)",
        old_to_new.len(),
        source_index.len(),
        target_index.len()
    );

    Ok(CategoryMapping { old_to_new })
}
