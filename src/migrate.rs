//! Migration of a single-rater v0.5 document to the v1.0 schema

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use crate::category_map::CategoryMapping;
use crate::error::{Error, Result};
use crate::lvis::{Annotation, Category, Frequency, Image, LegacyDataset, LegacyImage, LvisDataset};

/// Per-category counts over the surviving annotations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub instance_count: u64,
    pub image_count: u64,
}

impl CategoryStats {
    pub fn frequency(&self) -> Frequency {
        Frequency::from_instance_count(self.instance_count)
    }
}

/// Count instances and distinct images per category id
pub fn compute_category_stats(annotations: &[Annotation]) -> HashMap<u64, CategoryStats> {
    let mut images_per_category: HashMap<u64, (u64, HashSet<u64>)> = HashMap::new();
    for annotation in annotations {
        let (instances, images) = images_per_category
            .entry(annotation.category_id)
            .or_default();
        *instances += 1;
        images.insert(annotation.image_id);
    }

    images_per_category
        .into_iter()
        .map(|(category_id, (instance_count, images))| {
            (
                category_id,
                CategoryStats {
                    instance_count,
                    image_count: images.len() as u64,
                },
            )
        })
        .collect()
}

/// Copy the target categories and stamp each one with its counts and bucket
pub fn annotate_categories(
    target_categories: &[Category],
    stats: &HashMap<u64, CategoryStats>,
) -> Vec<Category> {
    target_categories
        .iter()
        .cloned()
        .map(|mut category| {
            let current = stats.get(&category.id).copied().unwrap_or_default();
            for key in ["instance_count", "image_count", "frequency"] {
                category.extra.remove(key);
            }
            category.instance_count = Some(current.instance_count);
            category.image_count = Some(current.image_count);
            category.frequency = Some(current.frequency());
            category
        })
        .collect()
}

fn rename_not_exhaustive(image: LegacyImage, rater_id: &str) -> Result<Image> {
    let LegacyImage {
        id,
        file_name,
        not_exhaustive,
        mut extra,
    } = image;
    let not_exhaustive_category_ids = not_exhaustive.ok_or_else(|| {
        Error::schema(
            format!("rater '{}' document", rater_id),
            format!(
                "image {} ({}) has no 'not_exhaustive' field; expected a v0.5 rater file",
                id, file_name
            ),
        )
    })?;

    // The renamed field replaces any stale copy; a well-formed rater list
    // moves into its named field.
    extra.remove("not_exhaustive_category_ids");
    let rater_list = match extra.remove("rater_list") {
        Some(value) => match serde_json::from_value::<Vec<String>>(value.clone()) {
            Ok(list) => Some(list),
            Err(_) => {
                extra.insert("rater_list".to_string(), value);
                None
            }
        },
        None => None,
    };

    Ok(Image {
        id,
        file_name,
        not_exhaustive_category_ids,
        rater_list,
        extra,
    })
}

/// Rewrite a v0.5 rater document into the v1.0 schema.
///
/// Annotations whose category has no mapping are dropped; the rest are
/// relabelled and tagged with `rater_id` in their original order. The
/// category list is replaced by a copy of `target_categories` carrying
/// statistics over the surviving annotations.
pub fn migrate(
    document: LegacyDataset,
    mapping: &CategoryMapping,
    target_categories: &[Category],
    rater_id: &str,
) -> Result<LvisDataset> {
    let LegacyDataset {
        info,
        annotations,
        images,
        categories: _,
        licenses,
    } = document;

    let images = images
        .into_iter()
        .map(|image| rename_not_exhaustive(image, rater_id))
        .collect::<Result<Vec<_>>>()?;

    let total = annotations.len();
    let annotations: Vec<Annotation> = annotations
        .into_iter()
        .filter_map(|mut annotation| {
            let new_id = mapping.get(annotation.category_id)?;
            annotation.category_id = new_id;
            annotation.rater_id = Some(rater_id.to_string());
            annotation.extra.remove("rater_id");
            Some(annotation)
        })
        .collect();

    let dropped = total - annotations.len();
    if dropped > 0 {
        warn!(
            "Rater '{}': dropped {} of {} annotations with categories absent from the target schema",
            rater_id, dropped, total
        );
    }

    let stats = compute_category_stats(&annotations);
    debug!(
        "Rater '{}': {} categories have at least one instance",
        rater_id,
        stats.len()
    );
    let categories = annotate_categories(target_categories, &stats);

    info!(
        "Migrated rater '{}': {} images, {} annotations, {} categories",
        rater_id,
        images.len(),
        annotations.len(),
        categories.len()
    );

    Ok(LvisDataset {
        info,
        annotations,
        images,
        categories,
        licenses,
    })
}
