//! Merging of two migrated rater documents over the same image set

use log::info;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::lvis::{Image, LvisDataset};

/// Labels of the two raters, in merge order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaterPair {
    pub first: String,
    pub second: String,
}

impl RaterPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn to_list(&self) -> Vec<String> {
        vec![self.first.clone(), self.second.clone()]
    }
}

impl Default for RaterPair {
    fn default() -> Self {
        Self::new("r1", "r2")
    }
}

/// Map `file_name` to image id, rejecting duplicate file names
fn file_name_index<'a>(images: &'a [Image], rater: &str) -> Result<HashMap<&'a str, u64>> {
    let mut index = HashMap::with_capacity(images.len());
    for image in images {
        if let Some(previous) = index.insert(image.file_name.as_str(), image.id) {
            return Err(Error::lookup(format!(
                "rater '{}' lists file '{}' twice (image ids {} and {})",
                rater, image.file_name, previous, image.id
            )));
        }
    }
    Ok(index)
}

/// Merge two migrated rater documents into one multi-rater document.
///
/// Images and their ids come from `first`; every image is tagged with both
/// raters. Annotations of `second` are re-pointed at `first`'s image ids and
/// renumbered to continue after the largest annotation id of `first`.
pub fn merge(
    info: Value,
    first: LvisDataset,
    second: LvisDataset,
    raters: &RaterPair,
) -> Result<LvisDataset> {
    let LvisDataset {
        annotations: mut merged_annotations,
        mut images,
        categories,
        licenses,
        ..
    } = first;

    let rater_list = raters.to_list();
    for image in &mut images {
        image.extra.remove("rater_list");
        image.rater_list = Some(rater_list.clone());
    }
    let first_index = file_name_index(&images, &raters.first)?;

    file_name_index(&second.images, &raters.second)?;

    // Second-rater image id to first-rater image id, joined on file name
    let mut second_to_first: HashMap<u64, u64> = HashMap::with_capacity(second.images.len());
    for image in &second.images {
        let first_id = first_index
            .get(image.file_name.as_str())
            .copied()
            .ok_or_else(|| {
                Error::lookup(format!(
                    "file '{}' of rater '{}' has no matching image in rater '{}'",
                    image.file_name, raters.second, raters.first
                ))
            })?;
        second_to_first.insert(image.id, first_id);
    }

    let first_max_id = merged_annotations
        .iter()
        .map(|annotation| annotation.id)
        .max()
        .ok_or_else(|| {
            Error::empty_input(format!(
                "rater '{}' has no annotations to continue annotation ids from",
                raters.first
            ))
        })?;

    let first_count = merged_annotations.len();
    merged_annotations.reserve(second.annotations.len());
    for (offset, mut annotation) in (1u64..).zip(second.annotations) {
        annotation.image_id = second_to_first
            .get(&annotation.image_id)
            .copied()
            .ok_or_else(|| {
                Error::lookup(format!(
                    "annotation {} of rater '{}' refers to unknown image {}",
                    annotation.id, raters.second, annotation.image_id
                ))
            })?;
        annotation.id = first_max_id.checked_add(offset).ok_or_else(|| {
            Error::IdOverflow(format!(
                "annotation ids of rater '{}' cannot continue after {}",
                raters.second, first_max_id
            ))
        })?;
        merged_annotations.push(annotation);
    }

    info!(
        "Merged {} images: {} annotations from '{}' and {} from '{}'",
        images.len(),
        first_count,
        raters.first,
        merged_annotations.len() - first_count,
        raters.second
    );

    Ok(LvisDataset {
        info,
        annotations: merged_annotations,
        images,
        categories,
        licenses,
    })
}
