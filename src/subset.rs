//! Random image subsets for quick evaluation runs

use log::{info, warn};
use rand::seq::index;
use rand::Rng;
use std::collections::HashSet;

use crate::lvis::LvisDataset;

/// Draw `target_size` images uniformly without replacement and keep only
/// their annotations.
///
/// A `target_size` larger than the image count is clamped to the image
/// count. Sampled images keep the order in which they were drawn,
/// annotations keep their original relative order. Categories and licenses
/// are copied unchanged, so category statistics still describe the full
/// dataset.
pub fn sample<R: Rng + ?Sized>(
    document: &LvisDataset,
    target_size: usize,
    rng: &mut R,
) -> LvisDataset {
    let total_images = document.images.len();
    let subset_size = if target_size > total_images {
        warn!(
            "Requested subset size {} is larger than the total images. Using subset_size = {}",
            target_size, total_images
        );
        total_images
    } else {
        target_size
    };

    let images: Vec<_> = index::sample(rng, total_images, subset_size)
        .into_iter()
        .map(|i| document.images[i].clone())
        .collect();

    let subset_image_ids: HashSet<u64> = images.iter().map(|image| image.id).collect();

    let annotations: Vec<_> = document
        .annotations
        .iter()
        .filter(|annotation| subset_image_ids.contains(&annotation.image_id))
        .cloned()
        .collect();

    info!(
        "Sampled {} of {} images with {} annotations",
        images.len(),
        total_images,
        annotations.len()
    );

    LvisDataset {
        info: document.info.clone(),
        annotations,
        images,
        categories: document.categories.clone(),
        licenses: document.licenses.clone(),
    }
}
