use std::path::PathBuf;

/// Counts collected over one pipeline run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub mapped_categories: usize,
    pub r1_kept_annotations: usize,
    pub r1_dropped_annotations: usize,
    pub r2_kept_annotations: usize,
    pub r2_dropped_annotations: usize,
    pub merged_images: usize,
    pub merged_annotations: usize,
    pub subset_images: usize,
    pub subset_annotations: usize,
    pub subset_clamped: bool,
    pub merged_path: Option<PathBuf>,
    pub subset_path: Option<PathBuf>,
}

impl PipelineReport {
    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Mapped categories: {}", self.mapped_categories);
        log::info!(
            "Rater 1 annotations kept: {} (dropped: {})",
            self.r1_kept_annotations,
            self.r1_dropped_annotations
        );
        log::info!(
            "Rater 2 annotations kept: {} (dropped: {})",
            self.r2_kept_annotations,
            self.r2_dropped_annotations
        );
        log::info!(
            "Merged dataset: {} images, {} annotations",
            self.merged_images,
            self.merged_annotations
        );
        log::info!(
            "Subset: {} images, {} annotations",
            self.subset_images,
            self.subset_annotations
        );
        if self.subset_clamped {
            log::warn!(
                "Subset was clamped to the {} available images",
                self.subset_images
            );
        }
        if let Some(path) = &self.merged_path {
            log::info!("Merged output: {}", path.display());
        }
        if let Some(path) = &self.subset_path {
            log::info!("Subset output: {}", path.display());
        }
    }
}
