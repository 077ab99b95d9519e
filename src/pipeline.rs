//! End-to-end conversion pipeline
//!
//! Rater files are migrated independently, merged, and then sampled. Both
//! outputs are computed in memory before anything is written.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::category_map::build_mapping;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::io::{ensure_output_directory, load_json, save_json};
use crate::lvis::{LegacyDataset, LvisDataset, SchemaReference};
use crate::merge::merge;
use crate::migrate::migrate;
use crate::subset::sample;
use crate::types::PipelineReport;
use crate::utils::create_progress_bar;

/// In-memory result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub merged: LvisDataset,
    pub subset: LvisDataset,
    pub report: PipelineReport,
}

/// Run every stage on already loaded documents
pub fn convert(
    r1: LegacyDataset,
    r2: LegacyDataset,
    reference: SchemaReference,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    let mapping = build_mapping(
        &r1.categories,
        &reference.categories,
        config.placeholder.as_ref(),
    )?;
    info!("Built category mapping with {} entries", mapping.len());

    let r1_total = r1.annotations.len();
    let r2_total = r2.annotations.len();
    let r1 = migrate(r1, &mapping, &reference.categories, &config.raters.first)?;
    let r2 = migrate(r2, &mapping, &reference.categories, &config.raters.second)?;

    let mut report = PipelineReport {
        mapped_categories: mapping.len(),
        r1_kept_annotations: r1.annotations.len(),
        r1_dropped_annotations: r1_total - r1.annotations.len(),
        r2_kept_annotations: r2.annotations.len(),
        r2_dropped_annotations: r2_total - r2.annotations.len(),
        ..Default::default()
    };

    let merged = merge(reference.info, r1, r2, &config.raters)?;
    report.merged_images = merged.images.len();
    report.merged_annotations = merged.annotations.len();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let subset = sample(&merged, config.subset_size, &mut rng);
    report.subset_images = subset.images.len();
    report.subset_annotations = subset.annotations.len();
    report.subset_clamped = subset.images.len() < config.subset_size;

    Ok(PipelineOutput {
        merged,
        subset,
        report,
    })
}

/// Load the inputs named by `config`, convert them, and write both outputs
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    let pb = create_progress_bar(3, "Pipeline");

    pb.set_message("loading");
    let r1: LegacyDataset = load_json(&config.r1_path)?;
    let r2: LegacyDataset = load_json(&config.r2_path)?;
    let reference: SchemaReference = load_json(&config.target_path)?;
    pb.inc(1);

    pb.set_message("converting");
    let PipelineOutput {
        merged,
        subset,
        mut report,
    } = convert(r1, r2, reference, config)?;
    pb.inc(1);

    pb.set_message("writing");
    ensure_output_directory(&config.output_dir)?;
    let merged_path = config.merged_output_path();
    let subset_path = config.subset_output_path();
    save_json(&merged, &merged_path)?;
    save_json(&subset, &subset_path)?;
    pb.inc(1);
    pb.finish_with_message("done");

    info!(
        "Subset dataset with {} images saved to {}",
        report.subset_images,
        subset_path.display()
    );
    report.merged_path = Some(merged_path);
    report.subset_path = Some(subset_path);
    Ok(report)
}
