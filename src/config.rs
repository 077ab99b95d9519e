use clap::Parser;
use std::path::{Path, PathBuf};

use crate::category_map::PlaceholderCategory;
use crate::error::{Error, Result};
use crate::merge::RaterPair;

/// Command-line arguments for merging doubly annotated LVIS v0.5 rater files into v1.0.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the v0.5 rater files
    #[arg(long = "original_dir", default_value = "original_double_annos_v0.5")]
    pub original_dir: String,

    /// Directory receiving the merged and subset files
    #[arg(long = "processed_dir", default_value = "processed_double_annos_v1.0")]
    pub processed_dir: String,

    /// First rater file, relative to original_dir
    #[arg(long = "r1_file", default_value = "lvis_v0.5_val_r1.json")]
    pub r1_file: String,

    /// Second rater file, relative to original_dir
    #[arg(long = "r2_file", default_value = "lvis_v0.5_val_r2.json")]
    pub r2_file: String,

    /// v1.0 annotation file providing the authoritative categories and info
    #[arg(long = "target_path", default_value = "original_annos_v1.0/lvis_v1.0_val.json")]
    pub target_path: String,

    /// File name of the merged output inside processed_dir
    #[arg(long = "output_name", default_value = "lvis_v1.0_val_doubly_annos.json")]
    pub output_name: String,

    /// Number of images in the evaluation subset
    #[arg(long = "subset_size", default_value_t = 200, value_parser = validate_subset_size)]
    pub subset_size: usize,

    /// Seed for the subset sampler
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Synset added to the source categories although no source instance exists
    #[arg(long = "placeholder_synset", default_value = "stop_sign.n.01")]
    pub placeholder_synset: String,

    /// Source category id given to the placeholder synset
    #[arg(long = "placeholder_id", default_value_t = 1800)]
    pub placeholder_id: u64,

    /// Labels of the first and second rater
    #[arg(
        long = "rater_ids",
        value_delimiter = ',',
        default_values_t = [String::from("r1"), String::from("r2")]
    )]
    pub rater_ids: Vec<String>,
}

// Validate that the subset holds at least one image
fn validate_subset_size(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(val) if val >= 1 => Ok(val),
        _ => Err("SUBSET_SIZE must be a positive integer".to_string()),
    }
}

/// Everything a pipeline run needs, independent of the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub r1_path: PathBuf,
    pub r2_path: PathBuf,
    pub target_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_name: String,
    pub subset_size: usize,
    pub seed: u64,
    pub placeholder: Option<PlaceholderCategory>,
    pub raters: RaterPair,
}

impl PipelineConfig {
    pub fn merged_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }

    /// `<stem>_subset<N>.json` next to the merged output
    pub fn subset_output_path(&self) -> PathBuf {
        let stem = Path::new(&self.output_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output_name.clone());
        self.output_dir
            .join(format!("{}_subset{}.json", stem, self.subset_size))
    }
}

impl Args {
    pub fn to_pipeline_config(&self) -> Result<PipelineConfig> {
        let rater_ids: Vec<&str> = self.rater_ids.iter().map(|id| id.trim()).collect();
        let raters = match rater_ids.as_slice() {
            [first, second] if !first.is_empty() && !second.is_empty() && first != second => {
                RaterPair::new(*first, *second)
            }
            _ => {
                return Err(Error::configuration(format!(
                    "expected two distinct rater ids, got {:?}",
                    self.rater_ids
                )))
            }
        };
        if self.subset_size == 0 {
            return Err(Error::configuration("subset size must be at least 1"));
        }

        let original_dir = PathBuf::from(&self.original_dir);
        Ok(PipelineConfig {
            r1_path: original_dir.join(&self.r1_file),
            r2_path: original_dir.join(&self.r2_file),
            target_path: PathBuf::from(&self.target_path),
            output_dir: PathBuf::from(&self.processed_dir),
            output_name: self.output_name.clone(),
            subset_size: self.subset_size,
            seed: self.seed,
            placeholder: Some(PlaceholderCategory::new(
                self.placeholder_synset.clone(),
                self.placeholder_id,
            )),
            raters,
        })
    }
}
