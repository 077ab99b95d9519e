//! LVIS double-annotation converter
//!
//! This library migrates two single-rater LVIS v0.5 annotation files to the
//! v1.0 schema, merges them into one multi-rater dataset, and draws a
//! reproducible evaluation subset from the result.

pub mod category_map;
pub mod config;
pub mod error;
pub mod io;
pub mod lvis;
pub mod merge;
pub mod migrate;
pub mod pipeline;
pub mod subset;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use category_map::{build_mapping, CategoryMapping, PlaceholderCategory};
pub use config::{Args, PipelineConfig};
pub use error::{Error, Result};
pub use io::{ensure_output_directory, load_json, save_json};
pub use lvis::{
    Annotation, Category, Dataset, Frequency, Image, LegacyDataset, LegacyImage, LvisDataset,
    SchemaReference,
};
pub use merge::{merge, RaterPair};
pub use migrate::migrate;
pub use pipeline::{convert, run, PipelineOutput};
pub use subset::sample;
pub use types::PipelineReport;
