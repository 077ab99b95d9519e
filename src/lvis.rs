//! LVIS format data structures
//!
//! The same document layout is used by both schema versions. Only the image
//! records differ: v0.5 rater files carry `not_exhaustive`, v1.0 files carry
//! `not_exhaustive_category_ids` and, after merging, a `rater_list`. Every
//! field the pipeline does not touch is kept in `extra` and written back out
//! unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Categories with at most this many instances are rare.
pub const RARE_MAX_INSTANCES: u64 = 10;

/// Categories with at least this many instances are frequent.
pub const FREQUENT_MIN_INSTANCES: u64 = 100;

/// Coarse category bucket derived from the instance count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "r", alias = "rare")]
    Rare,
    #[serde(rename = "c", alias = "common")]
    Common,
    #[serde(rename = "f", alias = "frequent")]
    Frequent,
}

impl Frequency {
    pub fn from_instance_count(instance_count: u64) -> Self {
        if instance_count <= RARE_MAX_INSTANCES {
            Frequency::Rare
        } else if instance_count < FREQUENT_MIN_INSTANCES {
            Frequency::Common
        } else {
            Frequency::Frequent
        }
    }
}

/// LVIS category information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub synset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(id: u64, synset: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            synset: synset.into(),
            name: Some(name.into()),
            instance_count: None,
            image_count: None,
            frequency: None,
            extra: Map::new(),
        }
    }
}

/// Image record of a v0.5 rater file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyImage {
    pub id: u64,
    pub file_name: String,
    // Optional here so a wrong schema version surfaces as a schema error
    // instead of a JSON parse failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_exhaustive: Option<Vec<u64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LegacyImage {
    pub fn new(id: u64, file_name: impl Into<String>, not_exhaustive: Vec<u64>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            not_exhaustive: Some(not_exhaustive),
            extra: Map::new(),
        }
    }
}

/// Image record of a v1.0 file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub file_name: String,
    pub not_exhaustive_category_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rater_list: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// LVIS annotation information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rater_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Annotation {
    pub fn new(id: u64, image_id: u64, category_id: u64) -> Self {
        Self {
            id,
            image_id,
            category_id,
            rater_id: None,
            extra: Map::new(),
        }
    }
}

/// Complete LVIS document, generic over the image schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset<I> {
    #[serde(default)]
    pub info: Value,
    pub annotations: Vec<Annotation>,
    pub images: Vec<I>,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub licenses: Value,
}

/// A single-rater document in the v0.5 schema
pub type LegacyDataset = Dataset<LegacyImage>;

/// A document in the v1.0 schema
pub type LvisDataset = Dataset<Image>;

/// The parts of a v1.0 document used as the authoritative category list.
///
/// Images and annotations of the reference file are never read into memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaReference {
    #[serde(default)]
    pub info: Value,
    pub categories: Vec<Category>,
}
