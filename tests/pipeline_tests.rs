use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lvis_consistency::{
    load_json, run, Error, LvisDataset, PipelineConfig, PlaceholderCategory, RaterPair,
};

fn legacy_rater_file(image_ids: [u64; 3], annotations: Value) -> Value {
    json!({
        "info": {"version": "0.5"},
        "licenses": [{"id": 1, "name": "CC BY 4.0", "url": ""}],
        "categories": [
            {"id": 1, "synset": "cat.n.01", "name": "cat", "frequency": "r"},
            {"id": 2, "synset": "dog.n.01", "name": "dog", "frequency": "c"},
            {"id": 3, "synset": "dropped.n.01", "name": "dropped", "frequency": "r"}
        ],
        "images": [
            {"id": image_ids[0], "file_name": "000001.jpg", "height": 480, "width": 640, "not_exhaustive": [1]},
            {"id": image_ids[1], "file_name": "000002.jpg", "height": 480, "width": 640, "not_exhaustive": []},
            {"id": image_ids[2], "file_name": "000003.jpg", "height": 480, "width": 640, "not_exhaustive": [2]}
        ],
        "annotations": annotations
    })
}

fn target_file() -> Value {
    json!({
        "info": {"version": "1.0", "description": "target"},
        "licenses": [],
        "categories": [
            {"id": 10, "synset": "dog.n.01", "name": "dog", "frequency": "f", "def": "a dog"},
            {"id": 20, "synset": "cat.n.01", "name": "cat", "frequency": "f"},
            {"id": 30, "synset": "stop_sign.n.01", "name": "stop_sign", "frequency": "r"}
        ],
        "images": [],
        "annotations": []
    })
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
}

fn write_inputs(dir: &Path) {
    let r1 = legacy_rater_file(
        [1, 2, 3],
        json!([
            {"id": 1, "image_id": 1, "category_id": 1, "bbox": [0, 0, 10, 10], "area": 100},
            {"id": 2, "image_id": 2, "category_id": 2, "bbox": [1, 1, 5, 5], "area": 25},
            {"id": 5, "image_id": 3, "category_id": 3, "bbox": [2, 2, 4, 4], "area": 16},
            {"id": 4, "image_id": 3, "category_id": 1, "bbox": [3, 3, 2, 2], "area": 4}
        ]),
    );
    let r2 = legacy_rater_file(
        [30, 10, 20],
        json!([
            {"id": 1, "image_id": 30, "category_id": 1, "bbox": [0, 0, 9, 9], "area": 81},
            {"id": 2, "image_id": 10, "category_id": 2, "bbox": [1, 1, 6, 6], "area": 36},
            {"id": 3, "image_id": 20, "category_id": 3, "bbox": [2, 2, 3, 3], "area": 9}
        ]),
    );
    write_json(&dir.join("r1.json"), &r1);
    write_json(&dir.join("r2.json"), &r2);
    write_json(&dir.join("target.json"), &target_file());
}

fn config(input_dir: &Path, output_dir: &Path, subset_size: usize) -> PipelineConfig {
    PipelineConfig {
        r1_path: input_dir.join("r1.json"),
        r2_path: input_dir.join("r2.json"),
        target_path: input_dir.join("target.json"),
        output_dir: output_dir.to_path_buf(),
        output_name: "merged.json".to_string(),
        subset_size,
        seed: 42,
        placeholder: Some(PlaceholderCategory::new("stop_sign.n.01", 1800)),
        raters: RaterPair::default(),
    }
}

#[test]
fn test_pipeline_writes_merged_and_subset() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_inputs(temp_dir.path());
    let out_dir = temp_dir.path().join("processed");
    let config = config(temp_dir.path(), &out_dir, 2);

    let report = run(&config).unwrap();

    assert_eq!(report.mapped_categories, 3);
    assert_eq!(report.r1_kept_annotations, 3);
    assert_eq!(report.r1_dropped_annotations, 1);
    assert_eq!(report.r2_kept_annotations, 2);
    assert_eq!(report.r2_dropped_annotations, 1);
    assert_eq!(report.merged_images, 3);
    assert_eq!(report.merged_annotations, 5);
    assert_eq!(report.subset_images, 2);
    assert!(!report.subset_clamped);

    let merged: LvisDataset = load_json(&out_dir.join("merged.json")).unwrap();
    assert_eq!(merged.info["description"], "target");

    let ids: Vec<u64> = merged.annotations.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5, 6]);
    let image_ids: Vec<u64> = merged.annotations.iter().map(|a| a.image_id).collect();
    // r2 images 30 and 10 are files 000001 and 000002, i.e. r1 images 1 and 2
    assert_eq!(image_ids, vec![1, 2, 3, 1, 2]);
    let raters: Vec<&str> = merged
        .annotations
        .iter()
        .map(|a| a.rater_id.as_deref().unwrap())
        .collect();
    assert_eq!(raters, vec!["r1", "r1", "r1", "r2", "r2"]);
    assert_eq!(merged.annotations[0].extra["bbox"], json!([0, 0, 10, 10]));

    let cat = merged.categories.iter().find(|c| c.id == 20).unwrap();
    assert_eq!(cat.instance_count, Some(2));
    assert_eq!(cat.image_count, Some(2));
    let stop_sign = merged.categories.iter().find(|c| c.id == 30).unwrap();
    assert_eq!(stop_sign.instance_count, Some(0));
    assert_eq!(merged.categories[0].extra["def"], "a dog");

    assert_eq!(merged.images[0].not_exhaustive_category_ids, vec![1]);
    assert_eq!(merged.images[0].extra["width"], json!(640));
    assert!(merged
        .images
        .iter()
        .all(|i| i.rater_list == Some(vec!["r1".to_string(), "r2".to_string()])));

    let raw: Value =
        serde_json::from_slice(&fs::read(out_dir.join("merged.json")).unwrap()).unwrap();
    assert!(raw["images"][0].get("not_exhaustive").is_none());
    assert_eq!(raw["categories"][1]["frequency"], "r");

    let subset: LvisDataset = load_json(&out_dir.join("merged_subset2.json")).unwrap();
    assert_eq!(subset.images.len(), 2);
    let subset_ids: HashSet<u64> = subset.images.iter().map(|i| i.id).collect();
    assert_eq!(subset_ids.len(), 2);
    assert!(subset
        .annotations
        .iter()
        .all(|a| subset_ids.contains(&a.image_id)));
    assert_eq!(subset.categories, merged.categories);
}

#[test]
fn test_pipeline_is_byte_identical_across_runs() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_inputs(temp_dir.path());
    let first_out = temp_dir.path().join("first");
    let second_out = temp_dir.path().join("second");

    run(&config(temp_dir.path(), &first_out, 2)).unwrap();
    run(&config(temp_dir.path(), &second_out, 2)).unwrap();

    for name in ["merged.json", "merged_subset2.json"] {
        let a = fs::read(first_out.join(name)).unwrap();
        let b = fs::read(second_out.join(name)).unwrap();
        assert_eq!(a, b, "{} differs between runs", name);
    }
}

#[test]
fn test_pipeline_clamps_subset() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_inputs(temp_dir.path());
    let out_dir = temp_dir.path().join("processed");

    let report = run(&config(temp_dir.path(), &out_dir, 200)).unwrap();

    assert!(report.subset_clamped);
    assert_eq!(report.subset_images, 3);
    assert_eq!(report.subset_annotations, 5);
    assert!(out_dir.join("merged_subset200.json").exists());
}

#[test]
fn test_pipeline_schema_error_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_inputs(temp_dir.path());
    let mut r2: Value =
        serde_json::from_slice(&fs::read(temp_dir.path().join("r2.json")).unwrap()).unwrap();
    r2["images"][1]
        .as_object_mut()
        .unwrap()
        .remove("not_exhaustive");
    write_json(&temp_dir.path().join("r2.json"), &r2);
    let out_dir = temp_dir.path().join("processed");

    let result = run(&config(temp_dir.path(), &out_dir, 2));

    assert!(matches!(result, Err(Error::Schema { .. })));
    assert!(!out_dir.join("merged.json").exists());
    assert!(!out_dir.join("merged_subset2.json").exists());
}

#[test]
fn test_pipeline_missing_input_reports_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out_dir = temp_dir.path().join("processed");

    let result = run(&config(temp_dir.path(), &out_dir, 2));

    match result {
        Err(Error::Io { path, .. }) => assert!(path.ends_with("r1.json")),
        other => panic!("expected an IO error, got {:?}", other),
    }
}
