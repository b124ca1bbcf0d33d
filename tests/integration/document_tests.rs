//! Result document tests.
//!
//! Tests verify:
//! - Documents in the persisted shape deserialize with validation
//! - Invalid image records are rejected with a descriptive message
//! - Merged documents written to disk read back unchanged

use std::fs;
use std::path::Path;

use uuid::Uuid;

use panimg_models::document::{read_and_merge, read_result, write_result};
use panimg_models::{CliError, ColorSpace, EyeChoice, ImageType, PanImgResult};

const IMAGE_PK: &str = "6f1f3b9e-2f4a-4c55-9a8b-0d2c8f1e7a10";

fn document(width: i64, segments: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "new_images": [{
            "pk": IMAGE_PK,
            "name": "knee.nii.gz",
            "width": width,
            "height": 320,
            "depth": 40,
            "voxel_width_mm": 0.5,
            "voxel_height_mm": 0.5,
            "voxel_depth_mm": 3.0,
            "timepoints": null,
            "resolution_levels": null,
            "window_center": 300.0,
            "window_width": 1200.0,
            "color_space": "GRAY",
            "eye_choice": "NA",
            "segments": segments
        }],
        "new_image_files": [{
            "image_id": IMAGE_PK,
            "image_type": "MHD",
            "file": "/out/knee.mha",
            "directory": null
        }],
        "consumed_files": ["/in/knee.nii.gz"],
        "file_errors": {
            "/in/readme.txt": ["Could not read as NIfTI", "Could not read as DICOM"]
        }
    })
}

#[test]
fn test_persisted_shape_deserializes() {
    let result: PanImgResult = serde_json::from_value(document(320, serde_json::Value::Null)).unwrap();
    let pk: Uuid = IMAGE_PK.parse().unwrap();

    let image = result.image(pk).unwrap();
    assert_eq!(image.name(), "knee.nii.gz");
    assert_eq!(image.depth(), Some(40));
    assert_eq!(image.voxel_depth_mm(), Some(3.0));
    assert_eq!(image.timepoints(), None);
    assert_eq!(image.color_space(), ColorSpace::Gray);
    assert_eq!(image.eye_choice(), EyeChoice::NotApplicable);
    assert_eq!(image.segments(), None);

    let files = result.files_for_image(pk);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].image_type(), ImageType::Mhd);
    assert_eq!(files[0].directory(), None);

    assert_eq!(
        result.errors_for("/in/readme.txt"),
        ["Could not read as NIfTI", "Could not read as DICOM"]
    );
    assert!(result.validate().is_ok());
}

#[test]
fn test_segments_deserialize_as_set() {
    let result: PanImgResult =
        serde_json::from_value(document(320, serde_json::json!([3, 1, 2, 1]))).unwrap();
    let image = result.new_images.iter().next().unwrap();

    let labels: Vec<i64> = image.segments().unwrap().iter().copied().collect();
    assert_eq!(labels, [1, 2, 3]);
}

#[test]
fn test_invalid_records_rejected() {
    let negative = serde_json::from_value::<PanImgResult>(document(-5, serde_json::Value::Null));
    assert!(negative.unwrap_err().to_string().contains("width"));

    let labels: Vec<i64> = (0..65).collect();
    let oversized = serde_json::from_value::<PanImgResult>(document(320, serde_json::json!(labels)));
    assert!(oversized.unwrap_err().to_string().contains("Too many segments"));
}

#[test]
fn test_read_merge_write_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mhd.json");
    let other = dir.path().join("fallback.json");
    let output = dir.path().join("merged.json");

    fs::write(&input, document(320, serde_json::Value::Null).to_string()).unwrap();
    fs::write(
        &other,
        r#"{"new_images": [], "new_image_files": [], "consumed_files": [],
            "file_errors": {"/in/readme.txt": ["Fallback: unsupported"]}}"#,
    )
    .unwrap();

    let merged = read_and_merge(&[&input, &other]).unwrap();
    assert_eq!(
        merged.errors_for("/in/readme.txt"),
        [
            "Could not read as NIfTI",
            "Could not read as DICOM",
            "Fallback: unsupported"
        ]
    );

    write_result(&output, &merged, true).unwrap();
    assert_eq!(read_result(&output).unwrap(), merged);
}

#[test]
fn test_unknown_enum_value_in_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    let mut doc = document(320, serde_json::Value::Null);
    doc["new_image_files"][0]["image_type"] = serde_json::json!("PNG");
    fs::write(&path, doc.to_string()).unwrap();

    let err = read_result(Path::new(&path)).unwrap_err();
    assert!(matches!(err, CliError::Json { .. }));
}
