//! Aggregation tests across several independently produced results.
//!
//! Tests verify:
//! - Merging many results is associative
//! - Any merge order yields the same sets and the same error multisets
//! - Builder and post-processor outputs combine into a consistent result

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use panimg_models::{
    DziLayout, ImageType, IntegrityIssue, PanImgFile, PanImgResult, PostProcessorResult,
};

use super::test_utils::gray_image;

fn builder_result(name: &str, consumed: &str, errors: &[(&str, &str)]) -> PanImgResult {
    let image = gray_image(name);
    let mut result = PanImgResult::new();
    result.add_image_file(PanImgFile::new(
        image.pk(),
        ImageType::Mhd,
        format!("/out/{}.mha", image.pk()),
    ));
    result.add_image(image);
    result.consume(consumed);
    for (path, message) in errors {
        result.add_error(*path, *message);
    }
    result
}

fn normalized_errors(result: &PanImgResult) -> BTreeMap<PathBuf, Vec<String>> {
    result
        .file_errors
        .iter()
        .map(|(path, messages)| {
            let mut messages = messages.clone();
            messages.sort();
            (path.clone(), messages)
        })
        .collect()
}

fn samples() -> Vec<PanImgResult> {
    vec![
        builder_result("a", "/in/a.mhd", &[("/in/x", "mhd: bad header")]),
        builder_result("b", "/in/b.nii", &[("/in/x", "nifti: bad magic"), ("/in/y", "nifti: empty")]),
        builder_result("c", "/in/c.nrrd", &[]),
        builder_result("d", "/in/d.dcm", &[("/in/x", "dicom: no pixel data")]),
    ]
}

#[test]
fn test_merge_associative_over_many_results() {
    let [a, b, c, d]: [PanImgResult; 4] = samples().try_into().unwrap();

    let left_fold = a.clone().merged(b.clone()).merged(c.clone()).merged(d.clone());
    let right_fold = a.clone().merged(b.clone().merged(c.clone().merged(d.clone())));
    let paired = a.merged(b).merged(c.merged(d));

    assert_eq!(left_fold, right_fold);
    assert_eq!(left_fold, paired);
    assert_eq!(
        left_fold.errors_for("/in/x"),
        ["mhd: bad header", "nifti: bad magic", "dicom: no pixel data"]
    );
}

#[test]
fn test_merge_order_independent() {
    let results = samples();
    let forward: PanImgResult = results.clone().into_iter().collect();
    let reversed: PanImgResult = results.clone().into_iter().rev().collect();
    let rotated: PanImgResult = results
        .iter()
        .cycle()
        .skip(2)
        .take(results.len())
        .cloned()
        .collect();

    for other in [&reversed, &rotated] {
        assert_eq!(forward.new_images, other.new_images);
        assert_eq!(forward.new_image_files, other.new_image_files);
        assert_eq!(forward.consumed_files, other.consumed_files);
        assert_eq!(normalized_errors(&forward), normalized_errors(other));
    }

    assert_eq!(forward.summary().new_images, 4);
    assert_eq!(forward.summary().consumed_files, 4);
    assert_eq!(forward.summary().errored_files, 2);
    assert_eq!(forward.summary().error_messages, 4);
}

#[test]
fn test_identical_images_deduplicate_on_merge() {
    let first = builder_result("a", "/in/a.mhd", &[]);
    let merged = first.clone().merged(first.clone());

    assert_eq!(merged.new_images, first.new_images);
    assert_eq!(merged.new_image_files, first.new_image_files);
    assert_eq!(merged.consumed_files, first.consumed_files);
}

#[test]
fn test_post_processor_results_merge_into_builder_result() {
    let mut result = builder_result("a", "/in/a.mhd", &[]);
    let pk = result.new_images.iter().next().unwrap().pk();

    let dzi: PostProcessorResult = vec![
        {
            let mut r = PostProcessorResult::new();
            r.add_image_file(DziLayout::for_image("/out", pk).image_file(pk));
            r
        },
        PostProcessorResult::new(),
    ]
    .into_iter()
    .collect();
    result.extend_post_processed(dzi);

    let types: HashSet<ImageType> = result
        .files_for_image(pk)
        .iter()
        .map(|f| f.image_type())
        .collect();
    assert_eq!(types, HashSet::from([ImageType::Mhd, ImageType::Dzi]));
    assert!(result.validate().is_ok());
}

#[test]
fn test_merge_can_surface_dangling_files() {
    // A file without its image, e.g. from a post-processor run on another batch
    let orphan = gray_image("orphan");
    let mut stray = PanImgResult::new();
    stray.add_image_file(PanImgFile::new(orphan.pk(), ImageType::Tiff, "/out/orphan.tif"));

    let merged = builder_result("a", "/in/a.mhd", &[]).merged(stray);
    let err = merged.validate().unwrap_err();

    assert_eq!(
        err.issues,
        vec![IntegrityIssue::DanglingImageFile {
            image_id: orphan.pk(),
            file: PathBuf::from("/out/orphan.tif"),
        }]
    );
}
