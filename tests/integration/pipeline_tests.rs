//! Pipeline integration tests.
//!
//! Tests verify:
//! - Builders run in priority order and only see unconsumed files
//! - Errors from earlier builders survive a later success
//! - Post-processors attach files to every new image
//! - Files a post-processor emits for other images are dropped

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use panimg_models::{
    ImageBuilderOptions, ImageType, Pipeline, PostProcessorOptions,
};

use super::test_utils::{DziStage, ExtensionBuilder, MisbehavingStage, RejectingBuilder};

fn paths(items: &[&str]) -> BTreeSet<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

// =============================================================================
// Builder ordering
// =============================================================================

#[test]
fn test_later_builders_only_see_unconsumed_files() {
    let mhd = ExtensionBuilder::new(ImageBuilderOptions::Mhd, "mha", ImageType::Mhd);
    let tiff = ExtensionBuilder::new(ImageBuilderOptions::Tiff, "tif", ImageType::Tiff);
    let mhd_offered = mhd.offered();
    let tiff_offered = tiff.offered();

    // Registered out of order on purpose
    let pipeline = Pipeline::new().with_builder(tiff).with_builder(mhd);
    let result = pipeline.run(["/in/a.mha", "/in/b.tif", "/in/c.txt"]);

    assert_eq!(
        mhd_offered.lock().unwrap().as_slice(),
        [paths(&["/in/a.mha", "/in/b.tif", "/in/c.txt"])]
    );
    assert_eq!(
        tiff_offered.lock().unwrap().as_slice(),
        [paths(&["/in/b.tif", "/in/c.txt"])]
    );

    assert_eq!(result.new_images.len(), 2);
    assert_eq!(result.consumed_files, paths(&["/in/a.mha", "/in/b.tif"]));
    assert!(result.validate().is_ok());
}

#[test]
fn test_partial_success_keeps_earlier_errors() {
    let pipeline = Pipeline::new()
        .with_builder(RejectingBuilder(ImageBuilderOptions::Nifti))
        .with_builder(ExtensionBuilder::new(
            ImageBuilderOptions::Tiff,
            "tif",
            ImageType::Tiff,
        ));

    let result = pipeline.run(["/in/slide.tif"]);

    // Consumed by the TIFF builder, but the NIfTI failure is still reported
    assert!(result.consumed_files.contains(Path::new("/in/slide.tif")));
    assert_eq!(
        result.errors_for("/in/slide.tif"),
        ["NIFTI: could not read header"]
    );
    assert_eq!(result.new_images.len(), 1);
}

#[test]
fn test_unclaimed_files_collect_errors_from_every_builder() {
    let pipeline = Pipeline::new()
        .with_builder(RejectingBuilder(ImageBuilderOptions::Fallback))
        .with_builder(RejectingBuilder(ImageBuilderOptions::Dicom))
        .with_builder(RejectingBuilder(ImageBuilderOptions::Mhd));

    let result = pipeline.run(["/in/unknown.bin"]);

    assert!(result.new_images.is_empty());
    assert!(result.consumed_files.is_empty());
    assert_eq!(
        result.errors_for("/in/unknown.bin"),
        [
            "MHD: could not read header",
            "DICOM: could not read header",
            "FALLBACK: could not read header"
        ]
    );
}

#[test]
fn test_builders_skipped_once_everything_is_consumed() {
    let mhd = ExtensionBuilder::new(ImageBuilderOptions::Mhd, "mha", ImageType::Mhd);
    let fallback = ExtensionBuilder::new(ImageBuilderOptions::Fallback, "mha", ImageType::Tiff);
    let fallback_calls = fallback.calls();

    let pipeline = Pipeline::new().with_builder(mhd).with_builder(fallback);
    let result = pipeline.run(["/in/a.mha"]);

    assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    assert_eq!(result.new_images.len(), 1);
    assert!(result.file_errors.is_empty());
}

#[test]
fn test_builder_filter() {
    let mhd = ExtensionBuilder::new(ImageBuilderOptions::Mhd, "mha", ImageType::Mhd);
    let mhd_calls = mhd.calls();

    let pipeline = Pipeline::new()
        .with_builder(mhd)
        .with_builder(RejectingBuilder(ImageBuilderOptions::Oct))
        .only_builders(&[ImageBuilderOptions::Oct]);

    let result = pipeline.run(["/in/a.mha"]);

    assert_eq!(mhd_calls.load(Ordering::SeqCst), 0);
    assert_eq!(result.errors_for("/in/a.mha"), ["OCT: could not read header"]);
}

// =============================================================================
// Post-processing
// =============================================================================

#[test]
fn test_dzi_stage_adds_files_to_each_image() {
    let pipeline = Pipeline::new()
        .with_builder(ExtensionBuilder::new(
            ImageBuilderOptions::Tiff,
            "tif",
            ImageType::Tiff,
        ))
        .with_post_processor(DziStage {
            output_dir: PathBuf::from("/out/dzi"),
        });

    let result = pipeline.run(["/in/a.tif", "/in/b.tif"]);

    assert_eq!(result.new_images.len(), 2);
    assert_eq!(result.new_image_files.len(), 4);
    for image in &result.new_images {
        let types: Vec<ImageType> = result
            .files_for_image(image.pk())
            .iter()
            .map(|f| f.image_type())
            .collect();
        assert_eq!(types.len(), 2);
        assert!(types.contains(&ImageType::Dzi));
        assert!(types.contains(&ImageType::Tiff));
    }
    assert!(result.validate().is_ok());
}

#[test]
fn test_post_processor_filter_disables_stage() {
    let pipeline = Pipeline::new()
        .with_builder(ExtensionBuilder::new(
            ImageBuilderOptions::Tiff,
            "tif",
            ImageType::Tiff,
        ))
        .with_post_processor(DziStage {
            output_dir: PathBuf::from("/out/dzi"),
        })
        .only_post_processors(&[]);

    let result = pipeline.run(["/in/a.tif"]);
    assert_eq!(result.new_image_files.len(), 1);
}

#[test]
fn test_post_processor_files_for_other_images_dropped() {
    let pipeline = Pipeline::new()
        .with_builder(ExtensionBuilder::new(
            ImageBuilderOptions::Mhd,
            "mha",
            ImageType::Mhd,
        ))
        .with_post_processor(MisbehavingStage)
        .only_post_processors(&[PostProcessorOptions::Dzi]);

    let result = pipeline.run(["/in/a.mha"]);

    assert_eq!(result.new_image_files.len(), 1);
    assert!(result.validate().is_ok());
}

#[test]
fn test_no_post_processing_without_images() {
    let pipeline = Pipeline::new()
        .with_builder(RejectingBuilder(ImageBuilderOptions::Mhd))
        .with_post_processor(DziStage {
            output_dir: PathBuf::from("/out/dzi"),
        });

    let result = pipeline.run(["/in/a.mha"]);
    assert!(result.new_image_files.is_empty());
    assert_eq!(result.summary().errored_files, 1);
}
