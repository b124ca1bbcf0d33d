//! Orchestration of builders and post-processors over a batch of inputs.
//!
//! # Flow
//!
//! ```text
//!  candidate files
//!        │
//!        ▼
//! ┌──────────────┐  unconsumed   ┌──────────────┐        ┌──────────────┐
//! │ MHD builder  │ ────────────▶ │ ...builders  │ ─────▶ │   FALLBACK   │
//! └──────┬───────┘               └──────┬───────┘        └──────┬───────┘
//!        └──────────────── merge ───────┴───────────────────────┘
//!                                 │
//!                                 ▼
//!                  post-processors, once per new image
//!                                 │
//!                                 ▼
//!                            PanImgResult
//! ```
//!
//! Builders run in [`ImageBuilderOptions`] order. Each one only sees the files
//! that no earlier builder consumed. Decoding, tiling and file discovery are
//! the business of the builder and post-processor implementations.

pub mod dzi;

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::model::{ImageBuilderOptions, PanImg, PanImgFile, PostProcessorOptions};
use crate::result::{PanImgResult, PostProcessorResult};

pub use dzi::{DziLayout, DEFAULT_TILE_FORMAT, DEFAULT_TILE_OVERLAP, DEFAULT_TILE_SIZE};

// =============================================================================
// Seams
// =============================================================================

/// Decodes one input format into images.
///
/// A builder must only report a path as consumed if it contributed to one of
/// the images in the same result, and should record a message in
/// `file_errors` for every file it attempted and rejected.
pub trait ImageBuilder: Send + Sync {
    /// Which builder this is; determines when it runs.
    fn kind(&self) -> ImageBuilderOptions;

    fn build(&self, files: &BTreeSet<PathBuf>) -> PanImgResult;
}

/// Derives additional files from an image that has already been built.
///
/// Every returned file must reference `image` and carry the right
/// [`ImageType`](crate::ImageType), with a directory when side-car files
/// were written.
pub trait PostProcessor: Send + Sync {
    fn kind(&self) -> PostProcessorOptions;

    fn process(&self, image: &PanImg, files: &[&PanImgFile]) -> PostProcessorResult;
}

// =============================================================================
// Pipeline
// =============================================================================

/// Runs registered builders and post-processors and merges their results.
#[derive(Default)]
pub struct Pipeline {
    builders: Vec<Box<dyn ImageBuilder>>,
    post_processors: Vec<Box<dyn PostProcessor>>,
    builder_filter: Option<HashSet<ImageBuilderOptions>>,
    post_processor_filter: Option<HashSet<PostProcessorOptions>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(mut self, builder: impl ImageBuilder + 'static) -> Self {
        self.builders.push(Box::new(builder));
        self
    }

    pub fn with_post_processor(mut self, processor: impl PostProcessor + 'static) -> Self {
        self.post_processors.push(Box::new(processor));
        self
    }

    /// Restrict the run to the given builders.
    pub fn only_builders(mut self, options: &[ImageBuilderOptions]) -> Self {
        self.builder_filter = Some(options.iter().copied().collect());
        self
    }

    /// Restrict the run to the given post-processors.
    pub fn only_post_processors(mut self, options: &[PostProcessorOptions]) -> Self {
        self.post_processor_filter = Some(options.iter().copied().collect());
        self
    }

    /// Kinds of the builders that will run, in order.
    pub fn builder_order(&self) -> Vec<ImageBuilderOptions> {
        self.active_builders().iter().map(|b| b.kind()).collect()
    }

    fn active_builders(&self) -> Vec<&dyn ImageBuilder> {
        let mut builders: Vec<&dyn ImageBuilder> = self
            .builders
            .iter()
            .map(|b| b.as_ref())
            .filter(|b| {
                self.builder_filter
                    .as_ref()
                    .map_or(true, |allowed| allowed.contains(&b.kind()))
            })
            .collect();
        // Stable, so builders of the same kind keep registration order
        builders.sort_by_key(|b| b.kind());
        builders
    }

    fn active_post_processors(&self) -> impl Iterator<Item = &dyn PostProcessor> {
        self.post_processors
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| {
                self.post_processor_filter
                    .as_ref()
                    .map_or(true, |allowed| allowed.contains(&p.kind()))
            })
    }

    /// Build images from `files`, then post-process every new image.
    pub fn run<I, P>(&self, files: I) -> PanImgResult
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut remaining: BTreeSet<PathBuf> = files.into_iter().map(Into::into).collect();
        let total = remaining.len();
        let mut result = PanImgResult::new();

        for builder in self.active_builders() {
            if remaining.is_empty() {
                debug!("All inputs consumed, skipping remaining builders");
                break;
            }

            let kind = builder.kind();
            let mut builder_result = builder.build(&remaining);
            check_builder_result(kind, &remaining, &mut builder_result);

            debug!(
                builder = %kind,
                offered = remaining.len(),
                images = builder_result.new_images.len(),
                consumed = builder_result.consumed_files.len(),
                errored = builder_result.file_errors.len(),
                "Builder finished"
            );

            for path in &builder_result.consumed_files {
                remaining.remove(path);
            }
            result.merge(builder_result);
        }

        self.post_process(&mut result);

        info!("Processed {} input(s): {}", total, result.summary());
        result
    }

    fn post_process(&self, result: &mut PanImgResult) {
        let images: Vec<PanImg> = result.images_sorted().into_iter().cloned().collect();

        for processor in self.active_post_processors() {
            let kind = processor.kind();
            for image in &images {
                let output = {
                    let files = result.files_for_image(image.pk());
                    processor.process(image, &files)
                };

                let (accepted, foreign): (HashSet<PanImgFile>, HashSet<PanImgFile>) = output
                    .new_image_files
                    .into_iter()
                    .partition(|file| file.image_id() == image.pk());

                for file in &foreign {
                    warn!(
                        post_processor = %kind,
                        image = %image.pk(),
                        "Dropping {} which references image {}",
                        file.file().display(),
                        file.image_id()
                    );
                }

                debug!(
                    post_processor = %kind,
                    image = %image.pk(),
                    files = accepted.len(),
                    "Post-processor finished"
                );

                result.extend_post_processed(PostProcessorResult {
                    new_image_files: accepted,
                });
            }
        }
    }
}

/// Drop consumed paths that were never offered and flag contract breaches.
fn check_builder_result(
    kind: ImageBuilderOptions,
    offered: &BTreeSet<PathBuf>,
    result: &mut PanImgResult,
) {
    result.consumed_files.retain(|path| {
        let known = offered.contains(path);
        if !known {
            warn!(
                builder = %kind,
                "Ignoring consumed path {} which was not offered",
                path.display()
            );
        }
        known
    });

    if result.new_images.is_empty() && !result.consumed_files.is_empty() {
        warn!(
            builder = %kind,
            "Builder consumed {} file(s) without producing an image",
            result.consumed_files.len()
        );
    }
}
