//! # panimg-models
//!
//! Result models for a multi-format medical image ingestion pipeline.
//!
//! Format-specific builders (MHD, NIfTI, NRRD, DICOM, TIFF, OCT and a
//! fallback) turn input files into images; post-processors such as DZI tiling
//! derive more files from those images. This crate defines what they hand
//! back and how their outputs are combined.
//!
//! ## Architecture
//!
//! - [`model`] - Immutable value types: [`PanImg`], [`PanImgFile`] and the
//!   closed vocabularies they use
//! - [`result`] - Mutable aggregates: [`PanImgResult`], [`PostProcessorResult`]
//! - [`pipeline`] - [`ImageBuilder`]/[`PostProcessor`] seams, the [`Pipeline`]
//!   that runs them, and DZI output naming
//! - [`document`] - JSON result documents on disk
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust
//! use panimg_models::{EyeChoice, ImageType, PanImg, PanImgFile, PanImgResult};
//! use uuid::Uuid;
//!
//! let image = PanImg::builder(Uuid::new_v4(), "brain.mha", 256, 256)
//!     .depth(120)
//!     .color_space_from_components(1)
//!     .eye_choice(EyeChoice::NotApplicable)
//!     .build()
//!     .unwrap();
//!
//! let mut mhd = PanImgResult::new();
//! mhd.add_image_file(PanImgFile::new(image.pk(), ImageType::Mhd, "/out/brain.mha"));
//! mhd.add_image(image);
//! mhd.consume("/in/brain.mha");
//!
//! let mut nifti = PanImgResult::new();
//! nifti.add_error("/in/notes.txt", "Not a NIfTI file");
//!
//! let result = mhd.merged(nifti);
//! assert_eq!(result.new_images.len(), 1);
//! assert!(result.validate().is_ok());
//! assert_eq!(result.errors_for("/in/notes.txt"), ["Not a NIfTI file"]);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod result;

// Re-export commonly used types
pub use error::{
    CliError, IntegrityError, IntegrityIssue, UnsupportedColorSpace, ValidationError,
};
pub use model::{
    ColorSpace, EyeChoice, ImageBuilderOptions, ImageType, PanImg, PanImgBuilder, PanImgFile,
    PostProcessorOptions, ITK_COLOR_SPACE_MAP, MAXIMUM_COUNT, MAXIMUM_SEGMENTS_LENGTH,
};
pub use pipeline::{DziLayout, ImageBuilder, Pipeline, PostProcessor};
pub use result::{PanImgResult, PostProcessorResult, ResultSummary};
