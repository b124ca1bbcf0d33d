//! Value types describing ingested images and their files.
//!
//! - [`PanImg`]: one logical image, immutable once built
//! - [`PanImgFile`]: one physical artifact referencing an image by `pk`
//! - Closed vocabularies: [`ImageBuilderOptions`], [`PostProcessorOptions`],
//!   [`ColorSpace`], [`ImageType`], [`EyeChoice`]

mod color;
mod file;
mod image;
mod options;

pub use color::{ColorSpace, ITK_COLOR_SPACE_MAP};
pub use file::PanImgFile;
pub use image::{PanImg, PanImgBuilder, MAXIMUM_COUNT, MAXIMUM_SEGMENTS_LENGTH};
pub use options::{EyeChoice, ImageBuilderOptions, ImageType, PostProcessorOptions};
