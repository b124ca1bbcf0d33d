//! Deep Zoom Image (DZI) output layout.
//!
//! A DZI post-processor writes a `.dzi` XML descriptor next to a `_files`
//! directory holding one sub-directory per pyramid level. This module names
//! those outputs and describes the pyramid so that the resulting
//! [`PanImgFile`] and `resolution_levels` are consistent. Producing the tiles
//! is left to the post-processor implementation.
//!
//! # Level numbering
//!
//! Deep Zoom numbers levels from 0 (1x1 pixel) up to the full resolution:
//! - DZI level 0 = 1x1 pixel (lowest resolution)
//! - DZI max level = full resolution, `ceil(log2(max(width, height)))`

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::model::{ImageType, PanImgFile};

/// Default edge length of a tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default overlap between neighbouring tiles in pixels.
pub const DEFAULT_TILE_OVERLAP: u32 = 0;

/// Default tile encoding.
pub const DEFAULT_TILE_FORMAT: &str = "jpg";

// =============================================================================
// Layout
// =============================================================================

/// Paths of the descriptor and tile directory for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DziLayout {
    descriptor: PathBuf,
    tiles_dir: PathBuf,
}

impl DziLayout {
    /// `<output_dir>/<pk>.dzi` and `<output_dir>/<pk>_files/`.
    pub fn for_image(output_dir: impl AsRef<Path>, pk: Uuid) -> Self {
        let output_dir = output_dir.as_ref();
        Self {
            descriptor: output_dir.join(format!("{pk}.dzi")),
            tiles_dir: output_dir.join(format!("{pk}_files")),
        }
    }

    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }

    pub fn tiles_dir(&self) -> &Path {
        &self.tiles_dir
    }

    /// Path of the tile at `column`/`row` of a DZI level.
    pub fn tile_path(&self, level: u32, column: u64, row: u64, format: &str) -> PathBuf {
        self.tiles_dir
            .join(level.to_string())
            .join(format!("{column}_{row}.{format}"))
    }

    /// The file record a DZI post-processor emits for `image_id`.
    pub fn image_file(&self, image_id: Uuid) -> PanImgFile {
        PanImgFile::new(image_id, ImageType::Dzi, self.descriptor.clone())
            .with_directory(self.tiles_dir.clone())
    }
}

// =============================================================================
// Pyramid geometry
// =============================================================================

/// Generate the DZI XML descriptor.
///
/// # Example Output
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Image xmlns="http://schemas.microsoft.com/deepzoom/2008"
///        TileSize="256"
///        Overlap="0"
///        Format="jpg">
///   <Size Width="46920" Height="33600" />
/// </Image>
/// ```
pub fn descriptor_xml(width: u64, height: u64, tile_size: u32, overlap: u32, format: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Image xmlns="http://schemas.microsoft.com/deepzoom/2008"
       TileSize="{tile_size}"
       Overlap="{overlap}"
       Format="{format}">
  <Size Width="{width}" Height="{height}" />
</Image>"#
    )
}

/// Highest DZI level, the one holding the full resolution image.
pub fn max_level(width: u64, height: u64) -> u32 {
    let max_dim = width.max(height);
    if max_dim <= 1 {
        return 0;
    }
    // ceil(log2(n)) for n >= 2
    64 - (max_dim - 1).leading_zeros()
}

/// Number of levels in the pyramid, the value recorded as `resolution_levels`.
pub fn resolution_levels(width: u64, height: u64) -> u64 {
    u64::from(max_level(width, height)) + 1
}

/// Dimensions of the image at a DZI level.
///
/// Returns `None` for levels above the maximum.
pub fn level_dimensions(width: u64, height: u64, level: u32) -> Option<(u64, u64)> {
    let max = max_level(width, height);
    if level > max {
        return None;
    }

    // A shift of 64 only happens at level 0 of the largest images
    match 1u64.checked_shl(max - level) {
        Some(scale) => Some((width.div_ceil(scale).max(1), height.div_ceil(scale).max(1))),
        None => Some((1, 1)),
    }
}

/// Number of tile columns and rows needed to cover a level.
pub fn tile_count(level_width: u64, level_height: u64, tile_size: u32) -> (u64, u64) {
    let tile_size = u64::from(tile_size.max(1));
    (
        level_width.div_ceil(tile_size).max(1),
        level_height.div_ceil(tile_size).max(1),
    )
}
