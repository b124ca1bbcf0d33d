//! Color spaces and their inference from pixel component counts.

use crate::error::UnsupportedColorSpace;

use super::options::string_enum;

string_enum! {
    /// Pixel interpretation of image data.
    ///
    /// `Ycbcr` is never inferred from a component count; builders that know
    /// the source encodes YCbCr must set it explicitly.
    ColorSpace, "ColorSpace" {
        Gray => "GRAY",
        Rgb => "RGB",
        Rgba => "RGBA",
        Ycbcr => "YCBCR",
    }
}

/// Mapping from pixel component count to color space.
pub const ITK_COLOR_SPACE_MAP: [(u32, ColorSpace); 3] = [
    (1, ColorSpace::Gray),
    (3, ColorSpace::Rgb),
    (4, ColorSpace::Rgba),
];

impl ColorSpace {
    /// Infer the color space from the number of components per pixel.
    ///
    /// Only the counts listed in [`ITK_COLOR_SPACE_MAP`] are accepted.
    pub fn from_components(components: u32) -> Result<Self, UnsupportedColorSpace> {
        ITK_COLOR_SPACE_MAP
            .iter()
            .find(|(count, _)| *count == components)
            .map(|(_, color_space)| *color_space)
            .ok_or(UnsupportedColorSpace { components })
    }
}
