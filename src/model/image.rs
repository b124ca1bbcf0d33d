//! The record describing one successfully ingested logical image.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{UnsupportedColorSpace, ValidationError};

use super::color::ColorSpace;
use super::options::EyeChoice;

/// Maximum number of distinct segmentation labels.
///
/// Label images are restricted to 8-bit samples, so 256 values could be
/// represented, but only 64 are accepted.
pub const MAXIMUM_SEGMENTS_LENGTH: usize = 64;

/// Largest dimension or count an image may carry.
///
/// Persisted documents store these fields as signed 64-bit integers.
pub const MAXIMUM_COUNT: u64 = i64::MAX as u64;

// =============================================================================
// PanImg
// =============================================================================

/// One logical image produced by a builder.
///
/// Instances are immutable: fields are only readable through accessors and
/// an updated image has to be built anew with [`PanImg::to_builder`].
/// Equality and hashing are structural, so images can be kept in sets.
///
/// Optional fields are `None` when the value is not known, which is distinct
/// from a measured zero.
///
/// # Example
///
/// ```
/// use panimg_models::{ColorSpace, EyeChoice, PanImg};
/// use uuid::Uuid;
///
/// let image = PanImg::builder(Uuid::new_v4(), "scan.mhd", 512, 512)
///     .color_space(ColorSpace::Gray)
///     .eye_choice(EyeChoice::NotApplicable)
///     .depth(100)
///     .voxel_spacing_mm(0.5, 0.5, 2.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(image.depth(), Some(100));
/// assert_eq!(image.segments(), None);
/// ```
///
/// Fields cannot be assigned after construction:
///
/// ```compile_fail
/// use panimg_models::{ColorSpace, EyeChoice, PanImg};
/// use uuid::Uuid;
///
/// let mut image = PanImg::builder(Uuid::new_v4(), "scan.mhd", 100, 100)
///     .color_space(ColorSpace::Gray)
///     .eye_choice(EyeChoice::Unknown)
///     .build()
///     .unwrap();
/// image.width = 200;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PanImgRecord", into = "PanImgRecord")]
pub struct PanImg {
    pk: Uuid,
    name: String,
    width: u64,
    height: u64,
    depth: Option<u64>,
    voxel_width_mm: Option<f64>,
    voxel_height_mm: Option<f64>,
    voxel_depth_mm: Option<f64>,
    timepoints: Option<u64>,
    resolution_levels: Option<u64>,
    window_center: Option<f64>,
    window_width: Option<f64>,
    color_space: ColorSpace,
    eye_choice: EyeChoice,
    segments: Option<BTreeSet<i64>>,
}

// Floats are finite and have no negative zero after validation, so bitwise
// hashing agrees with `==`.
impl Eq for PanImg {}

impl Hash for PanImg {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pk.hash(state);
        self.name.hash(state);
        self.width.hash(state);
        self.height.hash(state);
        self.depth.hash(state);
        for value in [
            self.voxel_width_mm,
            self.voxel_height_mm,
            self.voxel_depth_mm,
            self.window_center,
            self.window_width,
        ] {
            value.map(f64::to_bits).hash(state);
        }
        self.timepoints.hash(state);
        self.resolution_levels.hash(state);
        self.color_space.hash(state);
        self.eye_choice.hash(state);
        self.segments.hash(state);
    }
}

impl PanImg {
    /// Start building an image from its required fields.
    ///
    /// Color space and laterality must also be supplied before
    /// [`PanImgBuilder::build`] succeeds.
    pub fn builder(pk: Uuid, name: impl Into<String>, width: u64, height: u64) -> PanImgBuilder {
        PanImgBuilder {
            pk,
            name: name.into(),
            width,
            height,
            depth: None,
            voxel_width_mm: None,
            voxel_height_mm: None,
            voxel_depth_mm: None,
            timepoints: None,
            resolution_levels: None,
            window_center: None,
            window_width: None,
            color_space: None,
            eye_choice: None,
            segments: None,
        }
    }

    /// A builder pre-filled with this image's values.
    pub fn to_builder(&self) -> PanImgBuilder {
        PanImgBuilder {
            pk: self.pk,
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            depth: self.depth,
            voxel_width_mm: self.voxel_width_mm,
            voxel_height_mm: self.voxel_height_mm,
            voxel_depth_mm: self.voxel_depth_mm,
            timepoints: self.timepoints,
            resolution_levels: self.resolution_levels,
            window_center: self.window_center,
            window_width: self.window_width,
            color_space: Some(Ok(self.color_space)),
            eye_choice: Some(self.eye_choice),
            segments: self.segments.clone(),
        }
    }

    pub fn pk(&self) -> Uuid {
        self.pk
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u64 {
        self.width
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// Number of slices, for volumetric images.
    pub fn depth(&self) -> Option<u64> {
        self.depth
    }

    pub fn voxel_width_mm(&self) -> Option<f64> {
        self.voxel_width_mm
    }

    pub fn voxel_height_mm(&self) -> Option<f64> {
        self.voxel_height_mm
    }

    pub fn voxel_depth_mm(&self) -> Option<f64> {
        self.voxel_depth_mm
    }

    pub fn timepoints(&self) -> Option<u64> {
        self.timepoints
    }

    /// Number of pyramid levels, for tiled images.
    pub fn resolution_levels(&self) -> Option<u64> {
        self.resolution_levels
    }

    pub fn window_center(&self) -> Option<f64> {
        self.window_center
    }

    pub fn window_width(&self) -> Option<f64> {
        self.window_width
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn eye_choice(&self) -> EyeChoice {
        self.eye_choice
    }

    /// Distinct label values, for segmentation images.
    pub fn segments(&self) -> Option<&BTreeSet<i64>> {
        self.segments.as_ref()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`PanImg`].
///
/// All validation happens in [`build`](PanImgBuilder::build).
#[derive(Debug, Clone)]
pub struct PanImgBuilder {
    pk: Uuid,
    name: String,
    width: u64,
    height: u64,
    depth: Option<u64>,
    voxel_width_mm: Option<f64>,
    voxel_height_mm: Option<f64>,
    voxel_depth_mm: Option<f64>,
    timepoints: Option<u64>,
    resolution_levels: Option<u64>,
    window_center: Option<f64>,
    window_width: Option<f64>,
    color_space: Option<Result<ColorSpace, UnsupportedColorSpace>>,
    eye_choice: Option<EyeChoice>,
    segments: Option<BTreeSet<i64>>,
}

impl PanImgBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = Some(Ok(color_space));
        self
    }

    /// Derive the color space from the number of pixel components.
    ///
    /// An unmapped count makes [`build`](PanImgBuilder::build) fail.
    pub fn color_space_from_components(mut self, components: u32) -> Self {
        self.color_space = Some(ColorSpace::from_components(components));
        self
    }

    pub fn eye_choice(mut self, eye_choice: EyeChoice) -> Self {
        self.eye_choice = Some(eye_choice);
        self
    }

    pub fn depth(mut self, depth: u64) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn voxel_width_mm(mut self, value: f64) -> Self {
        self.voxel_width_mm = Some(value);
        self
    }

    pub fn voxel_height_mm(mut self, value: f64) -> Self {
        self.voxel_height_mm = Some(value);
        self
    }

    pub fn voxel_depth_mm(mut self, value: f64) -> Self {
        self.voxel_depth_mm = Some(value);
        self
    }

    /// Set all three voxel spacings at once.
    pub fn voxel_spacing_mm(self, width: f64, height: f64, depth: f64) -> Self {
        self.voxel_width_mm(width)
            .voxel_height_mm(height)
            .voxel_depth_mm(depth)
    }

    pub fn timepoints(mut self, timepoints: u64) -> Self {
        self.timepoints = Some(timepoints);
        self
    }

    pub fn resolution_levels(mut self, levels: u64) -> Self {
        self.resolution_levels = Some(levels);
        self
    }

    /// Set the display window.
    pub fn window(mut self, center: f64, width: f64) -> Self {
        self.window_center = Some(center);
        self.window_width = Some(width);
        self
    }

    pub fn segments(mut self, segments: impl IntoIterator<Item = i64>) -> Self {
        self.segments = Some(segments.into_iter().collect());
        self
    }

    /// Validate the collected values and produce the image.
    pub fn build(self) -> Result<PanImg, ValidationError> {
        let color_space = match self.color_space {
            Some(result) => result?,
            None => return Err(ValidationError::MissingField("color_space")),
        };
        let eye_choice = self
            .eye_choice
            .ok_or(ValidationError::MissingField("eye_choice"))?;

        if let Some(segments) = &self.segments {
            if segments.len() > MAXIMUM_SEGMENTS_LENGTH {
                return Err(ValidationError::TooManySegments {
                    count: segments.len(),
                    max: MAXIMUM_SEGMENTS_LENGTH,
                });
            }
        }

        Ok(PanImg {
            pk: self.pk,
            name: self.name,
            width: check_count("width", self.width)?,
            height: check_count("height", self.height)?,
            depth: self.depth.map(|v| check_count("depth", v)).transpose()?,
            voxel_width_mm: check_spacing("voxel_width_mm", self.voxel_width_mm)?,
            voxel_height_mm: check_spacing("voxel_height_mm", self.voxel_height_mm)?,
            voxel_depth_mm: check_spacing("voxel_depth_mm", self.voxel_depth_mm)?,
            timepoints: self.timepoints.map(|v| check_count("timepoints", v)).transpose()?,
            resolution_levels: self
                .resolution_levels
                .map(|v| check_count("resolution_levels", v))
                .transpose()?,
            window_center: check_finite("window_center", self.window_center)?,
            window_width: check_finite("window_width", self.window_width)?,
            color_space,
            eye_choice,
            segments: self.segments,
        })
    }
}

fn check_count(field: &'static str, value: u64) -> Result<u64, ValidationError> {
    if value > MAXIMUM_COUNT {
        return Err(ValidationError::ValueTooLarge {
            field,
            value,
            max: MAXIMUM_COUNT,
        });
    }
    Ok(value)
}

fn check_finite(field: &'static str, value: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::NonFiniteValue { field }),
        // Fold -0.0 into 0.0
        Some(v) if v == 0.0 => Ok(Some(0.0)),
        other => Ok(other),
    }
}

fn check_spacing(field: &'static str, value: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match check_finite(field, value)? {
        Some(v) if v <= 0.0 => Err(ValidationError::NonPositiveSpacing { field, value: v }),
        other => Ok(other),
    }
}

// =============================================================================
// Serialized form
// =============================================================================

/// Wire shape of a [`PanImg`].
///
/// Integers are signed here so that negative values in a document surface as
/// [`ValidationError::NegativeValue`] instead of a generic parse error.
#[derive(Serialize, Deserialize)]
struct PanImgRecord {
    pk: Uuid,
    name: String,
    width: i64,
    height: i64,
    depth: Option<i64>,
    voxel_width_mm: Option<f64>,
    voxel_height_mm: Option<f64>,
    voxel_depth_mm: Option<f64>,
    timepoints: Option<i64>,
    resolution_levels: Option<i64>,
    window_center: Option<f64>,
    window_width: Option<f64>,
    color_space: String,
    eye_choice: String,
    #[serde(default)]
    segments: Option<Vec<i64>>,
}

fn non_negative(field: &'static str, value: i64) -> Result<u64, ValidationError> {
    u64::try_from(value).map_err(|_| ValidationError::NegativeValue { field, value })
}

fn non_negative_opt(field: &'static str, value: Option<i64>) -> Result<Option<u64>, ValidationError> {
    value.map(|v| non_negative(field, v)).transpose()
}

impl TryFrom<PanImgRecord> for PanImg {
    type Error = ValidationError;

    fn try_from(record: PanImgRecord) -> Result<Self, Self::Error> {
        let mut builder = PanImg::builder(
            record.pk,
            record.name,
            non_negative("width", record.width)?,
            non_negative("height", record.height)?,
        )
        .color_space(record.color_space.parse()?)
        .eye_choice(record.eye_choice.parse()?);

        builder.depth = non_negative_opt("depth", record.depth)?;
        builder.timepoints = non_negative_opt("timepoints", record.timepoints)?;
        builder.resolution_levels = non_negative_opt("resolution_levels", record.resolution_levels)?;
        builder.voxel_width_mm = record.voxel_width_mm;
        builder.voxel_height_mm = record.voxel_height_mm;
        builder.voxel_depth_mm = record.voxel_depth_mm;
        builder.window_center = record.window_center;
        builder.window_width = record.window_width;
        builder.segments = record.segments.map(|s| s.into_iter().collect());

        builder.build()
    }
}

impl From<PanImg> for PanImgRecord {
    fn from(image: PanImg) -> Self {
        PanImgRecord {
            pk: image.pk,
            name: image.name,
            // `build` bounds every count by MAXIMUM_COUNT
            width: image.width as i64,
            height: image.height as i64,
            depth: image.depth.map(|v| v as i64),
            voxel_width_mm: image.voxel_width_mm,
            voxel_height_mm: image.voxel_height_mm,
            voxel_depth_mm: image.voxel_depth_mm,
            timepoints: image.timepoints.map(|v| v as i64),
            resolution_levels: image.resolution_levels.map(|v| v as i64),
            window_center: image.window_center,
            window_width: image.window_width,
            color_space: image.color_space.as_str().to_string(),
            eye_choice: image.eye_choice.as_str().to_string(),
            segments: image.segments.map(|s| s.into_iter().collect()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
