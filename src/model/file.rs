//! The record describing one physical artifact of an image.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IntegrityIssue;

use super::options::ImageType;

/// A file (and optional companion directory) belonging to a [`PanImg`].
///
/// `image_id` is a back-reference to the owning image's `pk`; the image does
/// not own its files, and more can be added later by a post-processor.
/// Nothing is cross-checked here, dangling references are only detectable
/// once the file is placed in a [`PanImgResult`].
///
/// ```compile_fail
/// use panimg_models::{ImageType, PanImgFile};
/// use uuid::Uuid;
///
/// let mut file = PanImgFile::new(Uuid::new_v4(), ImageType::Mhd, "/tmp/a.mhd");
/// file.file = "/tmp/b.mhd".into();
/// ```
///
/// [`PanImg`]: crate::PanImg
/// [`PanImgResult`]: crate::PanImgResult
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanImgFile {
    image_id: Uuid,
    image_type: ImageType,
    file: PathBuf,
    #[serde(default)]
    directory: Option<PathBuf>,
}

impl PanImgFile {
    pub fn new(image_id: Uuid, image_type: ImageType, file: impl Into<PathBuf>) -> Self {
        Self {
            image_id,
            image_type,
            file: file.into(),
            directory: None,
        }
    }

    /// Attach a directory of side-car files, e.g. the tiles of a DZI pyramid.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn image_id(&self) -> Uuid {
        self.image_id
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Check that a directory is present exactly when the storage format needs one.
    pub fn layout_issue(&self) -> Option<IntegrityIssue> {
        match (&self.directory, self.image_type.requires_directory()) {
            (None, true) => Some(IntegrityIssue::MissingDirectory {
                image_id: self.image_id,
                file: self.file.clone(),
            }),
            (Some(directory), false) => Some(IntegrityIssue::UnexpectedDirectory {
                image_id: self.image_id,
                file: self.file.clone(),
                directory: directory.clone(),
            }),
            _ => None,
        }
    }
}
