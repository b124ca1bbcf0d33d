use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::PanImgFile;

/// Files derived from already-built images by a post-processing stage.
///
/// There is no error channel; post-processor failures are reported through
/// logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessorResult {
    pub new_image_files: HashSet<PanImgFile>,
}

impl PostProcessorResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if an identical file was already present.
    pub fn add_image_file(&mut self, file: PanImgFile) -> bool {
        self.new_image_files.insert(file)
    }

    /// Union with another result.
    pub fn merge(&mut self, other: PostProcessorResult) {
        self.new_image_files.extend(other.new_image_files);
    }

    pub fn is_empty(&self) -> bool {
        self.new_image_files.is_empty()
    }
}

impl Extend<PostProcessorResult> for PostProcessorResult {
    fn extend<I: IntoIterator<Item = PostProcessorResult>>(&mut self, iter: I) {
        for result in iter {
            self.merge(result);
        }
    }
}

impl FromIterator<PostProcessorResult> for PostProcessorResult {
    fn from_iter<I: IntoIterator<Item = PostProcessorResult>>(iter: I) -> Self {
        let mut merged = PostProcessorResult::new();
        merged.extend(iter);
        merged
    }
}
