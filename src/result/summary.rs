use std::fmt;

use serde::Serialize;

/// Per-field counts of a [`PanImgResult`](super::PanImgResult).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub new_images: usize,
    pub new_image_files: usize,
    pub consumed_files: usize,
    /// Number of input paths with at least one message
    pub errored_files: usize,
    pub error_messages: usize,
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} image(s), {} image file(s), {} consumed input(s), {} input(s) with {} error(s)",
            self.new_images,
            self.new_image_files,
            self.consumed_files,
            self.errored_files,
            self.error_messages
        )
    }
}
