//! Batch outcome of running image builders.
//!
//! A [`PanImgResult`] is a plain accumulator. Builders fill one per invocation,
//! and the orchestrator merges them. Partial success is represented directly:
//! the same input path may be consumed and also carry error messages.
//!
//! # Merge
//!
//! [`PanImgResult::merge`] takes the union of `new_images`, `new_image_files`
//! and `consumed_files` and concatenates the error lists of each path, keeping
//! the receiver's messages first. Merging is associative. Swapping the operands
//! only changes the order of messages within a path.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IntegrityError, IntegrityIssue};
use crate::model::{PanImg, PanImgFile};

use super::post_process::PostProcessorResult;
use super::summary::ResultSummary;

/// Accumulated outcome of processing a batch of input files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanImgResult {
    /// Images built from the batch
    pub new_images: HashSet<PanImg>,

    /// Files belonging to the new images
    pub new_image_files: HashSet<PanImgFile>,

    /// Inputs that contributed to at least one new image
    pub consumed_files: BTreeSet<PathBuf>,

    /// Messages for inputs that failed or were only partially processed
    pub file_errors: BTreeMap<PathBuf, Vec<String>>,
}

impl PanImgResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if an identical image was already present.
    pub fn add_image(&mut self, image: PanImg) -> bool {
        self.new_images.insert(image)
    }

    /// Returns `false` if an identical file was already present.
    pub fn add_image_file(&mut self, file: PanImgFile) -> bool {
        self.new_image_files.insert(file)
    }

    /// Mark an input as used by a new image.
    pub fn consume(&mut self, path: impl Into<PathBuf>) {
        self.consumed_files.insert(path.into());
    }

    /// Append an error message for an input path.
    pub fn add_error(&mut self, path: impl Into<PathBuf>, message: impl Into<String>) {
        self.file_errors
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: PanImgResult) {
        self.new_images.extend(other.new_images);
        self.new_image_files.extend(other.new_image_files);
        self.consumed_files.extend(other.consumed_files);
        for (path, messages) in other.file_errors {
            self.file_errors.entry(path).or_default().extend(messages);
        }
    }

    /// Consuming form of [`merge`](Self::merge).
    pub fn merged(mut self, other: PanImgResult) -> Self {
        self.merge(other);
        self
    }

    /// Add the files derived by a post-processing stage.
    pub fn extend_post_processed(&mut self, result: PostProcessorResult) {
        self.new_image_files.extend(result.new_image_files);
    }

    /// True when nothing at all was recorded.
    pub fn is_empty(&self) -> bool {
        self.new_images.is_empty()
            && self.new_image_files.is_empty()
            && self.consumed_files.is_empty()
            && self.file_errors.is_empty()
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            new_images: self.new_images.len(),
            new_image_files: self.new_image_files.len(),
            consumed_files: self.consumed_files.len(),
            errored_files: self.file_errors.len(),
            error_messages: self.file_errors.values().map(Vec::len).sum(),
        }
    }

    /// Errors recorded for one input path, empty if there are none.
    pub fn errors_for(&self, path: impl AsRef<Path>) -> &[String] {
        self.file_errors
            .get(path.as_ref())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up a new image by primary key.
    pub fn image(&self, pk: Uuid) -> Option<&PanImg> {
        self.new_images.iter().find(|image| image.pk() == pk)
    }

    /// New images ordered by primary key.
    pub fn images_sorted(&self) -> Vec<&PanImg> {
        let mut images: Vec<&PanImg> = self.new_images.iter().collect();
        images.sort_by_key(|image| image.pk());
        images
    }

    /// Files referencing `pk`, ordered by path.
    pub fn files_for_image(&self, pk: Uuid) -> Vec<&PanImgFile> {
        let mut files: Vec<&PanImgFile> = self
            .new_image_files
            .iter()
            .filter(|file| file.image_id() == pk)
            .collect();
        files.sort_by(|a, b| a.file().cmp(b.file()));
        files
    }

    /// Cross-field inconsistencies, in a stable order.
    ///
    /// An input path that is both consumed and errored is not an issue.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        let mut pk_counts: HashMap<Uuid, usize> = HashMap::new();
        for image in &self.new_images {
            *pk_counts.entry(image.pk()).or_default() += 1;
        }
        let mut duplicated: Vec<Uuid> = pk_counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(pk, _)| *pk)
            .collect();
        duplicated.sort();
        issues.extend(
            duplicated
                .into_iter()
                .map(|pk| IntegrityIssue::DuplicateImagePk { pk }),
        );

        let mut files: Vec<&PanImgFile> = self.new_image_files.iter().collect();
        files.sort_by(|a, b| (a.file(), a.image_id()).cmp(&(b.file(), b.image_id())));
        for file in files {
            if !pk_counts.contains_key(&file.image_id()) {
                issues.push(IntegrityIssue::DanglingImageFile {
                    image_id: file.image_id(),
                    file: file.file().to_path_buf(),
                });
            }
            issues.extend(file.layout_issue());
        }

        issues
    }

    /// Fail if [`integrity_issues`](Self::integrity_issues) finds anything.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        let issues = self.integrity_issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(IntegrityError { issues })
        }
    }
}

impl Extend<PanImgResult> for PanImgResult {
    fn extend<I: IntoIterator<Item = PanImgResult>>(&mut self, iter: I) {
        for result in iter {
            self.merge(result);
        }
    }
}

impl FromIterator<PanImgResult> for PanImgResult {
    fn from_iter<I: IntoIterator<Item = PanImgResult>>(iter: I) -> Self {
        let mut merged = PanImgResult::new();
        merged.extend(iter);
        merged
    }
}

// =============================================================================
// Tests
// =============================================================================
