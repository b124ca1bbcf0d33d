use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// A pixel component count that has no entry in the color space table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unsupported color space: no mapping for {components} component(s)")]
pub struct UnsupportedColorSpace {
    pub components: u32,
}

/// Errors raised while constructing an image model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// More distinct segment labels than allowed
    #[error("Too many segments: got {count}, maximum is {max}")]
    TooManySegments { count: usize, max: usize },

    /// A dimension or count was negative
    #[error("Invalid value for {field}: {value} is negative")]
    NegativeValue { field: &'static str, value: i64 },

    /// A dimension or count does not fit the persisted signed 64-bit form
    #[error("Invalid value for {field}: {value} exceeds the maximum of {max}")]
    ValueTooLarge {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// A physical spacing was zero or negative
    #[error("Invalid value for {field}: spacing must be positive, got {value}")]
    NonPositiveSpacing { field: &'static str, value: f64 },

    /// A float field was NaN or infinite
    #[error("Invalid value for {field}: value must be finite")]
    NonFiniteValue { field: &'static str },

    /// A required field was never supplied
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A string did not name a member of a closed vocabulary
    #[error("Invalid {kind} value: {value:?}")]
    InvalidEnumValue { kind: &'static str, value: String },

    /// Color space could not be derived from the component count
    #[error(transparent)]
    ColorSpace(#[from] UnsupportedColorSpace),
}

/// A single cross-field inconsistency inside a result aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A file references an image that is not part of the result
    DanglingImageFile { image_id: Uuid, file: PathBuf },

    /// Two different images share the same primary key
    DuplicateImagePk { pk: Uuid },

    /// A file whose storage format needs side-car files has no directory
    MissingDirectory { image_id: Uuid, file: PathBuf },

    /// A single-file format carries a companion directory
    UnexpectedDirectory {
        image_id: Uuid,
        file: PathBuf,
        directory: PathBuf,
    },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::DanglingImageFile { image_id, file } => write!(
                f,
                "{} references image {} which is not in the result",
                file.display(),
                image_id
            ),
            IntegrityIssue::DuplicateImagePk { pk } => {
                write!(f, "more than one image uses primary key {}", pk)
            }
            IntegrityIssue::MissingDirectory { image_id, file } => write!(
                f,
                "{} (image {}) requires a companion directory",
                file.display(),
                image_id
            ),
            IntegrityIssue::UnexpectedDirectory {
                image_id,
                file,
                directory,
            } => write!(
                f,
                "{} (image {}) is a single-file format but has directory {}",
                file.display(),
                image_id,
                directory.display()
            ),
        }
    }
}

/// A result aggregate failed its integrity check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Result failed integrity check with {} issue(s)", .issues.len())]
pub struct IntegrityError {
    pub issues: Vec<IntegrityIssue>,
}

/// Errors surfaced by the command line tool
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing a result document failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A result document could not be (de)serialized
    #[error("Invalid result document {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
