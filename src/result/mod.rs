//! Aggregates collecting the outcome of builders and post-processors.
//!
//! - [`PanImgResult`]: what a builder (or the whole pipeline) produced for a
//!   batch, including per-file errors
//! - [`PostProcessorResult`]: files derived from already-built images
//! - [`ResultSummary`]: counts for reporting

mod aggregate;
mod post_process;
mod summary;

pub use aggregate::PanImgResult;
pub use post_process::PostProcessorResult;
pub use summary::ResultSummary;
