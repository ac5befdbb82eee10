//! Typed failure kinds of the sample pipeline.
//!
//! Errors travel as [`anyhow::Error`](anyhow::Error); callers that need to
//! distinguish kinds downcast to [`DatasetError`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    /// The zoom-out branch shrank the source image below a usable size.
    /// The sample cannot be produced at the requested scale.
    #[error("crop ratio {crop_ratio:.3} shrinks the source image to {width}x{height} px")]
    DegenerateZoom {
        crop_ratio: f64,
        width: u32,
        height: u32,
    },

    /// An annotation kind required by the task is not loaded.
    #[error("task `{task}` has no `{kind}` annotations loaded")]
    AnnotationKey { task: String, kind: String },

    /// No annotation table is loaded for the task at all.
    #[error("no annotation table loaded for task `{task}`")]
    UnknownTask { task: String },

    /// The image identifier does not follow the sequence naming scheme.
    #[error("cannot decode image name `{name}`")]
    MalformedImageName { name: String },
}
