use thiserror::Error;

use crate::command::CommandError;
use crate::scene::ElementId;
use crate::state::PersistenceError;

/// Rejected user input. Nothing in the editor was touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File is too large ({size} bytes, max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("File is empty")]
    Empty,

    #[error("Malformed document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

/// The image bytes could not be turned into pixels.
#[derive(Debug, Error)]
#[error("Failed to decode image: {0}")]
pub struct DecodeError(#[from] pub image::ImageError);

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Nothing to export, no image is loaded")]
    NoImage,

    #[error("Nothing to export, the scene has no visible elements")]
    EmptyScene,

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// A calling-discipline bug. These are never clamped away.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("The original buffer is read-only after load")]
    OriginalIsReadOnly,

    #[error("Snapshot is {got_w}x{got_h} but the buffer is {want_w}x{want_h}")]
    DimensionMismatch {
        want_w: u32,
        want_h: u32,
        got_w: u32,
        got_h: u32,
    },

    #[error("No image is loaded")]
    NoImage,

    #[error("Pixel data length {len} does not match {width}x{height}")]
    BadPixelData { width: u32, height: u32, len: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("Element {0} not found")]
    NotFound(ElementId),

    #[error("Element {0} is locked")]
    Locked(ElementId),

    #[error("Cannot change element {id} from {from} to {to}")]
    KindMismatch {
        id: ElementId,
        from: &'static str,
        to: &'static str,
    },

    #[error("Need at least {needed} elements, got {got}")]
    NotEnoughElements { needed: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("A segmentation is already running")]
    Busy,

    #[error("Segmentation failed: {0}")]
    Failed(String),

    #[error("Segmentation returned {got_w}x{got_h}, expected {want_w}x{want_h}")]
    DimensionMismatch {
        want_w: u32,
        want_h: u32,
        got_w: u32,
        got_h: u32,
    },
}

/// Errors that can occur during editor state transitions
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot transition from {from} to {to}")]
pub struct StateTransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

/// Everything a user-facing operation can fail with.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Transition(#[from] StateTransitionError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type StudioResult<T> = Result<T, StudioError>;
