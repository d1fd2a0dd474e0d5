use thiserror::Error;

/// Result type alias for operations that may fail with [`GeotraceError`].
pub type GeotraceResult<T> = std::result::Result<T, GeotraceError>;

/// Error types that can occur while vectorizing a mask.
///
/// Only decoding and I/O can fail on the vectorization path. Empty masks,
/// unordered bounds and runaway traces degrade to short or empty polygons
/// instead of surfacing here.
#[derive(Debug, Error)]
pub enum GeotraceError {
    /// Image loading, decoding, or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Options file or polygon output could not be (de)serialized.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// An option value is outside the range the processing step accepts.
    #[error("Invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },
    /// Mask cell buffer does not match the requested dimensions.
    #[error("Invalid mask shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
