pub mod config;
pub mod contour;
pub mod error;
pub mod geo;
pub mod mask;
pub mod simplify;
pub mod vectorizer;

pub use config::{Channel, MaskProcessingOptions, VectorizeOptions, load_options};
pub use error::{GeotraceError, GeotraceResult};
pub use geo::{GeoBounds, GeoPoint, GeoPolygon};
pub use mask::RasterMask;
pub use vectorizer::MaskVectorizer;
pub use vectorizer::boundary::BoundaryVectorizer;

use std::path::Path;

use image::DynamicImage;

use crate::mask::{build_mask, decode_image, load_image, sample_channel};

/// Environment variable the CLI reads for the options file path.
pub const ENV_CONFIG_PATH: &str = "GEOTRACE_CONFIG";

/// Vectorize an encoded mask image (PNG or any format `image` decodes) into a
/// closed geographic ring.
///
/// Returns an empty polygon when no pixel reaches `threshold`. Only decoding
/// can fail.
pub fn vectorize(
    mask_image: &[u8],
    bounds: &GeoBounds,
    threshold: u8,
) -> GeotraceResult<GeoPolygon> {
    Geotrace::new()
        .with_threshold(threshold)
        .vectorize_bytes(mask_image, bounds)
}

/// Entry point for configuring and running mask vectorization.
#[derive(Debug, Clone, Default)]
pub struct Geotrace {
    options: VectorizeOptions,
}

impl Geotrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once, e.g. with ones read by [`load_options`].
    pub fn with_options(mut self, options: VectorizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the cutoff at or above which a pixel counts as foreground.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Set the image channel the mask is sampled from.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.options.channel = channel;
        self
    }

    /// Set the vertex budget for the sampled ring.
    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.options.max_vertices = max_vertices;
        self
    }

    /// Set the clean-up applied to the mask before tracing.
    pub fn with_mask_processing(mut self, options: MaskProcessingOptions) -> Self {
        self.options.mask_processing = options;
        self
    }

    /// Build the binary mask for an already decoded image.
    pub fn mask_from_image(&self, image: &DynamicImage) -> RasterMask {
        let gray = sample_channel(image, self.options.channel);
        build_mask(&gray, self.options.threshold, &self.options.mask_processing)
    }

    /// Decode an encoded image buffer and build its binary mask.
    pub fn decode_mask(&self, bytes: &[u8]) -> GeotraceResult<RasterMask> {
        let image = decode_image(bytes)?;
        Ok(self.mask_from_image(&image))
    }

    /// Open an image file and build its binary mask.
    pub fn load_mask(&self, path: impl AsRef<Path>) -> GeotraceResult<RasterMask> {
        let image = load_image(path.as_ref())?;
        Ok(self.mask_from_image(&image))
    }

    /// Vectorize an already built mask with the configured vertex budget.
    pub fn vectorize_mask(&self, mask: &RasterMask, bounds: &GeoBounds) -> GeoPolygon {
        BoundaryVectorizer::new(self.options.max_vertices).polygon(mask, bounds)
    }

    pub fn vectorize_image(&self, image: &DynamicImage, bounds: &GeoBounds) -> GeoPolygon {
        self.vectorize_mask(&self.mask_from_image(image), bounds)
    }

    pub fn vectorize_bytes(&self, bytes: &[u8], bounds: &GeoBounds) -> GeotraceResult<GeoPolygon> {
        let mask = self.decode_mask(bytes)?;
        Ok(self.vectorize_mask(&mask, bounds))
    }

    pub fn vectorize_path(
        &self,
        path: impl AsRef<Path>,
        bounds: &GeoBounds,
    ) -> GeotraceResult<GeoPolygon> {
        let mask = self.load_mask(path)?;
        Ok(self.vectorize_mask(&mask, bounds))
    }

    /// Vectorize with any [`MaskVectorizer`] implementation instead of the built-in one.
    pub fn vectorize_with<V>(
        &self,
        vectorizer: &V,
        mask: &RasterMask,
        bounds: &GeoBounds,
    ) -> GeotraceResult<V::Output>
    where
        V: MaskVectorizer,
    {
        vectorizer.vectorize(mask, bounds)
    }
}
