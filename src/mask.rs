use std::borrow::Cow;
use std::collections::VecDeque;
use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::euclidean_squared_distance_transform;
use imageproc::filter::gaussian_blur_f32;
use ndarray::Array2;
use tracing::{debug, warn};

use crate::GeotraceResult;
use crate::config::{Channel, MaskProcessingOptions, is_positive_sigma};

/// Binary foreground/background grid, indexed `[[y, x]]`, holding 1 for
/// foreground and 0 for background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterMask {
    cells: Array2<u8>,
}

impl RasterMask {
    /// Build a mask from a row-major buffer. Any non-zero cell is foreground.
    pub fn from_cells(width: u32, height: u32, cells: Vec<u8>) -> GeotraceResult<Self> {
        let mut cells = Array2::from_shape_vec((height as usize, width as usize), cells)?;
        cells.mapv_inplace(|v| u8::from(v != 0));
        Ok(Self { cells })
    }

    /// Threshold a grayscale image: a pixel is foreground iff its value is `>= threshold`.
    pub fn from_gray(gray: &GrayImage, threshold: u8) -> Self {
        let (w, h) = gray.dimensions();
        let cells = Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
            u8::from(gray.get_pixel(x as u32, y as u32)[0] >= threshold)
        });
        Self { cells }
    }

    /// Sample one channel of a decoded image and threshold it.
    pub fn from_image(image: &DynamicImage, channel: Channel, threshold: u8) -> Self {
        Self::from_gray(&sample_channel(image, channel), threshold)
    }

    pub fn width(&self) -> u32 {
        self.cells.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.cells.nrows() as u32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Foreground test that treats every position outside the grid as background.
    pub fn is_foreground(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.cells
            .get([y as usize, x as usize])
            .is_some_and(|&v| v != 0)
    }

    /// First foreground pixel in row-major order (top to bottom, left to right).
    pub fn first_foreground(&self) -> Option<(u32, u32)> {
        self.cells
            .indexed_iter()
            .find(|&(_, &v)| v != 0)
            .map(|((y, x), _)| (x as u32, y as u32))
    }

    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    pub fn has_foreground(&self) -> bool {
        self.cells.iter().any(|&v| v != 0)
    }

    /// Export as a grayscale image with foreground at 255 and background at 0.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([if self.cells[[y as usize, x as usize]] != 0 {
                255
            } else {
                0
            }])
        })
    }
}

/// Decode an encoded image buffer at its native size.
pub fn decode_image(bytes: &[u8]) -> GeotraceResult<DynamicImage> {
    let image = image::load_from_memory(bytes)?;
    debug!(
        width = image.width(),
        height = image.height(),
        "decoded mask image"
    );
    Ok(image)
}

/// Open and decode an image file at its native size.
pub fn load_image(path: &Path) -> GeotraceResult<DynamicImage> {
    let image = image::open(path)?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "loaded mask image"
    );
    Ok(image)
}

/// Extract a single channel of the image as grayscale.
pub fn sample_channel(image: &DynamicImage, channel: Channel) -> GrayImage {
    let rgba = image.to_rgba8();
    let idx = channel.rgba_index();
    let (w, h) = rgba.dimensions();
    let mut out = GrayImage::new(w, h);
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        *dst = Luma([src[idx]]);
    }
    out
}

/// A clean-up step applied to an already thresholded mask.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskOperation {
    Dilate { radius: f32 },
    FillHoles,
}

impl MaskOperation {
    pub fn apply(&self, input: &RasterMask) -> RasterMask {
        match self {
            MaskOperation::Dilate { radius } => dilate_euclidean(input, *radius),
            MaskOperation::FillHoles => fill_mask_holes(input),
        }
    }
}

/// Run a list of operations against the mask, returning the transformed mask.
pub fn apply_operations(source: RasterMask, operations: &[MaskOperation]) -> RasterMask {
    operations
        .iter()
        .fold(source, |current, op| op.apply(&current))
}

/// The binary clean-up steps enabled by the options, in application order.
pub fn operations_from_options(options: &MaskProcessingOptions) -> Vec<MaskOperation> {
    let mut operations = Vec::new();
    if options.dilate {
        operations.push(MaskOperation::Dilate {
            radius: options.dilation_radius,
        });
    }
    if options.fill_holes {
        operations.push(MaskOperation::FillHoles);
    }
    operations
}

/// Full mask construction: optional blur, threshold, then the binary clean-up steps.
///
/// A blur with a sigma that is not finite and positive is skipped.
pub fn build_mask(
    gray: &GrayImage,
    threshold: u8,
    options: &MaskProcessingOptions,
) -> RasterMask {
    let source = match (options.blur, is_positive_sigma(options.blur_sigma)) {
        (true, true) => Cow::Owned(gaussian_blur_f32(gray, options.blur_sigma)),
        (true, false) => {
            warn!(sigma = options.blur_sigma, "blur sigma must be above 0, skipping blur");
            Cow::Borrowed(gray)
        }
        (false, _) => Cow::Borrowed(gray),
    };
    let mask = RasterMask::from_gray(&source, threshold);
    apply_operations(mask, &operations_from_options(options))
}

/// Grow the foreground by every pixel within `radius` (Euclidean) of it.
pub fn dilate_euclidean(mask: &RasterMask, radius: f32) -> RasterMask {
    let d2 = euclidean_squared_distance_transform(&mask.to_gray_image());
    let r2 = f64::from(radius) * f64::from(radius);
    let cells = Array2::from_shape_fn((mask.height() as usize, mask.width() as usize), |(y, x)| {
        u8::from(d2.get_pixel(x as u32, y as u32)[0] <= r2)
    });
    RasterMask { cells }
}

/// Turn background regions that are not 4-connected to the border into foreground.
pub fn fill_mask_holes(mask: &RasterMask) -> RasterMask {
    let (h, w) = mask.cells.dim();
    let mut outside = Array2::<bool>::from_elem((h, w), false);
    let mut queue = VecDeque::new();

    let is_border = |y: usize, x: usize| y == 0 || x == 0 || y + 1 == h || x + 1 == w;
    for ((y, x), &v) in mask.cells.indexed_iter() {
        if v == 0 && is_border(y, x) {
            outside[[y, x]] = true;
            queue.push_back((y, x));
        }
    }

    while let Some((y, x)) = queue.pop_front() {
        let neighbours = [
            (y.wrapping_sub(1), x),
            (y + 1, x),
            (y, x.wrapping_sub(1)),
            (y, x + 1),
        ];
        for (ny, nx) in neighbours {
            if ny >= h || nx >= w || outside[[ny, nx]] || mask.cells[[ny, nx]] != 0 {
                continue;
            }
            outside[[ny, nx]] = true;
            queue.push_back((ny, nx));
        }
    }

    RasterMask {
        cells: outside.mapv(|o| u8::from(!o)),
    }
}
