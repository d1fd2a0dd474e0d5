use tracing::{debug, warn};

use crate::GeotraceResult;
use crate::config::DEFAULT_MAX_VERTICES;
use crate::contour::{TraceTermination, trace_outer_contour};
use crate::geo::{GeoBounds, GeoPolygon};
use crate::mask::RasterMask;
use crate::simplify::{sampling_stride, stride_sample};

use super::MaskVectorizer;

/// Outer-boundary vectorizer: trace, stride-sample, project and close the ring.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryVectorizer {
    max_vertices: usize,
}

impl BoundaryVectorizer {
    pub fn new(max_vertices: usize) -> Self {
        Self { max_vertices }
    }

    /// Vectorize without the `Result` wrapper; this step cannot fail.
    pub fn polygon(&self, mask: &RasterMask, bounds: &GeoBounds) -> GeoPolygon {
        let outcome = trace_outer_contour(mask);
        let (width, height) = mask.dimensions();

        match outcome.termination {
            TraceTermination::NoForeground => {
                debug!(width, height, "mask has no foreground, returning empty polygon");
                return GeoPolygon::empty();
            }
            TraceTermination::IterationCap => warn!(
                width,
                height,
                path_len = outcome.path.len(),
                "contour trace hit the iteration cap, polygon may be incomplete"
            ),
            termination => debug!(
                ?termination,
                path_len = outcome.path.len(),
                "contour traced"
            ),
        }

        let stride = sampling_stride(outcome.path.len(), self.max_vertices);
        let sampled = stride_sample(&outcome.path, self.max_vertices);
        debug!(stride, vertices = sampled.len(), "path simplified");

        let points = sampled
            .into_iter()
            .map(|(x, y)| bounds.project(x, y, width, height))
            .collect();
        GeoPolygon::closed(points)
    }
}

impl Default for BoundaryVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VERTICES)
    }
}

impl MaskVectorizer for BoundaryVectorizer {
    type Output = GeoPolygon;

    fn vectorize(&self, mask: &RasterMask, bounds: &GeoBounds) -> GeotraceResult<Self::Output> {
        Ok(self.polygon(mask, bounds))
    }
}
