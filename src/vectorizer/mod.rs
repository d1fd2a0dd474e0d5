use crate::GeotraceResult;
use crate::geo::GeoBounds;
use crate::mask::RasterMask;

/// A trait representing an algorithm that can turn a mask into a geo-referenced vector shape.
pub trait MaskVectorizer {
    type Output;

    fn vectorize(&self, mask: &RasterMask, bounds: &GeoBounds) -> GeotraceResult<Self::Output>;
}

pub mod boundary;
