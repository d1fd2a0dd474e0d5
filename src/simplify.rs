/// Stride used to bring a path of `len` points down to at most `max_vertices`.
///
/// Rounds up so the sampled output never exceeds `max_vertices`; rounding
/// down would let paths just under twice the budget through nearly whole.
/// Never less than one. A `max_vertices` of zero behaves like one.
pub fn sampling_stride(len: usize, max_vertices: usize) -> usize {
    len.div_ceil(max_vertices.max(1)).max(1)
}

/// Keep every `stride`-th point, starting with the first.
///
/// Uniform sampling only; no curvature is taken into account.
pub fn stride_sample<T: Copy>(points: &[T], max_vertices: usize) -> Vec<T> {
    let stride = sampling_stride(points.len(), max_vertices);
    points.iter().step_by(stride).copied().collect()
}
