use std::path::{Path, PathBuf};

use geotrace::{Geotrace, GeotraceResult, VectorizeOptions, load_options};

use crate::cli::{GlobalOptions, MaskProcessingArgs};

/// Resolve the effective options: the config file (or defaults), then explicit flags.
pub fn resolve_options(
    global: &GlobalOptions,
    args: &MaskProcessingArgs,
    max_vertices: Option<usize>,
) -> GeotraceResult<VectorizeOptions> {
    let mut options = match &global.config {
        Some(path) => load_options(path)?,
        None => VectorizeOptions::default(),
    };
    apply_overrides(&mut options, args, max_vertices);
    options.mask_processing.validate()?;
    Ok(options)
}

fn apply_overrides(
    options: &mut VectorizeOptions,
    args: &MaskProcessingArgs,
    max_vertices: Option<usize>,
) {
    if let Some(threshold) = args.threshold {
        options.threshold = threshold;
    }
    if let Some(channel) = args.channel {
        options.channel = channel.into();
    }
    if let Some(max_vertices) = max_vertices {
        options.max_vertices = max_vertices;
    }

    let processing = &mut options.mask_processing;
    processing.blur |= args.blur;
    processing.dilate |= args.dilate;
    processing.fill_holes |= args.fill_holes;
    if let Some(sigma) = args.blur_sigma {
        processing.blur_sigma = sigma;
    }
    if let Some(radius) = args.dilation_radius {
        processing.dilation_radius = radius;
    }
}

/// The convenience function to build a Geotrace instance from the resolved options.
pub fn build_geotrace(
    global: &GlobalOptions,
    args: &MaskProcessingArgs,
    max_vertices: Option<usize>,
) -> GeotraceResult<Geotrace> {
    let options = resolve_options(global, args, max_vertices)?;
    Ok(Geotrace::new().with_options(options))
}

/// Derive a variant file path by appending a suffix before the extension.
pub fn derive_variant_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut derived = input.to_path_buf();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| suffix.to_string());
    derived.set_file_name(format!("{stem}-{suffix}.{extension}"));
    derived
}
