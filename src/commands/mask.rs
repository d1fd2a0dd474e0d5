use geotrace::GeotraceResult;
use tracing::info;

use crate::cli::{GlobalOptions, MaskCommand};

use super::utils::{build_geotrace, derive_variant_path};

/// The main function to run the mask command.
pub fn run(global: &GlobalOptions, cmd: MaskCommand) -> GeotraceResult<()> {
    let geotrace = build_geotrace(global, &cmd.mask_processing, None)?;
    let mask = geotrace.load_mask(&cmd.input)?;
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_variant_path(&cmd.input, "mask", "png"));

    info!(
        foreground = mask.foreground_count(),
        width = mask.width(),
        height = mask.height(),
        "mask built"
    );
    mask.to_gray_image().save(&output_path)?;
    println!("Mask PNG saved to {}", output_path.display());

    Ok(())
}
