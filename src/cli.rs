use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use geotrace::config::is_positive_sigma;
use geotrace::{Channel, ENV_CONFIG_PATH, GeoBounds};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// JSON file with vectorization options; explicit flags take precedence
    #[arg(long, global = true, env = ENV_CONFIG_PATH)]
    pub config: Option<PathBuf>,
    /// Increase log verbosity (-v for debug, -vv for trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trace a mask image into a closed lat/lon polygon
    Vectorize(VectorizeCommand),
    /// Export the thresholded (and cleaned up) binary mask as a PNG
    Mask(MaskCommand),
}

#[derive(Args, Debug)]
pub struct VectorizeCommand {
    /// Input mask image path
    pub input: PathBuf,
    /// Output JSON path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub bounds: BoundsArgs,
    #[command(flatten)]
    pub mask_processing: MaskProcessingArgs,
    /// Maximum number of sampled vertices before the ring is closed
    #[arg(long = "max-vertices")]
    pub max_vertices: Option<usize>,
    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Pairs)]
    pub format: OutputFormat,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct MaskCommand {
    /// Input mask image path
    pub input: PathBuf,
    /// Output path (defaults to `<name>-mask.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub mask_processing: MaskProcessingArgs,
}

/// Geographic rectangle covered by the full image.
#[derive(Args, Debug)]
pub struct BoundsArgs {
    /// Latitude of the top image row
    #[arg(long, allow_negative_numbers = true)]
    pub north: f64,
    /// Latitude of the bottom image row
    #[arg(long, allow_negative_numbers = true)]
    pub south: f64,
    /// Longitude of the rightmost image column
    #[arg(long, allow_negative_numbers = true)]
    pub east: f64,
    /// Longitude of the leftmost image column
    #[arg(long, allow_negative_numbers = true)]
    pub west: f64,
}

impl From<&BoundsArgs> for GeoBounds {
    fn from(args: &BoundsArgs) -> Self {
        GeoBounds::new(args.north, args.south, args.east, args.west)
    }
}

#[derive(Args, Debug)]
pub struct MaskProcessingArgs {
    /// Foreground cutoff (0-255 or 0.0-1.0); pixels at or above it are foreground
    #[arg(long, value_parser = parse_mask_threshold)]
    pub threshold: Option<u8>,
    /// Image channel the mask is read from
    #[arg(long, value_enum)]
    pub channel: Option<ChannelArg>,
    /// Enable gaussian blur before thresholding
    #[arg(long)]
    pub blur: bool,
    /// Sigma used when gaussian blur is enabled
    #[arg(long = "blur-sigma", value_parser = parse_blur_sigma)]
    pub blur_sigma: Option<f32>,
    /// Enable dilation after thresholding
    #[arg(long)]
    pub dilate: bool,
    /// Dilation radius in pixels
    #[arg(long = "dilation-radius")]
    pub dilation_radius: Option<f32>,
    /// Fill enclosed holes in the mask before tracing
    #[arg(long = "fill-holes")]
    pub fill_holes: bool,
}

fn parse_mask_threshold(value: &str) -> Result<u8, String> {
    if let Ok(int_value) = value.parse::<u8>() {
        return Ok(int_value);
    }

    let float_value = value
        .parse::<f32>()
        .map_err(|_| format!("threshold must be numeric (0-255 or 0.0-1.0), got `{value}`"))?;

    if (0.0..=1.0).contains(&float_value) {
        let scaled = (float_value * 255.0).round() as i32;
        return Ok(scaled.clamp(0, 255) as u8);
    }

    if float_value.fract().abs() <= f32::EPSILON && (0.0..=255.0).contains(&float_value) {
        return Ok(float_value as u8);
    }

    Err(format!(
        "threshold {value} is out of range; expected 0-255 or 0.0-1.0"
    ))
}

fn parse_blur_sigma(value: &str) -> Result<f32, String> {
    let sigma = value
        .parse::<f32>()
        .map_err(|_| format!("blur sigma must be numeric, got `{value}`"))?;
    if is_positive_sigma(sigma) {
        Ok(sigma)
    } else {
        Err(format!("blur sigma must be above 0, got {value}"))
    }
}

/// Image channels selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ChannelArg {
    Red,
    Green,
    Blue,
    Alpha,
}

impl From<ChannelArg> for Channel {
    fn from(value: ChannelArg) -> Self {
        match value {
            ChannelArg::Red => Channel::Red,
            ChannelArg::Green => Channel::Green,
            ChannelArg::Blue => Channel::Blue,
            ChannelArg::Alpha => Channel::Alpha,
        }
    }
}

/// How the polygon is written out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Array of `[lat, lon]` pairs
    Pairs,
    /// GeoJSON Polygon geometry (`[lon, lat]` positions)
    Geojson,
}
