use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{GeotraceError, GeotraceResult};

/// Default cutoff for the sampled channel; pixels at or above it are foreground.
pub const DEFAULT_THRESHOLD: u8 = 127;

/// Default upper bound on sampled vertices before the ring is closed.
pub const DEFAULT_MAX_VERTICES: usize = 200;

/// Which channel of the decoded image drives the mask.
///
/// Grayscale images expand to identical red, green and blue channels, so the
/// default `Red` is the gray value for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    /// Index of the channel inside an RGBA pixel.
    pub fn rgba_index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::Alpha => 3,
        }
    }
}

/// Options describing how a mask should be cleaned up before tracing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MaskProcessingOptions {
    pub blur: bool,
    pub blur_sigma: f32,
    pub dilate: bool,
    pub dilation_radius: f32,
    pub fill_holes: bool,
}

impl Default for MaskProcessingOptions {
    fn default() -> Self {
        Self {
            blur: false,
            blur_sigma: 6.0,
            dilate: false,
            dilation_radius: 5.0,
            fill_holes: false,
        }
    }
}

impl MaskProcessingOptions {
    /// Whether any clean-up step is enabled.
    pub fn is_enabled(&self) -> bool {
        self.blur || self.dilate || self.fill_holes
    }

    /// Reject values the enabled steps cannot run with.
    pub fn validate(&self) -> GeotraceResult<()> {
        if self.blur && !is_positive_sigma(self.blur_sigma) {
            return Err(GeotraceError::InvalidOption {
                name: "blur_sigma",
                reason: format!("must be a finite number above 0, got {}", self.blur_sigma),
            });
        }
        if self.dilate && !(self.dilation_radius.is_finite() && self.dilation_radius >= 0.0) {
            return Err(GeotraceError::InvalidOption {
                name: "dilation_radius",
                reason: format!(
                    "must be a finite number of at least 0, got {}",
                    self.dilation_radius
                ),
            });
        }
        Ok(())
    }
}

/// Gaussian blur is only defined for finite, strictly positive sigma.
pub fn is_positive_sigma(sigma: f32) -> bool {
    sigma.is_finite() && sigma > 0.0
}

/// Everything that controls a single vectorization run, apart from the bounds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VectorizeOptions {
    /// Foreground iff the sampled channel value is `>= threshold`.
    pub threshold: u8,
    pub channel: Channel,
    /// Upper bound on sampled vertices. Zero behaves like one.
    pub max_vertices: usize,
    pub mask_processing: MaskProcessingOptions,
}

impl Default for VectorizeOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            channel: Channel::default(),
            max_vertices: DEFAULT_MAX_VERTICES,
            mask_processing: MaskProcessingOptions::default(),
        }
    }
}

/// Load vectorization options from a JSON file. Missing fields keep their defaults.
pub fn load_options(path: &Path) -> GeotraceResult<VectorizeOptions> {
    let data = fs::read_to_string(path)?;
    let options: VectorizeOptions = serde_json::from_str(&data)?;
    options.mask_processing.validate()?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let opts = VectorizeOptions::default();
        assert_eq!(opts.threshold, 127);
        assert_eq!(opts.channel, Channel::Red);
        assert_eq!(opts.max_vertices, 200);
        assert!(!opts.mask_processing.is_enabled());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: VectorizeOptions =
            serde_json::from_str(r#"{"threshold": 1, "mask_processing": {"fill_holes": true}}"#)
                .unwrap();
        assert_eq!(opts.threshold, 1);
        assert_eq!(opts.max_vertices, DEFAULT_MAX_VERTICES);
        assert!(opts.mask_processing.fill_holes);
        assert!(!opts.mask_processing.blur);
        assert!((opts.mask_processing.blur_sigma - 6.0).abs() < 1e-6);
    }

    #[test]
    fn channel_names_are_lowercase() {
        let opts: VectorizeOptions = serde_json::from_str(r#"{"channel": "alpha"}"#).unwrap();
        assert_eq!(opts.channel, Channel::Alpha);
        assert_eq!(opts.channel.rgba_index(), 3);
    }

    #[test]
    fn load_options_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_vertices": 50, "channel": "green"}}"#).unwrap();

        let opts = load_options(file.path()).unwrap();
        assert_eq!(opts.max_vertices, 50);
        assert_eq!(opts.channel, Channel::Green);
        assert_eq!(opts.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn load_options_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = load_options(file.path()).unwrap_err();
        assert!(matches!(err, crate::GeotraceError::Json(_)));
    }

    #[test]
    fn load_options_rejects_zero_blur_sigma() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"mask_processing": {{"blur": true, "blur_sigma": 0}}}}"#
        )
        .unwrap();

        let err = load_options(file.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::GeotraceError::InvalidOption {
                name: "blur_sigma",
                ..
            }
        ));
    }

    #[test]
    fn disabled_blur_ignores_sigma() {
        let opts = MaskProcessingOptions {
            blur: false,
            blur_sigma: -1.0,
            ..Default::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let blur = MaskProcessingOptions {
            blur: true,
            blur_sigma: f32::NAN,
            ..Default::default()
        };
        assert!(blur.validate().is_err());

        let dilate = MaskProcessingOptions {
            dilate: true,
            dilation_radius: -2.0,
            ..Default::default()
        };
        assert!(dilate.validate().is_err());
        assert!(MaskProcessingOptions::default().validate().is_ok());
    }
}
