//! Image transformation options
//!
//! Two grammars decode into the same [`Options`] value:
//! 1. Query parameters: `?width=100&height=200&mode=fit&rotate=90`
//! 2. Legacy path tokens: `/100x200,fit,r90/http://example.com/image.jpg`
//!
//! The `Display` impl is the canonical encoding, used downstream as a stable
//! textual identity (cache keys, request fragments).

pub mod legacy;
pub mod query;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    OPT_CROP_HEIGHT, OPT_CROP_WIDTH, OPT_CROP_X, OPT_CROP_Y, OPT_FIT, OPT_FLIP_HORIZONTAL,
    OPT_FLIP_VERTICAL, OPT_QUALITY_PREFIX, OPT_ROTATE_PREFIX, OPT_SCALE_UP,
    OPT_SIGNATURE_PREFIX, OPT_SIZE_DELIMITER, OPT_SMART_CROP,
};

pub use legacy::{parse_legacy_onto, parse_legacy_options, sets_mode};
pub use query::{overlay_form_values, parse_form_values, strip_own_options, FormValues};

/// Output image format override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Tiff,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
        }
    }
}

/// Error returned when a string names no known output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown format: {}", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    /// Exact, case-sensitive match; both grammars only accept the lowercase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "tiff" => Ok(OutputFormat::Tiff),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transformations to perform on the requested image.
///
/// Every field is owned, so a clone is a complete, independent snapshot. A
/// source's default options can be handed to every request and overlaid
/// field by field without one request ever observing another's changes.
///
/// Width, height and the crop rectangle share unit rules: `0` means unset,
/// values greater than 1 are pixels, values in `(0, 1]` are a fraction of the
/// source dimension. Negative crop X/Y are measured from the right/bottom edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub width: f64,
    pub height: f64,

    /// Resize to fit within width x height without cropping.
    pub fit: bool,

    /// Counter-clockwise rotation in degrees: 0, 90, 180 or 270.
    pub rotate: i32,

    /// Flips are applied after rotation.
    pub flip_vertical: bool,
    pub flip_horizontal: bool,

    /// Output quality 1-100; 0 leaves the choice to the encoder.
    pub quality: i32,

    /// Opaque HMAC signature, carried but never verified here.
    pub signature: String,

    /// Allow scaling beyond the source dimensions.
    pub scale_up: bool,

    pub format: Option<OutputFormat>,

    pub crop_x: f64,
    pub crop_y: f64,
    pub crop_width: f64,
    pub crop_height: f64,

    /// Content-aware crop; overrides the rectangle crop when set.
    pub smart_crop: bool,
}

impl Options {
    /// Check if any transformations are requested.
    ///
    /// `signature` is not a transformation, and `fit`/`scale_up` only mean
    /// something together with a size, so none of them count on their own.
    pub fn needs_transform(&self) -> bool {
        self.width != 0.0
            || self.height != 0.0
            || self.rotate != 0
            || self.flip_vertical
            || self.flip_horizontal
            || self.quality != 0
            || self.format.is_some()
            || self.crop_x != 0.0
            || self.crop_y != 0.0
            || self.crop_width != 0.0
            || self.crop_height != 0.0
    }
}

impl fmt::Display for Options {
    /// Canonical encoding: `WxH` first, then every non-default field in a
    /// fixed order, comma separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.width, OPT_SIZE_DELIMITER, self.height)?;

        if self.fit {
            write!(f, ",{}", OPT_FIT)?;
        }
        if self.rotate != 0 {
            write!(f, ",{}{}", OPT_ROTATE_PREFIX, self.rotate)?;
        }
        if self.flip_vertical {
            write!(f, ",{}", OPT_FLIP_VERTICAL)?;
        }
        if self.flip_horizontal {
            write!(f, ",{}", OPT_FLIP_HORIZONTAL)?;
        }
        if self.quality != 0 {
            write!(f, ",{}{}", OPT_QUALITY_PREFIX, self.quality)?;
        }
        if !self.signature.is_empty() {
            write!(f, ",{}{}", OPT_SIGNATURE_PREFIX, self.signature)?;
        }
        if self.scale_up {
            write!(f, ",{}", OPT_SCALE_UP)?;
        }
        if let Some(format) = self.format {
            write!(f, ",{}", format)?;
        }
        if self.crop_x != 0.0 {
            write!(f, ",{}{}", OPT_CROP_X, self.crop_x)?;
        }
        if self.crop_y != 0.0 {
            write!(f, ",{}{}", OPT_CROP_Y, self.crop_y)?;
        }
        if self.crop_width != 0.0 {
            write!(f, ",{}{}", OPT_CROP_WIDTH, self.crop_width)?;
        }
        if self.crop_height != 0.0 {
            write!(f, ",{}{}", OPT_CROP_HEIGHT, self.crop_height)?;
        }
        if self.smart_crop {
            write!(f, ",{}", OPT_SMART_CROP)?;
        }
        Ok(())
    }
}
