//! Legacy comma-token option grammar
//!
//! ```text
//! 100x200,fit,r90,fv,q80,sc0ffee,png,cx10,cy20,cw300,ch400
//! ```
//!
//! Tokens are checked in a fixed order so that literals win over prefix
//! codes: `sc` is smart crop while `sc0ffee` is the signature `c0ffee`, and
//! `scaleUp` is never read as a signature. A token that fails to parse is
//! dropped (numeric fields fall back to zero); it never aborts the rest.

use crate::constants::{
    OPT_CROP_HEIGHT, OPT_CROP_WIDTH, OPT_CROP_X, OPT_CROP_Y, OPT_FIT, OPT_FLIP_HORIZONTAL,
    OPT_FLIP_VERTICAL, OPT_QUALITY_PREFIX, OPT_ROTATE_PREFIX, OPT_SCALE_UP,
    OPT_SIGNATURE_PREFIX, OPT_SIZE_DELIMITER, OPT_SMART_CROP,
};

use super::{Options, OutputFormat};

/// Parse a legacy option string into a fresh [`Options`].
pub fn parse_legacy_options(input: &str) -> Options {
    parse_legacy_onto(input, Options::default())
}

/// Parse a legacy option string on top of `base`.
///
/// Only fields named by a token are touched, so `base` acts as the defaults
/// the path segment overrides.
pub fn parse_legacy_onto(input: &str, base: Options) -> Options {
    let mut options = base;
    for token in input.split(',') {
        apply_token(&mut options, token);
    }
    options
}

/// Whether a legacy option string names a resize mode (`fit` or `sc`).
pub fn sets_mode(input: &str) -> bool {
    input
        .split(',')
        .any(|token| token == OPT_FIT || token == OPT_SMART_CROP)
}

fn apply_token(options: &mut Options, token: &str) {
    if token.is_empty() {
        return;
    }

    match token {
        OPT_FIT => options.fit = true,
        OPT_FLIP_VERTICAL => options.flip_vertical = true,
        OPT_FLIP_HORIZONTAL => options.flip_horizontal = true,
        OPT_SCALE_UP => options.scale_up = true,
        OPT_SMART_CROP => options.smart_crop = true,
        _ => {
            if let Ok(format) = token.parse::<OutputFormat>() {
                options.format = Some(format);
            } else if let Some(value) = token.strip_prefix(OPT_ROTATE_PREFIX) {
                options.rotate = parse_int(value);
            } else if let Some(value) = token.strip_prefix(OPT_QUALITY_PREFIX) {
                options.quality = parse_int(value);
            } else if let Some(value) = token.strip_prefix(OPT_SIGNATURE_PREFIX) {
                options.signature = value.to_string();
            } else if let Some(value) = token.strip_prefix(OPT_CROP_X) {
                options.crop_x = parse_float(value);
            } else if let Some(value) = token.strip_prefix(OPT_CROP_Y) {
                options.crop_y = parse_float(value);
            } else if let Some(value) = token.strip_prefix(OPT_CROP_WIDTH) {
                options.crop_width = parse_float(value);
            } else if let Some(value) = token.strip_prefix(OPT_CROP_HEIGHT) {
                options.crop_height = parse_float(value);
            } else if let Some((width, height)) = token.split_once(OPT_SIZE_DELIMITER) {
                // An empty side leaves that dimension alone; garbage zeroes it.
                if !width.is_empty() {
                    options.width = parse_float(width);
                }
                if !height.is_empty() {
                    options.height = parse_float(height);
                }
            } else if let Ok(size) = token.parse::<f64>() {
                options.width = size;
                options.height = size;
            }
        }
    }
}

fn parse_int(value: &str) -> i32 {
    value.parse().unwrap_or(0)
}

fn parse_float(value: &str) -> f64 {
    value.parse().unwrap_or(0.0)
}
