// Constants module - centralized keys and default values
//
// Query keys and legacy tokens live here so the parsers, the query-stripping
// helper, and the canonical encoder all agree on one vocabulary.

// =============================================================================
// Query parameter keys
// =============================================================================

pub const KEY_SIZE: &str = "size";
pub const KEY_WIDTH: &str = "width";
pub const KEY_HEIGHT: &str = "height";
pub const KEY_MODE: &str = "mode";
pub const KEY_FLIP: &str = "flip";
pub const KEY_FORMAT: &str = "format";
pub const KEY_ROTATE: &str = "rotate";
pub const KEY_QUALITY: &str = "quality";
pub const KEY_SIGNATURE: &str = "signature";
pub const KEY_CROP: &str = "crop";

/// Reserved query keys in the order they are applied.
///
/// `width` and `height` come after `size`, so explicit dimensions always win
/// over the square shorthand no matter how the query string was ordered.
pub const OPTION_KEYS: [&str; 10] = [
    KEY_SIZE,
    KEY_WIDTH,
    KEY_HEIGHT,
    KEY_MODE,
    KEY_FLIP,
    KEY_FORMAT,
    KEY_ROTATE,
    KEY_QUALITY,
    KEY_SIGNATURE,
    KEY_CROP,
];

// =============================================================================
// Legacy path tokens
// =============================================================================

pub const OPT_FIT: &str = "fit";
pub const OPT_FLIP_VERTICAL: &str = "fv";
pub const OPT_FLIP_HORIZONTAL: &str = "fh";
pub const OPT_SCALE_UP: &str = "scaleUp";
pub const OPT_SMART_CROP: &str = "sc";
pub const OPT_ROTATE_PREFIX: &str = "r";
pub const OPT_QUALITY_PREFIX: &str = "q";
pub const OPT_SIGNATURE_PREFIX: &str = "s";
pub const OPT_CROP_X: &str = "cx";
pub const OPT_CROP_Y: &str = "cy";
pub const OPT_CROP_WIDTH: &str = "cw";
pub const OPT_CROP_HEIGHT: &str = "ch";
pub const OPT_SIZE_DELIMITER: char = 'x';

// =============================================================================
// Defaults
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "imgroute.yaml";

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
