//! Query-parameter option grammar
//!
//! ```text
//! ?width=100&height=200&mode=fit&flip=v&flip=h&rotate=90&quality=80
//!  &format=png&signature=c0ffee&crop=10,20,300,400
//! ```
//!
//! Keys are applied in the fixed order of [`OPTION_KEYS`], never in arrival
//! order, so `width`/`height` always override `size`. Within one key a later
//! occurrence overwrites an earlier one. Values that fail to parse fall back
//! to zero instead of failing the request.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::constants::{
    KEY_CROP, KEY_FLIP, KEY_FORMAT, KEY_HEIGHT, KEY_MODE, KEY_QUALITY, KEY_ROTATE,
    KEY_SIGNATURE, KEY_SIZE, KEY_WIDTH, OPTION_KEYS,
};
use crate::error::UrlError;

use super::{Options, OutputFormat};

/// Decoded HTTP form values: each key maps to every value it was given, in
/// the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, Vec<String>>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw query string (without the leading `?`).
    ///
    /// Pairs are separated by `&`, `+` decodes to a space and `%XX` escapes
    /// are percent-decoded. A `%` not followed by two hex digits, or a `;`
    /// anywhere in a pair, makes the whole query undecodable.
    pub fn parse(raw_query: &str) -> Result<Self, UrlError> {
        for pair in raw_query.split('&') {
            if pair.contains(';') {
                return Err(UrlError::new(
                    raw_query,
                    "invalid semicolon separator in query",
                ));
            }
            if let Some(bad) = invalid_escape(pair) {
                return Err(UrlError::new(
                    raw_query,
                    format!("invalid URL escape {:?}", bad),
                ));
            }
        }

        let mut form = Self::new();
        for (key, value) in form_urlencoded::parse(raw_query.as_bytes()) {
            form.append(key.into_owned(), value.into_owned());
        }
        Ok(form)
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Iterate keys in sorted order with all of their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Re-encode as a query string, keys sorted, values in original order.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.values {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (key, value) in iter {
            form.append(key, value);
        }
        form
    }
}

/// Returns the first malformed `%` escape in `s`, if any.
fn invalid_escape(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Some(s.get(i..end).unwrap_or(&s[i..]));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    None
}

/// Overlay query form values onto `defaults`.
///
/// When no `mode` key is present at all and both width and height end up
/// strictly positive, `fit` is forced on. Any `mode` key, even with an
/// unrecognized value, disables that rule.
pub fn parse_form_values(form: &FormValues, defaults: &Options) -> Options {
    overlay_form_values(form, defaults, false)
}

/// [`parse_form_values`] for a query layered over options that may already
/// have chosen a mode. `mode_seen` set means an earlier layer named one (a
/// legacy `fit` or `sc` token), which disables auto-fit like a `mode` key.
pub fn overlay_form_values(form: &FormValues, defaults: &Options, mode_seen: bool) -> Options {
    let mut options = defaults.clone();
    let mut mode_seen = mode_seen;

    for key in OPTION_KEYS {
        let Some(values) = form.get(key) else {
            continue;
        };
        for value in values {
            match key {
                KEY_SIZE => {
                    if let Ok(size) = value.parse::<f64>() {
                        options.width = size;
                        options.height = size;
                    }
                }
                KEY_WIDTH => options.width = parse_float(value),
                KEY_HEIGHT => options.height = parse_float(value),
                KEY_MODE => {
                    match value.as_str() {
                        "fit" => options.fit = true,
                        "smartcrop" => options.smart_crop = true,
                        _ => {}
                    }
                    mode_seen = true;
                }
                KEY_FLIP => match value.as_str() {
                    "v" => options.flip_vertical = true,
                    "h" => options.flip_horizontal = true,
                    _ => {}
                },
                KEY_FORMAT => {
                    if let Ok(format) = value.parse::<OutputFormat>() {
                        options.format = Some(format);
                    }
                }
                KEY_ROTATE => options.rotate = value.parse().unwrap_or(0),
                KEY_QUALITY => options.quality = value.parse().unwrap_or(0),
                KEY_SIGNATURE => options.signature = value.clone(),
                KEY_CROP => {
                    let parts: Vec<&str> = value.split(',').collect();
                    if let [x, y, width, height] = parts.as_slice() {
                        options.crop_x = parse_float(x);
                        options.crop_y = parse_float(y);
                        options.crop_width = parse_float(width);
                        options.crop_height = parse_float(height);
                    }
                }
                _ => {}
            }
        }
    }

    // Two positive dimensions without an explicit mode means fit, for
    // compatibility with clients that never send a mode.
    if !mode_seen && options.width > 0.0 && options.height > 0.0 {
        options.fit = true;
    }

    options
}

/// Remove every option key from a raw query string.
///
/// The remaining pairs are re-encoded with sorted keys, ready to be forwarded
/// to the remote server.
pub fn strip_own_options(raw_query: &str) -> Result<String, UrlError> {
    let form = FormValues::parse(raw_query)?;
    let kept: FormValues = form
        .iter()
        .filter(|(key, _)| !OPTION_KEYS.contains(key))
        .flat_map(|(key, values)| values.iter().map(move |value| (key, value.as_str())))
        .collect();
    Ok(kept.encode())
}

fn parse_float(value: &str) -> f64 {
    value.parse().unwrap_or(0.0)
}
