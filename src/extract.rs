//! Remote URL extraction.
//!
//! After the matched source prefix is removed, the rest of the path is either
//! `{options}/{remote_url}` or just `{remote_url}`. Proxies and path cleaners
//! in front of us often collapse `//`, so `http:/example.com/x` and
//! `http:///example.com/x` are repaired to `http://example.com/x` before
//! parsing. Relative remote URLs are resolved against the source's base URL.

use std::borrow::Cow;

use url::Url;

use crate::router::PrefixMatch;

const SCHEMES: [&str; 2] = ["http", "https"];

/// Remote URL plus the legacy options segment that preceded it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<'a> {
    pub options_segment: Option<&'a str>,
    pub url: Url,
}

/// Rewrite `http:` / `https:` followed by any run of slashes to `scheme://`.
///
/// Only applies when a non-slash character follows the slashes; anything
/// else is returned untouched.
pub fn normalize_mangled_scheme(s: &str) -> Cow<'_, str> {
    for scheme in SCHEMES {
        let Some(rest) = s.strip_prefix(scheme).and_then(|r| r.strip_prefix(':')) else {
            continue;
        };
        let host_and_path = rest.trim_start_matches('/');
        let slashes = rest.len() - host_and_path.len();
        if slashes == 0 || host_and_path.is_empty() || slashes == 2 {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(format!("{}://{}", scheme, host_and_path));
    }
    Cow::Borrowed(s)
}

/// Remove the matched prefix and the single `/` that separates it from the
/// remote part. Without a match only the leading `/` is removed.
pub fn strip_prefix<'a>(escaped_path: &'a str, matched: Option<&PrefixMatch<'_>>) -> &'a str {
    let rest = match matched {
        Some(m) => escaped_path.get(m.stripped.len()..).unwrap_or(""),
        None => escaped_path,
    };
    rest.strip_prefix('/').unwrap_or(rest)
}

/// Split `remainder` into an optional options segment and the remote URL.
///
/// 1. The whole remainder parses as an absolute URL: no options segment.
/// 2. Everything after the first `/` parses as an absolute URL: the part
///    before it is the options segment.
/// 3. Otherwise the whole remainder is a reference resolved against `base`;
///    without a base it must have parsed in step 1, so its error is returned.
pub fn extract_remote<'a>(
    remainder: &'a str,
    base: Option<&Url>,
) -> Result<Extracted<'a>, url::ParseError> {
    let whole = parse_absolute(remainder);
    if let Ok(url) = whole {
        return Ok(Extracted {
            options_segment: None,
            url,
        });
    }

    if let Some((options, tail)) = remainder.split_once('/') {
        if let Ok(url) = parse_absolute(tail) {
            return Ok(Extracted {
                options_segment: Some(options),
                url,
            });
        }
    }

    match base {
        Some(base) => {
            let url = base.join(&normalize_mangled_scheme(remainder))?;
            Ok(Extracted {
                options_segment: None,
                url,
            })
        }
        None => whole.map(|url| Extracted {
            options_segment: None,
            url,
        }),
    }
}

fn parse_absolute(s: &str) -> Result<Url, url::ParseError> {
    Url::parse(&normalize_mangled_scheme(s))
}
