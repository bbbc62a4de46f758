// Request assembly module
//
// Turns an inbound request into the remote URL to fetch and the options to
// apply. Inbound requests look like:
//
//   /{prefix?}/{legacy_options?}/{remote_url}?{query_options_and_passthrough}
//
// e.g.
//
//   http://localhost/100x200/http://example.com/image.jpg
//   http://localhost/100x200,r90/http://example.com/image.jpg?foo=bar
//   http://localhost//http://example.com/image.jpg
//   http://localhost/thumbs/images/a.jpg?size=150   (with a base_url source)

use std::fmt;

use url::Url;

use crate::config::QueryForwarding;
use crate::error::UrlError;
use crate::extract::{extract_remote, strip_prefix};
use crate::options::{
    overlay_form_values, parse_legacy_onto, sets_mode, strip_own_options, FormValues, Options,
};
use crate::router::Registry;

/// Remote URL and final options for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Parsed remote URL. Its query is the forwarded query after WHATWG
    /// serialization, which may percent-encode bytes such as `'`.
    pub url: Url,
    /// Forwarded query exactly as it will be sent, without the leading `?`.
    pub query: Option<String>,
    pub options: Options,
}

impl Resolved {
    /// The remote URL with the forwarded query byte-for-byte.
    pub fn remote_url(&self) -> String {
        render_remote(&self.url, self.query.as_deref())
    }
}

fn render_remote(url: &Url, query: Option<&str>) -> String {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    match query {
        Some(query) => format!("{}?{}", base, query),
        None => base.to_string(),
    }
}

/// Resolve an escaped request path and raw query against a registry.
///
/// Defaults come from the matched source (or are all-zero), the legacy path
/// segment is applied on top of them, then the query options. The inbound
/// query is re-attached to the remote URL according to `forwarding`.
pub fn resolve(
    escaped_path: &str,
    raw_query: Option<&str>,
    registry: &Registry,
    forwarding: QueryForwarding,
) -> Result<Resolved, UrlError> {
    let inbound = || match raw_query {
        Some(query) => format!("{}?{}", escaped_path, query),
        None => escaped_path.to_string(),
    };

    let matched = registry.best_match(escaped_path);
    let remainder = strip_prefix(escaped_path, matched.as_ref());
    let base_url = matched.as_ref().and_then(|m| m.config.base_url.as_ref());

    let extracted = extract_remote(remainder, base_url).map_err(|err| match err {
        url::ParseError::RelativeUrlWithoutBase => {
            UrlError::new(inbound(), "must provide absolute remote URL")
        }
        other => UrlError::new(inbound(), format!("unable to parse remote URL: {}", other)),
    })?;

    let mut url = extracted.url;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::new(
            inbound(),
            "remote URL must have http or https scheme",
        ));
    }

    let mut defaults = matched
        .as_ref()
        .map(|m| m.config.default_options.clone())
        .unwrap_or_default();
    let segment = extracted.options_segment.filter(|s| !s.is_empty());
    if let Some(segment) = segment {
        defaults = parse_legacy_onto(segment, defaults);
    }
    // A mode literal in the path suppresses auto-fit just like a `mode` key.
    let mode_seen = segment.map_or(false, sets_mode);

    let raw_query = raw_query.unwrap_or("");
    let form =
        FormValues::parse(raw_query).map_err(|err| UrlError::new(inbound(), err.message))?;
    let options = overlay_form_values(&form, &defaults, mode_seen);

    let forwarded = match forwarding {
        QueryForwarding::Raw => raw_query.to_string(),
        QueryForwarding::StripOptions => {
            strip_own_options(raw_query).map_err(|err| UrlError::new(inbound(), err.message))?
        }
    };
    let query = Some(forwarded).filter(|q| !q.is_empty());
    url.set_query(query.as_deref());

    tracing::debug!(
        path = %escaped_path,
        prefix = matched.as_ref().map(|m| m.prefix).unwrap_or(""),
        remote_url = %render_remote(&url, query.as_deref()),
        options = %options,
        "Resolved image request"
    );

    Ok(Resolved {
        url,
        query,
        options,
    })
}

/// An image request: the remote image to proxy and the transformation to
/// apply, tied to the inbound HTTP request it came from.
#[derive(Debug)]
pub struct ProxyRequest<'a, B = ()> {
    /// Absolute http(s) URL of the remote image
    pub url: Url,
    /// Forwarded query exactly as received (or as re-encoded when option
    /// keys are stripped)
    pub query: Option<String>,
    /// Transformation to perform
    pub options: Options,
    original: &'a http::Request<B>,
}

impl<'a, B> ProxyRequest<'a, B> {
    /// Build a request, forwarding the inbound query string verbatim.
    pub fn new(original: &'a http::Request<B>, registry: &Registry) -> Result<Self, UrlError> {
        Self::with_forwarding(original, registry, QueryForwarding::Raw)
    }

    pub fn with_forwarding(
        original: &'a http::Request<B>,
        registry: &Registry,
        forwarding: QueryForwarding,
    ) -> Result<Self, UrlError> {
        let uri = original.uri();
        let resolved = resolve(uri.path(), uri.query(), registry, forwarding).map_err(|err| {
            tracing::warn!(uri = %uri, error = %err, "Rejected image request");
            err
        })?;

        Ok(Self {
            url: resolved.url,
            query: resolved.query,
            options: resolved.options,
            original,
        })
    }

    /// The remote URL to fetch, with the forwarded query byte-for-byte.
    pub fn remote_url(&self) -> String {
        render_remote(&self.url, self.query.as_deref())
    }

    /// The inbound request this was built from.
    pub fn original(&self) -> &'a http::Request<B> {
        self.original
    }
}

impl<B> fmt::Display for ProxyRequest<'_, B> {
    /// The remote URL with the canonical options string as its fragment.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.remote_url(), self.options)
    }
}
