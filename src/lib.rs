// Imgroute image proxy routing library
//
// Resolves an inbound proxy request into the remote image URL to fetch and
// the transformation options to apply. Fetching, transforming and signature
// verification happen elsewhere; nothing here performs I/O per request.

pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod logging;
pub mod options;
pub mod reload; // SIGHUP-driven registry snapshot swaps
pub mod request;
pub mod router;

pub use config::{Config, QueryForwarding, SourceConfig};
pub use error::{ConfigError, UrlError};
pub use options::{Options, OutputFormat};
pub use request::{resolve, ProxyRequest, Resolved};
pub use router::Registry;
