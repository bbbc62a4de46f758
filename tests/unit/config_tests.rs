// Configuration loading tests

use imgroute::config::{Config, LogFormat, QueryForwarding};
use imgroute::error::ConfigError;
use imgroute::OutputFormat;
use std::io::Write;
use tempfile::Builder;

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = Config::from_yaml_with_env("{}").unwrap();
    assert!(config.sources.is_empty());
    assert_eq!(config.query_forwarding, QueryForwarding::Raw);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.registry().unwrap().is_empty());
}

#[test]
fn test_full_yaml_file() {
    let file = write_temp(
        ".yaml",
        r#"
sources:
  "/cdn/":
    base_url: "https://cdn.example.com/assets/"
    default_options:
      quality: 80
      format: png
  "/thumbs":
    default_options: { width: 150, height: 150, fit: true }
query_forwarding: strip_options
logging:
  level: debug
  format: pretty
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.query_forwarding, QueryForwarding::StripOptions);
    assert_eq!(config.logging.format, LogFormat::Pretty);

    let registry = config.registry().unwrap();
    assert_eq!(registry.len(), 2);

    let cdn = registry.get("/cdn/").unwrap();
    assert_eq!(
        cdn.base_url.as_ref().map(|u| u.as_str()),
        Some("https://cdn.example.com/assets/")
    );
    assert_eq!(cdn.default_options.quality, 80);
    assert_eq!(cdn.default_options.format, Some(OutputFormat::Png));

    let thumbs = registry.get("/thumbs").unwrap();
    assert!(thumbs.base_url.is_none());
    assert_eq!(thumbs.default_options.width, 150.0);
    assert!(thumbs.default_options.fit);
}

#[test]
fn test_json_file_by_extension() {
    let file = write_temp(
        ".json",
        r#"{"sources": {"/a/": {"default_options": {"rotate": 90}}}}"#,
    );
    let config = Config::from_file(file.path()).unwrap();
    let registry = config.registry().unwrap();
    assert_eq!(registry.get("/a/").unwrap().default_options.rotate, 90);
}

#[test]
fn test_env_substitution_in_base_url() {
    std::env::set_var("IMGROUTE_TEST_CDN_HOST", "cdn.example.org");
    let config = Config::from_yaml_with_env(
        r#"
sources:
  "/cdn/":
    base_url: "https://${IMGROUTE_TEST_CDN_HOST}/"
"#,
    )
    .unwrap();
    let registry = config.registry().unwrap();
    assert_eq!(
        registry.get("/cdn/").unwrap().base_url.as_ref().unwrap().host_str(),
        Some("cdn.example.org")
    );
}

#[test]
fn test_missing_env_var_is_an_error() {
    let result = Config::from_yaml_with_env(
        "sources:\n  \"/a/\":\n    base_url: \"${IMGROUTE_TEST_DEFINITELY_UNSET}\"\n",
    );
    match result {
        Err(ConfigError::MissingEnv(name)) => assert_eq!(name, "IMGROUTE_TEST_DEFINITELY_UNSET"),
        other => panic!("expected MissingEnv, got {:?}", other),
    }
}

#[test]
fn test_invalid_base_url_rejects_registry() {
    let config = Config::from_yaml_with_env(
        "sources:\n  \"/ok/\": {}\n  \"/bad/\":\n    base_url: \"://nope\"\n",
    )
    .unwrap();
    match config.registry() {
        Err(ConfigError::InvalidBaseUrl { prefix, .. }) => assert_eq!(prefix, "/bad/"),
        other => panic!("expected InvalidBaseUrl, got {:?}", other),
    }
}

#[test]
fn test_base_url_must_accept_relative_references() {
    let config =
        Config::from_yaml_with_env("sources:\n  \"/m/\":\n    base_url: \"mailto:a@example.com\"\n")
            .unwrap();
    assert!(matches!(
        config.registry(),
        Err(ConfigError::RelativeBaseUrl { .. })
    ));
}

#[test]
fn test_prefix_must_be_absolute_path() {
    let config = Config::from_yaml_with_env("sources:\n  \"images/\": {}\n").unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidPrefix { .. })
    ));
}

#[test]
fn test_missing_file_is_read_error() {
    let result = Config::from_file("/nonexistent/imgroute.yaml");
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_unknown_query_forwarding_is_parse_error() {
    let result = Config::from_yaml_with_env("query_forwarding: sometimes\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}
