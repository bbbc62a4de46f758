// Prefix registry tests

use imgroute::config::SourceConfig;
use imgroute::extract::{extract_remote, normalize_mangled_scheme, strip_prefix};
use imgroute::{Options, Registry};
use rstest::rstest;

fn registry(prefixes: &[&str]) -> Registry {
    prefixes
        .iter()
        .enumerate()
        .map(|(i, prefix)| {
            (
                prefix.to_string(),
                SourceConfig::new(
                    None,
                    Options {
                        quality: i as i32 + 1,
                        ..Default::default()
                    },
                ),
            )
        })
        .collect()
}

#[rstest]
#[case(&["/a/", "/a/b/"], "/a/b/http://example.com/", Some("/a/b/"))]
#[case(&["/a/", "/a/b/"], "/a/c/http://example.com/", Some("/a/"))]
#[case(&["/a/", "/a/b/"], "/c/http://example.com/", None)]
#[case(&["/", "/img"], "/img/x.png", Some("/img"))]
#[case(&["/", "/img"], "/other/x.png", Some("/"))]
// equal stripped length: the smallest registered prefix wins
#[case(&["/img/", "/img"], "/img/x.png", Some("/img"))]
fn test_best_match(#[case] prefixes: &[&str], #[case] path: &str, #[case] expected: Option<&str>) {
    let registry = registry(prefixes);
    assert_eq!(registry.best_match(path).map(|m| m.prefix), expected);
}

#[test]
fn test_match_then_strip() {
    let registry = registry(&["/thumbs/"]);
    let path = "/thumbs/100x100/http://example.com/a.jpg";
    let matched = registry.best_match(path);
    assert_eq!(
        strip_prefix(path, matched.as_ref()),
        "100x100/http://example.com/a.jpg"
    );

    let extracted = extract_remote(strip_prefix(path, matched.as_ref()), None).unwrap();
    assert_eq!(extracted.options_segment, Some("100x100"));
    assert_eq!(extracted.url.as_str(), "http://example.com/a.jpg");
}

#[rstest]
#[case("http:/example.com/a", "http://example.com/a")]
#[case("https:////example.com/a", "https://example.com/a")]
#[case("http://example.com/a", "http://example.com/a")]
#[case("ftp:/example.com/a", "ftp:/example.com/a")]
#[case("example.com/a", "example.com/a")]
fn test_normalize_mangled_scheme(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_mangled_scheme(input), expected);
}
