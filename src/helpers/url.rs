//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters left untouched in query values (the URLSearchParams set)
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'*');

/// Characters left untouched in slug path segments
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/topics/") // -> "/site/topics/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// URL of a document: `/<route>/<slug-with-slashes>`
pub fn document_url(config: &SiteConfig, route: &str, slug: &str) -> String {
    let encoded: Vec<String> = slug
        .split('/')
        .map(|seg| utf8_percent_encode(seg, PATH_SEGMENT).to_string())
        .collect();
    url_for(
        config,
        &format!("{}/{}", route.trim_matches('/'), encoded.join("/")),
    )
}

/// Build a query string from key/value pairs, dropping empty values.
///
/// Returns `"?"` alone when nothing is left, like `URLSearchParams`.
pub fn build_query(pairs: &[(&str, Option<&str>)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter_map(|(k, v)| match v {
            Some(v) if !v.is_empty() => Some(format!(
                "{}={}",
                k,
                utf8_percent_encode(v, QUERY_VALUE).to_string().replace("%20", "+")
            )),
            _ => None,
        })
        .collect();
    format!("?{}", parts.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/site/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/site/css/style.css");
        assert_eq!(url_for(&config, "topics/"), "/site/topics/");
        assert_eq!(url_for(&config, ""), "/site/");
    }

    #[test]
    fn test_document_url_keeps_slashes() {
        let config = SiteConfig::default();
        assert_eq!(
            document_url(&config, "topics", "safety/first-date"),
            "/topics/safety/first-date"
        );
        assert_eq!(
            document_url(&config, "/manual/", "はじめに"),
            "/manual/%E3%81%AF%E3%81%98%E3%82%81%E3%81%AB"
        );
    }

    #[test]
    fn test_build_query() {
        assert_eq!(
            build_query(&[("q", Some("hello world")), ("cat", None), ("page", Some("2"))]),
            "?q=hello+world&page=2"
        );
        assert_eq!(build_query(&[("q", Some(""))]), "?");
    }
}
