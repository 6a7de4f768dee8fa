//! URL normalization shared by clustering, duplicate detection, and the
//! suspension placeholder.

use url::Url;

/// Scheme of the engine's own placeholder documents.
pub const PLACEHOLDER_SCHEME: &str = "tabweave";

const PLACEHOLDER_BASE: &str = "tabweave://suspended";

/// Schemes that belong to the host environment itself and are never
/// clustered, deduplicated, or suspended.
const SYSTEM_SCHEMES: &[&str] = &[
    "about",
    "chrome",
    "chrome-extension",
    "edge",
    "brave",
    "devtools",
    "view-source",
    PLACEHOLDER_SCHEME,
];

/// Clustering key for a document: scheme + host, with a leading "www."
/// label stripped. `None` for unparseable URLs or URLs without a host;
/// callers silently skip those.
pub fn origin(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    Some(format!("{}://{}", parsed.scheme(), host))
}

/// Human-facing name for an origin: the host without the scheme.
pub fn origin_label(origin: &str) -> &str {
    origin
        .split_once("://")
        .map(|(_, host)| host)
        .unwrap_or(origin)
}

/// True for internal browser pages and the engine's own placeholder
/// documents.
pub fn is_system(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => SYSTEM_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

/// Duplicate-detection key: scheme + host + path with the trailing slash
/// stripped, the fragment dropped, and the query kept unless
/// `ignore_query` is set. `None` for unparseable URLs.
pub fn normalize_for_dedup(url: &str, ignore_query: bool) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    let mut normalized = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        normalized.push_str(&format!(":{}", port));
    }
    normalized.push_str(parsed.path().trim_end_matches('/'));

    if !ignore_query
        && let Some(query) = parsed.query()
        && !query.is_empty()
    {
        normalized.push('?');
        normalized.push_str(query);
    }

    Some(normalized)
}

/// Builds the placeholder document URL for a suspended tab, carrying the
/// original url/title/favicon as query parameters so the placeholder can
/// render a faithful preview and offer reactivation.
pub fn placeholder_url(original_url: &str, title: &str, favicon_url: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("url", original_url);
    query.append_pair("title", title);
    if let Some(favicon) = favicon_url {
        query.append_pair("favicon", favicon);
    }
    format!("{}?{}", PLACEHOLDER_BASE, query.finish())
}

/// True if the tab is currently showing a suspension placeholder.
pub fn is_placeholder(url: &str) -> bool {
    url.starts_with(PLACEHOLDER_BASE)
}

/// Extracts the original URL a placeholder stands in for. This is the
/// sole recovery path after a process restart loses the in-memory
/// suspension records.
pub fn placeholder_target(url: &str) -> Option<String> {
    if !is_placeholder(url) {
        return None;
    }
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_strips_www() {
        assert_eq!(
            origin("https://www.example.com/path"),
            Some("https://example.com".to_string())
        );
        assert_eq!(
            origin("https://shop.example.com/cart"),
            Some("https://shop.example.com".to_string())
        );
    }

    #[test]
    fn test_origin_rejects_invalid() {
        assert_eq!(origin("not a url"), None);
        assert_eq!(origin("about:blank"), None);
    }

    #[test]
    fn test_origin_label() {
        assert_eq!(origin_label("https://shop.example.com"), "shop.example.com");
    }

    #[test]
    fn test_system_schemes() {
        assert!(is_system("chrome://settings"));
        assert!(is_system("about:blank"));
        assert!(is_system("tabweave://suspended?url=x"));
        assert!(!is_system("https://example.com"));
        assert!(!is_system("not a url"));
    }

    #[test]
    fn test_dedup_ignores_query_when_asked() {
        assert_eq!(
            normalize_for_dedup("https://a.com/x?x=1", true),
            Some("https://a.com/x".to_string())
        );
        assert_eq!(
            normalize_for_dedup("https://a.com/x?x=1", false),
            Some("https://a.com/x?x=1".to_string())
        );
    }

    #[test]
    fn test_dedup_strips_trailing_slash_and_fragment() {
        assert_eq!(
            normalize_for_dedup("https://b.com/", false),
            Some("https://b.com".to_string())
        );
        assert_eq!(
            normalize_for_dedup("https://b.com/docs/#section", false),
            Some("https://b.com/docs".to_string())
        );
    }

    #[test]
    fn test_placeholder_round_trip() {
        let url = placeholder_url(
            "https://example.com/article?id=7",
            "An article",
            Some("https://example.com/favicon.ico"),
        );

        assert!(is_placeholder(&url));
        assert_eq!(
            placeholder_target(&url),
            Some("https://example.com/article?id=7".to_string())
        );
    }

    #[test]
    fn test_placeholder_target_rejects_other_urls() {
        assert_eq!(placeholder_target("https://example.com"), None);
    }
}
