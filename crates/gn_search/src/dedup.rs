//! URL canonicalization and first-seen-wins deduplication.

use std::collections::HashSet;

use url::Url;

use gn_core::ArticleCandidate;

/// Canonical form of an article URL: lowercase scheme + host + path, query
/// string and fragment stripped, one trailing slash removed. Tracking
/// parameters and anchors never make two copies of the same story distinct.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(parsed) => {
            let scheme = parsed.scheme().to_lowercase();
            let host = parsed.host_str().unwrap_or("").to_lowercase();
            let mut path = parsed.path().to_lowercase();
            if path.ends_with('/') {
                path.pop();
            }
            format!("{}://{}{}", scheme, host, path)
        }
        Err(_) => {
            let lower = raw.trim().to_lowercase();
            let stripped = lower
                .split('#')
                .next()
                .and_then(|u| u.split('?').next())
                .unwrap_or("");
            stripped.strip_suffix('/').unwrap_or(stripped).to_string()
        }
    }
}

/// Drop candidates whose normalized URL was already seen, preserving input
/// order. The first occurrence wins.
pub fn dedupe(candidates: Vec<ArticleCandidate>) -> Vec<ArticleCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(normalize_url(&c.url)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str, domain: &str) -> ArticleCandidate {
        ArticleCandidate {
            url: url.to_string(),
            source_domain: domain.to_string(),
            title: None,
            published_date: None,
            tone_score: 0.0,
            raw_locations: String::new(),
            raw_themes: String::new(),
            country: "US".to_string(),
        }
    }

    #[test]
    fn query_string_is_stripped() {
        assert_eq!(
            normalize_url("http://a.com/x?utm=campaign"),
            normalize_url("http://a.com/x")
        );
    }

    #[test]
    fn fragment_is_stripped() {
        assert_eq!(
            normalize_url("http://a.com/x#section-2"),
            normalize_url("http://a.com/x")
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(normalize_url("http://a.com/x/"), normalize_url("http://a.com/x"));
    }

    #[test]
    fn case_is_folded() {
        assert_eq!(
            normalize_url("HTTP://News.Example.COM/World/Story"),
            "http://news.example.com/world/story"
        );
    }

    #[test]
    fn unparseable_urls_still_normalize() {
        assert_eq!(normalize_url("not a url?q=1#frag/"), "not a url");
    }

    #[test]
    fn dedupe_keeps_first_of_equal_normalized_urls() {
        let list = vec![
            candidate("http://a.com/x?ref=1", "first"),
            candidate("http://a.com/x", "second"),
            candidate("http://b.com/y", "third"),
        ];
        let deduped = dedupe(list);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].source_domain, "first");
        assert_eq!(deduped[1].source_domain, "third");
    }

    #[test]
    fn dedupe_preserves_order() {
        let list = vec![
            candidate("http://b.com/y", "b"),
            candidate("http://a.com/x", "a"),
            candidate("http://b.com/y/", "dup"),
        ];
        let deduped = dedupe(list);
        let domains: Vec<_> = deduped.iter().map(|c| c.source_domain.as_str()).collect();
        assert_eq!(domains, vec!["b", "a"]);
    }
}
