use sitelens::extract::is_documentation_url;

// * Test Suite for Documentation URL Classification

#[test]
fn test_documentation_hosts_match() {
    assert!(is_documentation_url("https://wikipedia.org"));
    assert!(is_documentation_url("https://en.wikipedia.org/wiki/Rust_(programming_language)"));
    assert!(is_documentation_url("http://de.m.wikipedia.org/wiki/Hauptseite"));
}

#[test]
fn test_host_matching_ignores_case() {
    assert!(is_documentation_url("https://EN.WIKIPEDIA.ORG/wiki/Rust"));
}

#[test]
fn test_unrelated_hosts_do_not_match() {
    assert!(!is_documentation_url("https://example.com/"));
    assert!(!is_documentation_url("https://docs.rs/tokio"));
    // * Similar-looking hosts must not pass
    assert!(!is_documentation_url("https://notwikipedia.org/page"));
    assert!(!is_documentation_url("https://wikipedia.org.evil.com/wiki/Rust"));
}

#[test]
fn test_invalid_urls_do_not_match() {
    assert!(!is_documentation_url(""));
    assert!(!is_documentation_url("wikipedia"));
    assert!(!is_documentation_url("://missing-scheme.wikipedia.org"));
}
