// * URL Classification
// * Decides whether a target URL belongs to a documentation site that gets
// * the structured extraction path in addition to the visual capture path.

use url::Url;

use crate::config::constants::DOCUMENTATION_DOMAINS;

/// Returns true when the URL's host is one of the documentation domains or a
/// subdomain of one
///
/// Matching is on registrable-domain boundaries, so `en.wikipedia.org` passes
/// while `wikipedia.org.evil.com` does not. Unparseable URLs and URLs without
/// a host classify as false.
pub fn is_documentation_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    let host = match parsed.host_str() {
        Some(host) => host.to_lowercase(),
        None => return false,
    };

    DOCUMENTATION_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}
