// src/utils/url.rs

//! URL manipulation utilities.
//!
//! Every link on the portal is relative, so extracted hrefs must be
//! resolved against the page they came from before they are of any use.

/// Resolve a potentially relative URL against a base URL.
///
/// # Examples
/// ```
/// use mmspider::utils::url::resolve;
///
/// assert_eq!(
///     resolve("https://example.com/path/", "page.html"),
///     "https://example.com/path/page.html"
/// );
/// ```
pub fn resolve(base: &str, href: &str) -> String {
    // Already absolute
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    // Query-only href - append to the base as-is. The portal's feedback and
    // submission links are query strings on the tool page itself.
    if href.starts_with('?') || href.starts_with('&') {
        return format!("{base}{href}");
    }

    // Absolute path - combine with base domain
    if href.starts_with('/') {
        return resolve_absolute_path(base, href);
    }

    // Relative path - combine with base directory
    resolve_relative_path(base, href)
}

fn resolve_absolute_path(base: &str, href: &str) -> String {
    if let Some(scheme_end) = base.find("://") {
        let after_scheme = &base[scheme_end + 3..];
        if let Some(slash_idx) = after_scheme.find('/') {
            let domain = &base[..scheme_end + 3 + slash_idx];
            return format!("{domain}{href}");
        }
    }
    format!("{}{}", base.trim_end_matches('/'), href)
}

fn resolve_relative_path(base: &str, href: &str) -> String {
    // Strip any query string before locating the base directory
    let base = base.split('?').next().unwrap_or(base);

    let base_dir = if base.ends_with('/') {
        base.to_string()
    } else {
        match base.rfind('/') {
            Some(idx) => base[..=idx].to_string(),
            None => format!("{base}/"),
        }
    };

    format!("{base_dir}{href}")
}
