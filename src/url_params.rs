//! Pure functions for previewing the request a hook will issue.
//!
//! Stateless and side-effect free, so they are tested in isolation.

use crate::types::{HttpArgument, HttpMethod};

/// Extract the base URL (without query string) from a URL string.
///
/// # Examples
/// ```
/// assert_eq!(extract_base_url("https://example.com/api?foo=bar"), "https://example.com/api");
/// assert_eq!(extract_base_url("https://example.com/api"), "https://example.com/api");
/// assert_eq!(extract_base_url(""), "");
/// ```
pub fn extract_base_url(url: &str) -> &str {
    if let Some(pos) = url.find('?') {
        &url[..pos]
    } else {
        url
    }
}

/// Append parameters to a URL as a percent-encoded query string.
///
/// Parameters with an empty name are skipped. Parameters already present in
/// `url` are kept in front of the new ones.
///
/// # Examples
/// ```
/// let params = vec![HttpArgument::new("foo", "bar"), HttpArgument::new("", "x")];
/// assert_eq!(
///     build_url_with_params("https://example.com/api", &params),
///     "https://example.com/api?foo=bar"
/// );
/// ```
pub fn build_url_with_params(url: &str, params: &[HttpArgument]) -> String {
    let param_parts: Vec<String> = params
        .iter()
        .filter(|p| !p.name.is_empty())
        .map(|p| {
            format!(
                "{}={}",
                urlencoding::encode(&p.name),
                urlencoding::encode(&p.value)
            )
        })
        .collect();

    if param_parts.is_empty() {
        return url.to_string();
    }

    let existing = &url[extract_base_url(url).len()..];
    let separator = match existing {
        "" => "?",
        "?" => "",
        _ => "&",
    };
    format!("{}{}{}", url, separator, param_parts.join("&"))
}

/// `METHOD url?query`, the first line the webhook would send
pub fn request_line(method: HttpMethod, url: &str, params: &[HttpArgument]) -> String {
    format!("{} {}", method.as_str(), build_url_with_params(url, params))
}
