use crate::UrlError;
use url::Url;

/// Scheme prepended to targets that do not carry one
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Returns true if the string starts with `http://` or `https://`,
/// ignoring ASCII case
pub fn has_http_scheme(raw: &str) -> bool {
    starts_with_ignore_case(raw, "http://") || starts_with_ignore_case(raw, "https://")
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

/// Normalizes a target so that it always carries an HTTP(S) scheme
///
/// Surrounding whitespace is trimmed. Targets that already start with
/// `http://` or `https://` are returned as-is; everything else gets
/// `https://` prepended. No other rewriting happens, so the returned string
/// is also the key the target is reported under.
///
/// # Examples
///
/// ```
/// use webpulse::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("github.com"), "https://github.com");
/// assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
    }
}

/// Validates a configured target and returns its parsed form
///
/// # Validation Steps
///
/// 1. Reject empty or whitespace-only targets
/// 2. Reject explicit non-HTTP schemes (`ftp://...`)
/// 3. Apply [`ensure_scheme`] and parse the result
/// 4. Require a host
///
/// # Arguments
///
/// * `raw` - The target as written in the configuration
///
/// # Returns
///
/// * `Ok(Url)` - The parsed, scheme-qualified URL
/// * `Err(UrlError)` - The target can never be fetched
pub fn validate_target(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    if let Some((scheme, _)) = trimmed.split_once("://") {
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                scheme
            )));
        }
    }

    let url = Url::parse(&ensure_scheme(trimmed)).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}
